use crate::{SharedBoard, WebSettings};
use actix_web::{get, web, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use pulse_series::project::{SortKey, SortOrder};
use pulse_series::{Board, Dashboard};
use serde::{Deserialize, Serialize};
use serde_json::json;

////////////////////////////////////////////////////////////////////////////////////////////////////////

/// One data product, stamped with the cycle it came from.
///
/// ```json
/// {
///     "symbol": "AAPL",
///     "refreshed_at": "2024-01-05T20:00:12Z",
///     "stale": false,
///     "data": { ... }
/// }
/// ```
#[derive(Serialize)]
struct Snapshot<'a, T: Serialize> {
    symbol: &'a str,
    refreshed_at: DateTime<Utc>,
    stale: bool,
    data: T,
}

/// Answer with `product` of the current dashboard, or `503` before the first good cycle.
fn respond<'a, T, F>(board: &'a Board, product: F) -> HttpResponse
where
    T: Serialize,
    F: FnOnce(&'a Dashboard) -> T,
{
    match board.current() {
        Some(dashboard) => HttpResponse::Ok().json(Snapshot {
            symbol: &dashboard.symbol,
            refreshed_at: dashboard.refreshed_at,
            stale: board.stale,
            data: product(dashboard),
        }),
        None => HttpResponse::ServiceUnavailable().json(json!({
            "status": "no dashboard yet",
            "last_error": board.last_error,
        })),
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Whole board: the last good dashboard, whether it is stale, and the last error
#[get("/dashboard")]
pub async fn dashboard_full(state: web::Data<SharedBoard>) -> impl Responder {
    let board = state.read().await;
    if board.current().is_none() {
        return respond(&board, |_| ());
    }
    HttpResponse::Ok().json(&*board)
}

#[get("/dashboard/delta")]
pub async fn dashboard_delta(state: web::Data<SharedBoard>) -> impl Responder {
    let board = state.read().await;
    respond(&board, |d| &d.delta)
}

#[get("/dashboard/sparkline")]
pub async fn dashboard_sparkline(state: web::Data<SharedBoard>) -> impl Responder {
    let board = state.read().await;
    respond(&board, |d| &d.sparkline)
}

/// Latest vs previous sample, plus the BUY / SELL labels derived from it
#[get("/dashboard/recency")]
pub async fn dashboard_recency(state: web::Data<SharedBoard>) -> impl Responder {
    let board = state.read().await;
    respond(&board, |d| json!({ "recency": d.recency, "quote": d.quote }))
}

#[derive(Deserialize, Debug)]
pub struct TableQuery {
    page: Option<usize>,
    sort: Option<SortKey>,
    order: Option<SortOrder>,
}

/// Paginated price history
///
/// `GET /dashboard/table?page=0&sort=value&order=asc`; without `sort` the rows keep
/// provider order (newest first).
#[get("/dashboard/table")]
pub async fn dashboard_table(
    state: web::Data<SharedBoard>,
    settings: web::Data<WebSettings>,
    query: web::Query<TableQuery>,
) -> impl Responder {
    let board = state.read().await;
    let query = query.into_inner();
    let sort = query
        .sort
        .map(|key| (key, query.order.unwrap_or_default()));
    respond(&board, |d| {
        d.table
            .page(query.page.unwrap_or(0), settings.page_size, sort)
    })
}

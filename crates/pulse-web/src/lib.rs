pub mod api;

use actix_web::{middleware::Logger, web, App, HttpServer};
use pulse_series::Board;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// The board as shared between the refresh loop (sole writer) & the HTTP handlers.
pub type SharedBoard = Arc<RwLock<Board>>;

#[derive(Debug, Clone, Copy)]
pub struct WebSettings {
    pub page_size: usize,
}

impl Default for WebSettings {
    fn default() -> Self {
        Self { page_size: 10 }
    }
}

/// Register every route; shared by [`serve()`] and the handler tests.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(api::health)
        .service(api::dashboard::dashboard_full)
        .service(api::dashboard::dashboard_delta)
        .service(api::dashboard::dashboard_sparkline)
        .service(api::dashboard::dashboard_recency)
        .service(api::dashboard::dashboard_table);
}

/// Serve the board over HTTP until the server is stopped.
pub async fn serve(board: SharedBoard, settings: WebSettings, bind: (String, u16)) -> std::io::Result<()> {
    info!("serving dashboard on http://{}:{}", bind.0, bind.1);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(board.clone()))
            .app_data(web::Data::new(settings))
            .configure(routes)
    })
    .bind(bind)?
    .run()
    .await
}

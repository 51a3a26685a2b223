use colored::{ColoredString, Colorize};
use indicatif::{ProgressBar, ProgressStyle};
use pulse_series::project::{Movement, Polarity};
use pulse_series::Board;
use std::time::Duration;

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Spinner shown between refresh cycles in `watch` mode.
pub fn waiting_pb(period: Duration) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} refreshing every {msg} ({elapsed} since last)")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(format!("{}s", period.as_secs()));
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Scale `values` into `[floor, ceiling]` and draw one block glyph per value.
pub fn spark_glyphs(values: &[f64], floor: f64, ceiling: f64) -> String {
    let span = ceiling - floor;
    let top = (BARS.len() - 1) as f64;
    values
        .iter()
        .map(|value| {
            let level = if span > 0.0 {
                ((value - floor) / span * top).round().clamp(0.0, top)
            } else {
                0.0
            };
            BARS[level as usize]
        })
        .collect()
}

fn by_polarity(text: String, polarity: Polarity) -> ColoredString {
    match polarity {
        Polarity::Up => text.green(),
        Polarity::Down => text.red(),
    }
}

fn by_movement(text: String, movement: Movement) -> ColoredString {
    match movement {
        Movement::Increased => text.white().on_green(),
        Movement::Unchanged => text.normal(),
        Movement::Decreased => text.white().on_red(),
    }
}

/// The whole card as printable text: delta, sparkline, BUY / SELL labels & the first page of
/// the price table.
pub fn card(board: &Board, page_size: usize) -> String {
    let Some(d) = board.current() else {
        let reason = board
            .last_error
            .as_ref()
            .map(|e| e.message.clone())
            .unwrap_or_else(|| "waiting for the first refresh".to_string());
        return format!("{}\n{}\n", "no dashboard yet".bold(), reason.dimmed());
    };

    let mut lines = vec![
        format!(
            "{}  {}",
            d.symbol.bold(),
            format!("intraday {}", d.delta.indicator).dimmed()
        ),
        format!(
            "CHANGE (1D)   {}",
            by_polarity(format!("{:+.2}%", d.delta.percent()), d.delta.polarity)
        ),
    ];

    let values: Vec<f64> = d.sparkline.points.iter().map(|p| p.value).collect();
    lines.push(
        by_polarity(
            spark_glyphs(&values, d.sparkline.floor, d.sparkline.ceiling),
            d.sparkline.polarity,
        )
        .to_string(),
    );

    lines.push(format!(
        "[ SELL {:.2} ]   {}",
        d.quote.sell,
        by_movement(format!("[ BUY {:.2} ]", d.quote.buy), d.quote.movement)
    ));

    let page = d.table.page(0, page_size, None);
    lines.push(String::new());
    lines.push("Stock Price History".bold().to_string());
    lines.push(format!("{:<20} {:>10}", "Date", "Rate").dimmed().to_string());
    for row in &page.rows {
        lines.push(format!("{:<20} {:>10.4}", row.timestamp.to_string(), row.value));
    }
    lines.push(
        format!("page 1 of {}", page.page_count.max(1))
            .dimmed()
            .to_string(),
    );

    lines.push(String::new());
    lines.push(
        format!("refreshed {}", d.refreshed_at.format("%H:%M:%S UTC"))
            .dimmed()
            .to_string(),
    );
    if !d.skipped.is_empty() {
        lines.push(format!("{} malformed samples skipped", d.skipped.len()).yellow().to_string());
    }
    if board.stale {
        if let Some(e) = &board.last_error {
            lines.push(format!("stale: {}", e.message).yellow().to_string());
        }
    }

    lines.join("\n") + "\n"
}

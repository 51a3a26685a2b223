use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands::*, TraceLevel};
use dotenv::dotenv;
use pulse_feed::{AlphaVantage, QuoteSource};
use pulse_series::Board;
use pulse_web::{SharedBoard, WebSettings};
use settings::Settings;
use std::sync::Arc;
use tracing::{info, subscriber, trace, Level};
use tracing_subscriber::FmtSubscriber;

mod cli;
mod cycle;
mod settings;
mod ui;

/// Rows of the price table shown on the terminal card.
const CARD_PAGE_SIZE: usize = 10;

fn preprocess(trace_level: Level) -> Result<()> {
    dotenv().ok();
    // logs on stderr, the card on stdout
    let my_subscriber = FmtSubscriber::builder()
        .with_max_level(trace_level)
        .with_writer(std::io::stderr)
        .finish();
    subscriber::set_global_default(my_subscriber)?;
    Ok(())
}

#[actix_web::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.trace {
        TraceLevel::DEBUG => Level::DEBUG,
        TraceLevel::INFO => Level::INFO,
        TraceLevel::WARN => Level::WARN,
        TraceLevel::ERROR => Level::ERROR,
    };

    preprocess(log_level)?;
    trace!("Command line input recorded: {cli:#?}");

    // credential & knobs are read once, here
    let settings = Settings::load(&cli.feed)?;
    let source: Arc<dyn QuoteSource> = Arc::new(AlphaVantage::new(settings.feed.clone())?);

    ////////////////////////////////////////////////////////////////////////////////////////////////////

    // cli framework:
    // "> pulse <COMMAND>"
    match &cli.command {
        // "> pulse snapshot"
        // one cycle, printed; a failed cycle is a failed run
        Snapshot => {
            let dashboard = cycle::refresh(source.as_ref(), &settings.dashboard).await?;
            let mut board = Board::default();
            board.record_success(dashboard);
            print!("{}", ui::card(&board, CARD_PAGE_SIZE));
        }

        // "> pulse watch"
        // redraw the card on every cycle until interrupted
        Watch => {
            let board = SharedBoard::default();
            let period = settings.period;
            let mut spinner: Option<indicatif::ProgressBar> = None;
            let redraw = move |board: &Board| {
                if let Some(pb) = spinner.take() {
                    pb.finish_and_clear();
                }
                print!("\x1B[2J\x1B[H{}", ui::card(board, CARD_PAGE_SIZE));
                spinner = Some(ui::waiting_pb(period));
            };

            tokio::select! {
                _ = cycle::poll(source, settings.dashboard, board, period, redraw) => {}
                _ = tokio::signal::ctrl_c() => info!("interrupted, stopping"),
            }
        }

        // "> pulse serve [--host --port --page-size]"
        // refresh in the background, serve the board over HTTP
        Serve {
            host,
            port,
            page_size,
        } => {
            let board = SharedBoard::default();
            let poller = tokio::spawn(cycle::poll(
                source,
                settings.dashboard,
                board.clone(),
                settings.period,
                |_: &Board| {},
            ));

            let served = pulse_web::serve(
                board,
                WebSettings {
                    page_size: *page_size,
                },
                (host.clone(), *port),
            )
            .await;

            poller.abort();
            served?;
        }
    }

    Ok(())
}

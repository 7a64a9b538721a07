#![cfg(not(tarpaulin_include))]

use clap::Parser;
use robodesk_grid::app;
use robodesk_grid::config::{DEFAULT_COLS, DEFAULT_NAME, DEFAULT_ROWS, GridConfig};
use std::net::SocketAddr;

/// Serve the grid editor over HTTP
#[derive(Parser, Debug)]
#[command(name = "website", about = "RoboDesk grid web service")]
struct Args {
    /// Number of grid rows
    #[arg(long, env = "ROBODESK_ROWS", default_value_t = DEFAULT_ROWS)]
    rows: usize,
    /// Number of grid columns
    #[arg(long, env = "ROBODESK_COLS", default_value_t = DEFAULT_COLS)]
    cols: usize,
    /// Initial table name
    #[arg(long, env = "ROBODESK_NAME", default_value = DEFAULT_NAME)]
    name: String,
    /// Auto-fit columns with real font metrics
    #[arg(long, env = "ROBODESK_FONT_METRICS")]
    font_metrics: bool,
    /// Address to listen on
    #[arg(long, env = "ROBODESK_BIND", default_value = "127.0.0.1:3000")]
    bind: SocketAddr,
}

/// Main entry point for the web application
///
/// Reads the grid dimensions and listen address from the command line (or
/// the `ROBODESK_*` environment variables) and runs the server until it is
/// stopped. Log output is controlled with `RUST_LOG`.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = GridConfig::new(args.rows, args.cols, args.name)
        .with_font_metrics(args.font_metrics);

    app::run(config, args.bind).await
}

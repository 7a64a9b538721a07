#![cfg(not(tarpaulin_include))]

use clap::Parser;
use robodesk_grid::command::{self, Command, Outcome};
use robodesk_grid::config::{DEFAULT_COLS, DEFAULT_NAME, DEFAULT_ROWS, GridConfig};
use robodesk_grid::spreadsheet::Spreadsheet;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

/// Edit a grid from the terminal and export it as CSV or PNG
#[derive(Parser, Debug)]
#[command(name = "cli", about = "Interactive RoboDesk grid editor")]
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
    /// Directory exports are written to when no directory is given
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();
    let config = GridConfig::new(args.rows, args.cols, args.name)
        .with_font_metrics(args.font_metrics);
    config.validate()?;

    let mut sheet = Spreadsheet::from_config(&config);
    let mut status = String::from("ok");
    let mut start_time = Instant::now();

    println!("{}", command::display(&sheet, 10));
    loop {
        let elapsed_time = start_time.elapsed().as_secs_f64();
        print!("[{:.1}] ({}) > ", elapsed_time, status);
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }
        start_time = Instant::now();

        if line.trim().is_empty() {
            status = String::from("invalid command");
            continue;
        }

        let outcome = Command::parse(&line, &sheet)
            .and_then(|cmd| command::execute(&mut sheet, cmd, &args.out_dir));

        match outcome {
            Ok(Outcome::Quit) => break,
            Ok(Outcome::Status(s)) => status = s,
            Ok(Outcome::Output(text)) => {
                println!("{}", text);
                status = String::from("ok");
            }
            Err(e) => status = e.to_string(),
        }
    }

    Ok(())
}

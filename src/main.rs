use clap::Parser;
use std::fs;
use std::process::ExitCode;

use crossfill::grid_config::load_grid_config;
use crossfill::{find_fill_with_timeout, render_grid, FillFailure};
use instant::Duration;

/// Fill a crossword structure with words from a vocabulary
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Structure file: `_` marks an open cell, anything else a block
    structure: String,

    /// Words file, one word per line
    words: String,

    /// Optional file to write the filled grid to
    output: Option<String>,

    /// Give up after this many seconds
    #[arg(short, long)]
    timeout_secs: Option<u64>,

    /// Print fill statistics to stderr
    #[arg(short, long)]
    stats: bool,
}

fn main() -> ExitCode {
    let debug_enabled = std::env::var("CROSSFILL_DEBUG").is_ok();
    crossfill::log::init_logger(debug_enabled);

    if let Err(e) = try_main() {
        eprintln!("Error: {e}");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn try_main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_grid_config(&cli.structure, &cli.words)?;
    let timeout = cli.timeout_secs.map(Duration::from_secs);

    match find_fill_with_timeout(&config, timeout) {
        Ok(result) => {
            let display_grid = render_grid(&config, &result.assignment);
            println!("{}", display_grid);

            if cli.stats {
                eprintln!("{:?}", result.statistics);
            }

            if let Some(output) = &cli.output {
                fs::write(output, display_grid + "\n")?;
                log::info!("Wrote filled grid to {}", output);
            }
        }
        Err(FillFailure::Timeout(elapsed)) => return Err(FillFailure::Timeout(elapsed).into()),
        Err(failure) => {
            log::debug!("{}", failure);
            println!("No solution.");
        }
    }

    Ok(())
}

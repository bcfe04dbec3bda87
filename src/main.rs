/*!
 * Command-line interface for flatdir
 */

use std::io::{self, IsTerminal};
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, LevelFilter};

use flatdir::config::{Args, Command, Config};
use flatdir::report::Reporter;

fn main() {
    // Parse command line arguments
    let args = Args::parse();
    setup_logging(args.quiet, args.verbose);
    debug!("CLI args parsed: {:?}", args);

    let config = match args.command {
        None => {
            // No subcommand is a request for help, not an error
            let _ = Args::command().print_help();
            println!();
            return;
        }
        Some(Command::Completions { shell }) => {
            clap_complete::generate(shell, &mut Args::command(), "flatdir", &mut io::stdout());
            return;
        }
        Some(Command::Flatten(flatten)) => Config::from_flatten_args(flatten),
        Some(Command::Concat(concat)) => Config::from_concat_args(concat),
    };

    let progress = Arc::new(create_progress(args.quiet));

    match flatdir::run(&config, Arc::clone(&progress)) {
        Ok(summary) => {
            progress.finish_and_clear();
            let reporter = Reporter::new();
            println!("{}", reporter.confirmation(&summary));
            if config.show_summary {
                println!("{}", reporter.summary_table(&summary));
            }
        }
        Err(e) => {
            progress.finish_and_clear();
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn setup_logging(quiet: bool, verbose: u8) {
    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();
}

/// Progress bar on an interactive stderr, hidden otherwise
fn create_progress(quiet: bool) -> ProgressBar {
    if quiet || !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }

    let progress = ProgressBar::new(0);
    if let Ok(style) =
        ProgressStyle::default_bar().template("{spinner:.green} {msg:.dim} {pos}/{len} ({elapsed})")
    {
        progress.set_style(style);
    }
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}

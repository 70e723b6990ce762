//! The interactive red-black tree console.
use std::{io, path::PathBuf, process::ExitCode};

use clap::Parser;
use redblack::{Config, Shell};
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};

#[derive(clap::Parser)]
#[command(version, about)]
struct Args {
    /// The smallest key accepted by ADD and DELETE
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    min: i32,
    /// The largest key accepted by ADD and DELETE
    #[arg(long, default_value_t = 999, allow_negative_numbers = true)]
    max: i32,
    /// The file loaded by READ
    #[arg(long, default_value = "numbers.txt")]
    numbers: PathBuf,
    /// The number of spaces per tree level used by PRINT
    #[arg(long, default_value_t = 10)]
    indent: usize,
    /// Log more (repeat for even more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    // Logs go to stderr so that they don't interleave with the console
    if let Err(e) = TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("failed to initialize logging: {}", e);
    }

    let config = match Config::new(args.min, args.max) {
        Ok(config) => Config {
            numbers_path: args.numbers,
            indent: args.indent,
            ..config
        },
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    log::debug!("{:?}", config);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = Shell::new(config, stdin.lock(), stdout.lock());
    match shell.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

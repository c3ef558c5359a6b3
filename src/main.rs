use std::fs::{self, File};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use reel::cli::{self, Command};
use reel::core::App;
use reel::core::config::{self, ResolvedConfig};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "reel", about = "Browse movies and keep saved / watched lists")]
struct Args {
    /// Directory for the library and log file (default: ~/.reel)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Keep the library in memory for this run only
    #[arg(long, global = true)]
    memory: bool,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Initialize file logger - writes to reel.log in the data directory
fn init_logging(config: &ResolvedConfig, verbose: bool) {
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    if fs::create_dir_all(&config.data_dir).is_err() {
        return;
    }
    if let Ok(log_file) = File::create(config.log_path()) {
        let _ = WriteLogger::init(level, log_config, log_file);
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let resolved = config::resolve(&file_config, args.data_dir.as_deref());
    init_logging(&resolved, args.verbose);

    log::info!("reel starting up, data dir {}", resolved.data_dir.display());

    let app = App::from_config(&resolved, args.memory);
    let mut stdout = std::io::stdout().lock();
    match cli::run(args.command, &app, resolved.trending_count, &mut stdout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Command failed: {}", e);
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

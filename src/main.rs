use clap::Parser;
use navhud::core::config::{self, CliOverrides, NavhudConfig};
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "navhud", about = "Heads-up notification and background task overlay")]
struct Args {
    /// Default banner timeout in seconds
    #[arg(short, long)]
    timeout: Option<f64>,

    /// Log file path
    #[arg(long)]
    log_file: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let (file_config, config_error) = match config::load_config() {
        Ok(c) => (c, None),
        Err(e) => (NavhudConfig::default(), Some(e)),
    };
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            timeout_secs: args.timeout,
            log_file: args.log_file,
            log_level: args.log_level,
        },
    );

    // Initialize file logger
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create(&resolved.log_file) {
        let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
    }

    if let Some(e) = config_error {
        log::warn!("{e}, falling back to default config");
    }
    log::info!(
        "navhud starting up (default timeout {} ms)",
        resolved.default_timeout.as_millis()
    );

    navhud::tui::run(&resolved)
}

use std::path::PathBuf;

use clap::Parser;
use eyedx_server::config::ServerConfig;
use eyedx_server::logging::{self, LoggingConfig};
use eyedx_server::server;
use eyedx_server::state::AppState;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "eyedx-server")]
#[command(about = "Prediction API - upload an eye image for classification")]
struct CliArgs {
    /// Host address to bind the server
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port number to bind the server
    #[arg(long, default_value_t = 8000)]
    port: u16,

    /// Path to the serialized classification model
    #[arg(long)]
    model_path: PathBuf,

    /// Directory whose subdirectory names define the class labels
    #[arg(long)]
    class_dir: PathBuf,

    /// Maximum accepted upload size in bytes
    #[arg(long, default_value_t = 10 * 1024 * 1024)]
    max_upload_bytes: usize,

    /// Log level
    #[arg(long, default_value = "info", value_parser = ["trace", "debug", "info", "warn", "error"])]
    log_level: String,

    /// Directory for rolling log files (stdout only if unset)
    #[arg(long)]
    log_dir: Option<String>,

    /// Emit logs as JSON
    #[arg(long, default_value_t = false)]
    log_json: bool,
}

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let _log_guard = logging::init_logging(LoggingConfig {
        level,
        json_format: args.log_json,
        log_dir: args.log_dir,
        ..Default::default()
    });

    let config = ServerConfig {
        host: args.host,
        port: args.port,
        model_path: args.model_path,
        class_dir: args.class_dir,
        max_upload_bytes: args.max_upload_bytes,
    };
    config.validate()?;

    let state = AppState::from_config(&config)?;
    actix_web::rt::System::new().block_on(server::startup(config, state))?;
    Ok(())
}

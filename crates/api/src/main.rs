//! API server entry point.

use std::process::ExitCode;

use health_api::config::{Config, LogFormat};
use health_api::error::ServerError;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn run(config: Config) -> Result<(), ServerError> {
    let app = health_api::create_app(&config);

    let addr = config.addr();
    let listener = health_api::bind(&addr).await?;
    tracing::info!(%addr, version = %config.version, "starting API server");

    health_api::serve(listener, app, health_api::shutdown_signal()).await
}

#[tokio::main]
async fn main() -> ExitCode {
    // 1. Load configuration; tracing is not up yet, so report on stderr
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", ServerError::from(err));
            return ExitCode::FAILURE;
        }
    };

    // 2. Initialize tracing
    init_tracing(&config);
    if let Some(raw) = &config.rejected_log_format {
        tracing::warn!(value = %raw, "unrecognised LOG_FORMAT, using pretty output");
    }

    // 3. Serve until SIGINT/SIGTERM
    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "server terminated");
            ExitCode::FAILURE
        }
    }
}

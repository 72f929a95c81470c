// src/main.rs

use axum::serve;
use group_config_admin::{
    cli::{Cli, Commands},
    groups::{GroupRepository, JsonFileRepository},
    run, AppError, Settings,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { info!(signal = "Ctrl+C", "Received signal. Initiating graceful shutdown...") },
        () = terminate => { info!(signal = "Terminate", "Received signal. Initiating graceful shutdown...") },
    }
}

fn init_tracing(json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(fmt::layer().json().with_current_span(true).with_span_list(true))
            .init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

/// Loads the groups file once and reports what it holds.
async fn check(cli: &Cli) -> Result<(), AppError> {
    let settings = Settings::load(&cli.overrides())?;
    let repository = JsonFileRepository::new(settings.groups_path());
    let document = repository.load().await?;
    info!(
        groups.path = %repository.path().display(),
        groups.count = document.groups.len(),
        groups.emails = document.total_emails(),
        groups.skipped = document.groups.iter().filter(|g| g.skip).count(),
        "Groups file is valid"
    );
    Ok(())
}

async fn serve_app(cli: &Cli) -> Result<(), AppError> {
    let (app, settings) = run(&cli.overrides())?;

    let addr: SocketAddr = format!("{}:{}", settings.host, settings.port)
        .parse()
        .map_err(|e| AppError::Configuration(format!("Invalid bind address: {e}")))?;
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        error!(server.address = %addr, error = ?e, "Failed to bind to address. Exiting.");
        AppError::from(e)
    })?;
    info!(server.address = %addr, "Server listening");

    serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!(error = ?e, "Server run loop encountered an error. Exiting.");
            AppError::from(e)
        })?;

    info!("Server shut down gracefully.");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenv::dotenv().ok();

    let cli = Cli::parse_args();
    init_tracing(cli.json_logs);

    let result = match cli.command() {
        Commands::Serve => serve_app(&cli).await,
        Commands::Check => check(&cli).await,
    };

    result.map_err(|e| {
        error!(error = %e, "Fatal error. Exiting.");
        eprintln!("Application setup error: {e}");
        e
    })
}

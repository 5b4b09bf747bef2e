use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use student_registry::{
    api,
    config::{self, Config},
    logging,
    store::MongoStudentStore,
    students::StudentService,
};
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(
    name = "student-registry",
    about = "HTTP CRUD service for student records stored in MongoDB"
)]
struct Cli {
    /// Port to listen on; overrides `SERVER_PORT`.
    #[arg(long)]
    port: Option<u16>,
    /// Dotenv file to load instead of `./.env`.
    #[arg(long)]
    env_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    config::load_dotenv(cli.env_file.as_deref()).context("failed to load env file")?;
    let mut config = Config::from_env().context("failed to load config from environment")?;
    if let Some(port) = cli.port {
        config.server_port = Some(port);
    }

    logging::init_tracing(config.log_file.as_deref());
    tracing::debug!(
        db = %config.db_name,
        collection = %config.collection_name,
        server_port = ?config.server_port,
        "Loaded configuration"
    );

    let store = MongoStudentStore::connect(&config)
        .await
        .context("failed to initialize MongoDB client")?;
    let app = api::create_router(Arc::new(StudentService::new(store)));

    let (listener, port) = bind_listener(config.server_port)
        .await
        .context("failed to bind listener")?;
    tracing::info!("Listening on http://0.0.0.0:{}", port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated unexpectedly")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn bind_listener(server_port: Option<u16>) -> Result<(TcpListener, u16), std::io::Error> {
    use std::net::Ipv4Addr;

    if let Some(port) = server_port {
        return TcpListener::bind((Ipv4Addr::UNSPECIFIED, port))
            .await
            .map(|listener| (listener, port));
    }

    const PORT_RANGE: std::ops::RangeInclusive<u16> = 8000..=8099;
    for port in PORT_RANGE {
        match TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)).await {
            Ok(listener) => {
                tracing::debug!(port, "Bound server port");
                return Ok((listener, port));
            }
            Err(err) if err.kind() == std::io::ErrorKind::AddrInUse => {
                tracing::debug!(port, "Port already in use; trying next");
                continue;
            }
            Err(err) => return Err(err),
        }
    }

    Err(std::io::Error::new(
        std::io::ErrorKind::AddrNotAvailable,
        "No available port found in range 8000-8099",
    ))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

//! # Bazaar Binary
//!
//! Assembles the server from the plugins enabled at compile time.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use bz_api::{ApiOptions, AppState};
use bz_config::{LogFormat, Settings};
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[cfg(feature = "db-sqlite")]
use bz_db_sqlite::SqliteDocumentStore;

#[cfg(feature = "storage-local")]
use bz_storage_local::LocalMediaStore;

#[cfg(feature = "auth-jwt")]
use bz_auth_jwt::JwtAuthProvider;

fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Pretty => registry.with(fmt::layer().with_target(true)).init(),
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = bz_config::load_dotenv();
    let settings = Settings::load().context("failed to load settings")?;
    init_logging(settings.log_format);
    dotenv.log();

    // 1. Database: must be reachable before we listen
    #[cfg(feature = "db-sqlite")]
    let db = SqliteDocumentStore::connect(&settings.database_url).await?;

    // 2. Media storage
    #[cfg(feature = "storage-local")]
    let store = LocalMediaStore::new(
        settings.upload_dir.clone(),
        settings.media_url_prefix.clone(),
    );
    #[cfg(feature = "storage-local")]
    let media_root: Option<PathBuf> = Some(settings.upload_dir.clone());

    // 3. Bearer token verification
    #[cfg(feature = "auth-jwt")]
    let auth = JwtAuthProvider::new(&settings.jwt_secret);

    let state = Arc::new(AppState {
        listings: Box::new(db.clone()),
        users: Box::new(db),
        store: Box::new(store),
        auth: Box::new(auth),
    });

    let app = bz_api::router(
        state,
        &ApiOptions {
            media_root,
            media_url_prefix: settings.media_url_prefix.clone(),
            max_upload_bytes: settings.max_upload_bytes,
        },
    );

    let address = settings.bind_addr()?;
    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    tracing::info!(%address, database = %settings.database_url, "bazaar listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        tracing::info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

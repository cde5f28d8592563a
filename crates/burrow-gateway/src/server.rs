use std::future::IntoFuture;
use std::sync::Arc;

use anyhow::Context;
use burrow_core::Repository;
use burrow_generator::RandomGenerator;
use burrow_shortener::{ShortenerService, ShortenerSettings};
use burrow_storage::{InMemoryRepository, SqliteRepository};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::app::App;
use crate::auth::StaticCredentials;
use crate::config::{Cli, StorageBackendArg};
use crate::state::AppState;

/// Opens the configured storage and serves HTTP until a shutdown signal.
pub async fn run(config: Cli) -> anyhow::Result<()> {
    match config.storage {
        StorageBackendArg::Sqlite => {
            let path = config
                .storage_path
                .clone()
                .context("storage path is required when storage backend is sqlite")?;
            let repository = SqliteRepository::connect(&path)
                .await
                .with_context(|| format!("failed to init storage at {}", path.display()))?;
            serve(config, Arc::new(repository)).await
        }
        StorageBackendArg::InMemory => serve(config, Arc::new(InMemoryRepository::new())).await,
    }
}

/// Builds the application state over `repository`.
pub fn build_state<R: Repository>(config: &Cli, repository: Arc<R>) -> anyhow::Result<AppState> {
    let generator = RandomGenerator::new(config.alias_length.get())?;
    let settings = ShortenerSettings::builder()
        .max_attempts(config.alias_max_attempts.get())
        .build();
    let shortener = ShortenerService::from_shared(repository, Arc::new(generator), settings);
    let authorizer = StaticCredentials::new(&config.admin_user, &config.admin_password);

    Ok(AppState::new(
        Arc::new(shortener),
        Arc::new(authorizer),
        &config.public_base_url,
    ))
}

async fn serve<R: Repository>(config: Cli, repository: Arc<R>) -> anyhow::Result<()> {
    let state = build_state(&config, Arc::clone(&repository))?;
    let router = App::router(state, config.request_timeout());

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(listen_addr = %listener.local_addr()?, "server started");

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let mut server = tokio::spawn(
        axum::serve(listener, router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = stop_rx.await;
            })
            .into_future(),
    );

    tokio::select! {
        _ = shutdown_signal() => {}
        result = &mut server => {
            error!("server exited before a shutdown signal");
            close_storage(repository.as_ref(), config.shutdown_timeout()).await;
            return result?.context("server failed");
        }
    }

    info!("stopping server");
    let _ = stop_tx.send(());

    let deadline = config.shutdown_timeout();
    match timeout(deadline, server).await {
        Ok(Ok(Ok(()))) => info!("server drained"),
        Ok(Ok(Err(err))) => error!(error = %err, "server failed while draining"),
        Ok(Err(err)) => error!(error = %err, "server task aborted"),
        Err(_) => warn!(?deadline, "server did not drain in time"),
    }

    close_storage(repository.as_ref(), deadline).await;
    info!("server stopped");

    Ok(())
}

/// Closes storage within `deadline`. A timeout is logged and otherwise
/// ignored so that the process can still exit.
async fn close_storage<R: Repository>(repository: &R, deadline: std::time::Duration) {
    if let Err(err) = repository.close(deadline).await {
        error!(error = %err, "failed to close storage");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received ctrl-c"),
        _ = terminate => info!("received SIGTERM"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn config(alias_length: &str) -> Cli {
        Cli::try_parse_from([
            "burrow",
            "--admin-user",
            "admin",
            "--admin-password",
            "secret",
            "--storage-path",
            "storage.db",
            "--alias-length",
            alias_length,
        ])
        .unwrap()
    }

    #[test]
    fn build_state_accepts_longest_short_code() {
        let repository = Arc::new(InMemoryRepository::new());
        assert!(build_state(&config("64"), repository).is_ok());
    }

    #[test]
    fn build_state_rejects_alias_length_beyond_short_code_limit() {
        let repository = Arc::new(InMemoryRepository::new());
        let err = build_state(&config("100"), repository)
            .err()
            .expect("expected build_state to fail");
        assert!(err.to_string().contains("100"), "unexpected error: {err}");
    }
}

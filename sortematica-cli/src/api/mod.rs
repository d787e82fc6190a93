//! JSON API over the statistics engine.
//!
//! Every handler answers `200 OK`; a failure is a JSON object carrying an
//! `"erro"` message, which is what the existing front-end checks for.

pub mod handlers;
pub mod routes;
pub mod state;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};

use sortematica_data::loader::DrawStore;

use crate::config::AppConfig;

pub use routes::create_router;
pub use state::AppState;

pub async fn serve(config: &AppConfig) -> Result<()> {
    let store = DrawStore::new(&config.data_dir);
    let state = tokio::task::spawn_blocking({
        let max_tickets = config.max_tickets;
        move || AppState::warm(store, max_tickets)
    })
    .await
    .context("Falha ao gerar as análises iniciais")?;

    let app = create_router(state, &config.static_dir);
    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Impossível escutar em {}", config.bind))?;

    info!(bind = %config.bind, data_dir = %config.data_dir.display(), "servidor iniciado");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Falha no servidor HTTP")?;

    info!("servidor encerrado");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Falha ao instalar o handler de Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => error!("Falha ao instalar o handler de SIGTERM: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

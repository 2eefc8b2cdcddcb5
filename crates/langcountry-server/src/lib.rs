//! LangCountry HTTP server
//!
//! The thin web layer around `langcountry-i18n`:
//!
//! - **Middleware**: binds a locale to every request's session
//! - **Routes**: locale switching, locale views and health
//! - **Stores**: session values and user preferences behind async traits

#![warn(clippy::all)]

pub mod error;
pub mod middleware;
pub mod routes;
pub mod session;
pub mod state;
pub mod users;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use crate::session::SessionStore;
use axum::Router;
use langcountry_common_config::LangCountryConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, info, warn};

/// How often idle sessions are swept while the server runs.
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(30);

/// Server builder for constructing and running the HTTP server.
pub struct Server {
    config: LangCountryConfig,
    state: AppState,
}

impl Server {
    /// Create a server, building the locale service from configuration.
    pub fn new(config: LangCountryConfig) -> Result<Self, anyhow::Error> {
        let service = config.build_service()?;
        let state = AppState::new(service, &config);
        Ok(Self { config, state })
    }

    /// Create a server around prepared state.
    pub fn with_state(config: LangCountryConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Build the router with all routes and middleware.
    pub fn router(&self) -> Router {
        routes::create_router(self.state.clone())
    }

    /// Run the server until a shutdown signal arrives.
    pub async fn run(self) -> Result<(), anyhow::Error> {
        let addr = self.addr()?;
        let listener = TcpListener::bind(addr).await?;

        info!(
            address = %addr,
            locales = self.state.service.allow_list().len(),
            "server listening"
        );

        let sweeper = start_session_sweeper(self.state.sessions.clone(), SESSION_SWEEP_INTERVAL);

        let served = axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await;

        sweeper.abort();
        served?;
        Ok(())
    }

    /// The configured socket address.
    pub fn addr(&self) -> Result<SocketAddr, anyhow::Error> {
        Ok(self.config.server.bind_address().parse()?)
    }
}

/// Periodically drop idle sessions from the store.
pub fn start_session_sweeper(store: Arc<dyn SessionStore>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticks = interval(every);
        loop {
            ticks.tick().await;
            match store.purge_expired().await {
                Ok(0) => {}
                Ok(purged) => debug!(purged, "idle sessions purged"),
                Err(err) => warn!(error = %err, "session sweep failed"),
            }
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for Ctrl+C");
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
                warn!(error = %err, "failed to install SIGTERM handler");
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

    info!("shutdown signal received, starting graceful shutdown");
}

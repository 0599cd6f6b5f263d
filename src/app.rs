use crate::config::Config;
use crate::state::AppState;
use crate::store;
use crate::tvmaze::TvMazeApi;
use crate::utils::fmt_duration;
use crate::web::create_router;
use crate::web::proxy::SearchProxy;
use anyhow::Context;
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{error, info, warn};

/// The search proxy service with its store and upstream client wired up.
pub struct App {
    config: Config,
    app_state: AppState,
}

impl App {
    pub fn new(config: Config) -> Result<Self, anyhow::Error> {
        let store = store::from_url(&config.redis_url).context("Failed to open cache store")?;
        let api = TvMazeApi::new(&config.tvmaze_base_url, config.upstream_rate_limit)
            .context("Failed to create TVMaze client")?;

        info!(
            upstream = %api.base_url(),
            cache_ttl = fmt_duration(config.cache_ttl()),
            upstream_rate_limit = config.upstream_rate_limit,
            "search proxy configured"
        );

        let proxy = SearchProxy::new(store, Arc::new(api), config.cache_ttl());
        Ok(App {
            app_state: AppState::new(proxy),
            config,
        })
    }

    /// Serve until a shutdown signal arrives, then give in-flight requests
    /// `SHUTDOWN_TIMEOUT` to finish.
    pub async fn run(self) -> ExitCode {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.port));
        let listener = match TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(e) => {
                error!(error = ?e, %addr, "failed to bind listener");
                return ExitCode::FAILURE;
            }
        };
        info!(%addr, "search proxy listening");

        let router = create_router(self.app_state);
        let (signalled_tx, signalled_rx) = oneshot::channel();
        let server = axum::serve(listener, router).with_graceful_shutdown(async move {
            wait_for_signal().await;
            let _ = signalled_tx.send(());
        });
        let mut server = tokio::spawn(async move { server.await });

        let timeout = self.config.shutdown_timeout;
        tokio::select! {
            joined = &mut server => return exit_code(joined),
            _ = signalled_rx => {}
        }

        info!(timeout = fmt_duration(timeout), "draining in-flight requests");
        match tokio::time::timeout(timeout, server).await {
            Ok(joined) => exit_code(joined),
            Err(_) => {
                warn!("graceful shutdown timed out");
                ExitCode::FAILURE
            }
        }
    }
}

fn exit_code(joined: Result<std::io::Result<()>, tokio::task::JoinError>) -> ExitCode {
    match joined {
        Ok(Ok(())) => {
            info!("search proxy stopped");
            ExitCode::SUCCESS
        }
        Ok(Err(e)) => {
            error!(error = ?e, "server error");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!(error = ?e, "server task panicked");
            ExitCode::FAILURE
        }
    }
}

async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = ?e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = ?e, "failed to listen for SIGTERM");
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

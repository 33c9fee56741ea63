//! Static server with live reload

use anyhow::{Context, Result};
use axum::routing::get;
use axum::Router;
use std::future::Future;
use std::path::Path;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod livereload;
pub mod watch;

pub use livereload::{LiveReload, LIVE_RELOAD_PATH};

/// Routes for a built presentation. Without `reload` only static files are served.
pub fn router(dest_dir: &Path, reload: Option<LiveReload>) -> Router {
    let router = match reload {
        Some(reload) => Router::new().route(LIVE_RELOAD_PATH, get(livereload::events)).with_state(reload),
        None => Router::new(),
    };
    router
        .fallback_service(ServeDir::new(dest_dir).append_index_html_on_directories(true))
        .layer(TraceLayer::new_for_http())
}

pub fn url(host: &str, port: u16) -> String {
    format!("http://{host}:{port}")
}

pub async fn bind(host: &str, port: u16) -> Result<TcpListener> {
    TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed binding {}", url(host, port)))
}

/// Serve until `shutdown` resolves.
pub async fn run<F>(listener: TcpListener, router: Router, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("serving on {}", addr);
    }
    axum::serve(listener, router).with_graceful_shutdown(shutdown).await.context("Server failed")
}

/// Resolves on Ctrl-C.
pub async fn ctrl_c() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed listening for Ctrl-C: {err}");
        std::future::pending::<()>().await;
    }
}

/// A server running in the background, stopped with [`BackgroundServer::stop`].
pub struct BackgroundServer {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<Result<()>>,
}

impl BackgroundServer {
    pub fn spawn(listener: TcpListener, router: Router) -> Self {
        let (shutdown, signal) = oneshot::channel::<()>();
        let task = tokio::spawn(run(listener, router, async move {
            let _ = signal.await;
        }));
        Self { shutdown, task }
    }

    pub async fn stop(self) -> Result<()> {
        let _ = self.shutdown.send(());
        self.task.await.context("Server task panicked")?
    }
}

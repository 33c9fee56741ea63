//! Live-reload notifications over server-sent events

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{self, Stream};
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::broadcast;

pub const LIVE_RELOAD_PATH: &str = "/__livereload";

const HEARTBEAT: Duration = Duration::from_secs(15);

/// Fan-out of rebuild notifications to every connected page.
#[derive(Debug, Clone)]
pub struct LiveReload {
    tx: broadcast::Sender<()>,
}

impl Default for LiveReload {
    fn default() -> Self {
        Self::new()
    }
}

impl LiveReload {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self { tx }
    }

    /// Tell connected pages to reload. Returns how many were listening.
    pub fn notify(&self) -> usize {
        self.tx.send(()).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }
}

/// `GET /__livereload`
pub async fn events(State(reload): State<LiveReload>) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    Sse::new(reload_stream(reload.subscribe())).keep_alive(KeepAlive::new().interval(HEARTBEAT))
}

/// One `reload` event per notification. A lagging client reloads once for all it missed.
pub fn reload_stream(
    receiver: broadcast::Receiver<()>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    stream::unfold(receiver, |mut rx| async move {
        match rx.recv().await {
            Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => {
                Some((Ok(Event::default().event("reload").data("reload")), rx))
            }
            Err(broadcast::error::RecvError::Closed) => None,
        }
    })
}

use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use futures_util::FutureExt;
use news_core::CycleId;
use news_logging::{news_debug, news_error, news_info};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::fetch::{ArticleFetcher, FetchSettings, ReqwestArticleFetcher};
use crate::{EngineEvent, FailureKind, FetchError};

enum EngineCommand {
    Enqueue { cycle: CycleId, url: String },
    Cancel { cycle: CycleId },
    Shutdown,
}

/// Runs fetches on a dedicated worker thread and hands completions back
/// through a channel the interactive thread polls.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: FetchSettings) -> Self {
        Self::with_fetcher(Arc::new(ReqwestArticleFetcher::new(settings)))
    }

    pub fn with_fetcher(fetcher: Arc<dyn ArticleFetcher>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || run_worker(fetcher, cmd_rx, event_tx));

        Self { cmd_tx, event_rx }
    }

    pub fn enqueue(&self, cycle: CycleId, url: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Enqueue {
            cycle,
            url: url.into(),
        });
    }

    /// The fetch keeps running only until its next await point; its result is
    /// never sent.
    pub fn cancel(&self, cycle: CycleId) {
        let _ = self.cmd_tx.send(EngineCommand::Cancel { cycle });
    }

    /// Cancels everything in flight and stops the worker thread.
    pub fn shutdown(&self) {
        let _ = self.cmd_tx.send(EngineCommand::Shutdown);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_worker(
    fetcher: Arc<dyn ArticleFetcher>,
    cmd_rx: mpsc::Receiver<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            news_error!("Failed to start fetch runtime: {}", err);
            reject_all(cmd_rx, event_tx, err.to_string());
            return;
        }
    };

    let mut in_flight: HashMap<CycleId, (CancellationToken, JoinHandle<()>)> = HashMap::new();
    while let Ok(command) = cmd_rx.recv() {
        in_flight.retain(|_, (_, handle)| !handle.is_finished());
        match command {
            EngineCommand::Enqueue { cycle, url } => {
                let token = CancellationToken::new();
                let handle = runtime.spawn(run_fetch(
                    fetcher.clone(),
                    cycle,
                    url,
                    token.clone(),
                    event_tx.clone(),
                ));
                if let Some((previous, _)) = in_flight.insert(cycle, (token, handle)) {
                    previous.cancel();
                }
            }
            EngineCommand::Cancel { cycle } => {
                if let Some((token, _)) = in_flight.remove(&cycle) {
                    news_debug!("Cancelling fetch for cycle {}", cycle);
                    token.cancel();
                }
            }
            EngineCommand::Shutdown => break,
        }
    }

    for (token, _) in in_flight.values() {
        token.cancel();
    }
    news_info!("Fetch worker stopped with {} fetches in flight", in_flight.len());
    runtime.shutdown_background();
}

async fn run_fetch(
    fetcher: Arc<dyn ArticleFetcher>,
    cycle: CycleId,
    url: String,
    token: CancellationToken,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let fetch = AssertUnwindSafe(fetcher.fetch(&url)).catch_unwind();
    let result = match token.run_until_cancelled(fetch).await {
        Some(outcome) if !token.is_cancelled() => outcome.unwrap_or_else(|panic| {
            let reason = panic_message(panic.as_ref());
            news_error!("Fetcher panicked for cycle {}: {}", cycle, reason);
            Err(FetchError::new(
                FailureKind::Network,
                format!("fetch aborted: {reason}"),
            ))
        }),
        _ => {
            news_debug!("Fetch for cycle {} cancelled, result dropped", cycle);
            return;
        }
    };
    let _ = event_tx.send(EngineEvent::FetchCompleted { cycle, result });
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(text) = panic.downcast_ref::<&str>() {
        text
    } else if let Some(text) = panic.downcast_ref::<String>() {
        text
    } else {
        "unknown panic"
    }
}

// Without a runtime nothing can be fetched; fail each request instead of
// leaving the caller waiting.
fn reject_all(
    cmd_rx: mpsc::Receiver<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
    reason: String,
) {
    while let Ok(command) = cmd_rx.recv() {
        match command {
            EngineCommand::Enqueue { cycle, .. } => {
                let _ = event_tx.send(EngineEvent::FetchCompleted {
                    cycle,
                    result: Err(FetchError::new(FailureKind::Network, reason.clone())),
                });
            }
            EngineCommand::Cancel { .. } => {}
            EngineCommand::Shutdown => break,
        }
    }
}

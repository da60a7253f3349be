use std::time::{Duration, Instant};

use news_core::{
    update, Effect, FailureKind, LoadFailure, LoadState, LoaderState, LoaderView, Msg,
    NewsArticle, Notification, SearchEndpoint,
};
use news_engine::{EngineEvent, EngineHandle, FetchError};
use news_logging::{news_debug, news_info};

use crate::{Connectivity, SettingsSource};

/// Presentation-side receiver of load transitions.
///
/// Called only from the thread that drives the controller. Per completed
/// cycle exactly one of `on_load_succeeded`, `on_load_failed` or
/// `on_no_connectivity` fires.
pub trait LoadObserver {
    fn on_loading_started(&mut self);
    fn on_load_succeeded(&mut self, articles: &[NewsArticle]);
    fn on_load_failed(&mut self, failure: &LoadFailure);
    fn on_no_connectivity(&mut self);
    /// Consumer torn down; drop any rows being shown.
    fn on_reset(&mut self);
}

/// Owns one consumer's load lifecycle.
///
/// Triggers (`start`, `restart`, `dispose`) and `pump*` must be called from
/// the consumer's interactive thread; fetches run on the engine worker.
pub struct LoadController<O: LoadObserver> {
    state: LoaderState,
    engine: EngineHandle,
    connectivity: Box<dyn Connectivity>,
    settings: Box<dyn SettingsSource>,
    observer: O,
}

impl<O: LoadObserver> LoadController<O> {
    pub fn new(
        engine: EngineHandle,
        connectivity: Box<dyn Connectivity>,
        settings: Box<dyn SettingsSource>,
        observer: O,
    ) -> Self {
        Self {
            state: LoaderState::new(),
            engine,
            connectivity,
            settings,
            observer,
        }
    }

    /// Replaces the search endpoint. Intended for construction, before `start`.
    pub fn with_endpoint(mut self, endpoint: SearchEndpoint) -> Self {
        self.state = LoaderState::with_endpoint(endpoint);
        self
    }

    /// Consumer became ready. Reuses a cycle that is still loading.
    pub fn start(&mut self) {
        if self.state.is_disposed() || self.state.is_loading() {
            news_debug!("start() ignored in state {}", state_label(self.state.load()));
            return;
        }
        let msg = Msg::StartRequested {
            query: self.settings.load_query(),
            connected: self.connectivity.is_connected(),
        };
        self.dispatch(msg);
    }

    /// Manual refresh or settings change: always begins a new cycle and
    /// drops whatever is in flight.
    pub fn restart(&mut self) {
        if self.state.is_disposed() {
            news_debug!("restart() ignored, controller disposed");
            return;
        }
        let msg = Msg::RestartRequested {
            query: self.settings.load_query(),
            connected: self.connectivity.is_connected(),
        };
        self.dispatch(msg);
    }

    /// Tears the controller down. `on_reset` is the last observer call.
    pub fn dispose(&mut self) {
        if self.state.is_disposed() {
            return;
        }
        self.dispatch(Msg::Disposed);
        self.engine.shutdown();
    }

    /// Delivers completions that have already arrived. Returns how many
    /// engine events were processed.
    pub fn pump(&mut self) -> usize {
        let mut processed = 0;
        while let Some(event) = self.engine.try_recv() {
            self.handle_event(event);
            processed += 1;
        }
        processed
    }

    /// Blocks until the current cycle reaches a terminal state. Returns
    /// `false` if still loading when `timeout` elapses.
    pub fn pump_until_settled(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        self.pump();
        while self.state.is_loading() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            match self.engine.recv_timeout(remaining) {
                Some(event) => self.handle_event(event),
                None => return !self.state.is_loading(),
            }
        }
        true
    }

    pub fn state(&self) -> &LoaderState {
        &self.state
    }

    pub fn view(&self) -> LoaderView {
        self.state.view()
    }

    /// Articles of the last delivered cycle, empty otherwise.
    pub fn articles(&self) -> &[NewsArticle] {
        match self.state.load() {
            LoadState::Delivered(articles) => articles,
            _ => &[],
        }
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    fn handle_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::FetchCompleted { cycle, result } => {
                self.dispatch(Msg::FetchCompleted {
                    cycle,
                    result: result.map_err(to_load_failure),
                });
            }
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        for effect in effects {
            self.run_effect(effect);
        }
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::Fetch { cycle, url } => self.engine.enqueue(cycle, url),
            Effect::CancelFetch { cycle } => self.engine.cancel(cycle),
            Effect::Notify(notification) => match notification {
                Notification::LoadingStarted => self.observer.on_loading_started(),
                Notification::LoadSucceeded(articles) => {
                    self.observer.on_load_succeeded(&articles)
                }
                Notification::LoadFailed(failure) => self.observer.on_load_failed(&failure),
                Notification::NoConnectivity => self.observer.on_no_connectivity(),
                Notification::Reset => self.observer.on_reset(),
            },
        }
    }
}

impl<O: LoadObserver> Drop for LoadController<O> {
    fn drop(&mut self) {
        if !self.state.is_disposed() {
            news_info!("Load controller dropped without dispose()");
            self.dispose();
        }
    }
}

fn to_load_failure(err: FetchError) -> LoadFailure {
    let kind = match err.kind {
        news_engine::FailureKind::HttpStatus(code) => FailureKind::HttpStatus(code),
        news_engine::FailureKind::Timeout => FailureKind::Timeout,
        news_engine::FailureKind::Parse => FailureKind::Parse,
        news_engine::FailureKind::InvalidUrl
        | news_engine::FailureKind::TooLarge { .. }
        | news_engine::FailureKind::Network => FailureKind::Transport,
    };
    LoadFailure::new(kind, err.to_string())
}

fn state_label(state: &LoadState) -> &'static str {
    match state {
        LoadState::Idle => "Idle",
        LoadState::Loading { .. } => "Loading",
        LoadState::Delivered(_) => "Delivered",
        LoadState::Failed(_) => "Failed",
        LoadState::NoConnectivity => "NoConnectivity",
        LoadState::Disposed => "Disposed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_failures_collapse_onto_core_kinds() {
        let cases = [
            (news_engine::FailureKind::HttpStatus(404), FailureKind::HttpStatus(404)),
            (news_engine::FailureKind::Timeout, FailureKind::Timeout),
            (news_engine::FailureKind::Parse, FailureKind::Parse),
            (news_engine::FailureKind::Network, FailureKind::Transport),
            (news_engine::FailureKind::InvalidUrl, FailureKind::Transport),
            (
                news_engine::FailureKind::TooLarge {
                    max_bytes: 1,
                    actual: None,
                },
                FailureKind::Transport,
            ),
        ];
        for (engine_kind, expected) in cases {
            let failure = to_load_failure(FetchError::new(engine_kind, "boom"));
            assert_eq!(failure.kind, expected);
            assert!(failure.message.ends_with("boom"));
        }
    }
}

use news_logging::{news_debug, news_info, news_warn};

use crate::{build_search_url, Effect, LoadQuery, LoadState, LoaderState, Msg, Notification};

/// Pure update function: applies a message to state and returns any effects.
///
/// A result is accepted only while its cycle is the current `Loading` cycle,
/// so at most one terminal notification is produced per cycle. Once disposed
/// the state absorbs every message without effects.
pub fn update(mut state: LoaderState, msg: Msg) -> (LoaderState, Vec<Effect>) {
    if state.is_disposed() {
        if !matches!(msg, Msg::NoOp) {
            news_debug!("Loader disposed, ignoring {}", msg_label(&msg));
        }
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::StartRequested { query, connected } => {
            if let Some(cycle) = state.current_cycle() {
                news_debug!("Start ignored, cycle {} is still loading", cycle);
                return (state, Vec::new());
            }
            begin_cycle(&mut state, query, connected)
        }
        Msg::RestartRequested { query, connected } => begin_cycle(&mut state, query, connected),
        Msg::FetchCompleted { cycle, result } => {
            if state.current_cycle() != Some(cycle) {
                news_debug!(
                    "Discarding superseded result for cycle {} (current {:?})",
                    cycle,
                    state.current_cycle()
                );
                return (state, Vec::new());
            }
            match result {
                Ok(articles) => {
                    news_info!("Cycle {} delivered {} articles", cycle, articles.len());
                    state.set_load(LoadState::Delivered(articles.clone()));
                    vec![Effect::Notify(Notification::LoadSucceeded(articles))]
                }
                Err(failure) => {
                    news_warn!("Cycle {} failed: {}", cycle, failure);
                    state.set_load(LoadState::Failed(failure.clone()));
                    vec![Effect::Notify(Notification::LoadFailed(failure))]
                }
            }
        }
        Msg::Disposed => {
            let mut effects = Vec::with_capacity(2);
            if let Some(cycle) = state.current_cycle() {
                effects.push(Effect::CancelFetch { cycle });
            }
            news_info!("Loader disposed after {} cycles", state.last_cycle());
            state.set_load(LoadState::Disposed);
            effects.push(Effect::Notify(Notification::Reset));
            effects
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn begin_cycle(state: &mut LoaderState, query: LoadQuery, connected: bool) -> Vec<Effect> {
    let mut effects = Vec::with_capacity(3);
    if let Some(superseded) = state.current_cycle() {
        effects.push(Effect::CancelFetch { cycle: superseded });
    }

    if !connected {
        news_warn!("No connectivity, skipping fetch");
        state.set_load(LoadState::NoConnectivity);
        effects.push(Effect::Notify(Notification::NoConnectivity));
        return effects;
    }

    let url = build_search_url(state.endpoint(), &query).to_string();
    let cycle = state.begin_cycle(query);
    news_info!("Cycle {} loading {}", cycle, url);
    effects.push(Effect::Notify(Notification::LoadingStarted));
    effects.push(Effect::Fetch { cycle, url });
    effects
}

fn msg_label(msg: &Msg) -> &'static str {
    match msg {
        Msg::StartRequested { .. } => "StartRequested",
        Msg::RestartRequested { .. } => "RestartRequested",
        Msg::FetchCompleted { .. } => "FetchCompleted",
        Msg::Disposed => "Disposed",
        Msg::NoOp => "NoOp",
    }
}

use std::sync::Once;

use news_core::{
    update, Effect, FailureKind, LoadFailure, LoadQuery, LoadState, LoaderState, Msg,
    NewsArticle, Notification, SECTION_ALL,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(news_logging::initialize_for_tests);
}

fn query() -> LoadQuery {
    LoadQuery::new("", SECTION_ALL, "newest")
}

fn start(state: LoaderState, connected: bool) -> (LoaderState, Vec<Effect>) {
    update(
        state,
        Msg::StartRequested {
            query: query(),
            connected,
        },
    )
}

fn restart(state: LoaderState, query: LoadQuery) -> (LoaderState, Vec<Effect>) {
    update(
        state,
        Msg::RestartRequested {
            query,
            connected: true,
        },
    )
}

fn article(title: &str) -> NewsArticle {
    NewsArticle::new(
        title,
        "",
        "World news",
        format!("https://example.com/{title}"),
        "2024-03-01T09:30:00Z",
    )
}

fn fetch_cycle(effects: &[Effect]) -> u64 {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::Fetch { cycle, .. } => Some(*cycle),
            _ => None,
        })
        .expect("fetch effect")
}

fn notifications(effects: &[Effect]) -> Vec<Notification> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Notify(n) => Some(n.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn start_from_idle_notifies_and_fetches() {
    init_logging();
    let (state, effects) = start(LoaderState::new(), true);

    assert_eq!(
        effects,
        vec![
            Effect::Notify(Notification::LoadingStarted),
            Effect::Fetch {
                cycle: 1,
                url: "https://content.guardianapis.com/search?api-key=test&show-tags=contributor&q=&order-by=newest"
                    .to_string(),
            },
        ]
    );
    assert_eq!(state.current_cycle(), Some(1));
    assert!(state.view().progress_visible);
}

#[test]
fn start_without_connectivity_never_fetches() {
    init_logging();
    let (state, effects) = start(LoaderState::new(), false);

    assert_eq!(effects, vec![Effect::Notify(Notification::NoConnectivity)]);
    assert_eq!(state.load(), &LoadState::NoConnectivity);
    assert_eq!(state.last_cycle(), 0);
}

#[test]
fn empty_result_is_delivered_not_failed() {
    init_logging();
    let (state, effects) = start(LoaderState::new(), true);
    let cycle = fetch_cycle(&effects);

    let (state, effects) = update(
        state,
        Msg::FetchCompleted {
            cycle,
            result: Ok(Vec::new()),
        },
    );

    assert_eq!(
        effects,
        vec![Effect::Notify(Notification::LoadSucceeded(Vec::new()))]
    );
    assert_eq!(state.load(), &LoadState::Delivered(Vec::new()));
    assert!(!state.view().progress_visible);
}

#[test]
fn failure_is_reported_once() {
    init_logging();
    let (state, effects) = start(LoaderState::new(), true);
    let cycle = fetch_cycle(&effects);
    let failure = LoadFailure::new(FailureKind::HttpStatus(503), "503 Service Unavailable");

    let (state, effects) = update(
        state,
        Msg::FetchCompleted {
            cycle,
            result: Err(failure.clone()),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::Notify(Notification::LoadFailed(failure.clone()))]
    );
    assert_eq!(state.load(), &LoadState::Failed(failure));

    // A duplicate completion for the same cycle must not produce a second notification.
    let (_state, effects) = update(
        state,
        Msg::FetchCompleted {
            cycle,
            result: Ok(vec![article("late")]),
        },
    );
    assert!(effects.is_empty());
}

#[test]
fn restart_supersedes_in_flight_cycle() {
    init_logging();
    let (state, effects) = start(LoaderState::new(), true);
    let cycle_a = fetch_cycle(&effects);

    let (state, effects) = restart(state, LoadQuery::new("budget", "politics", "newest"));
    let cycle_b = fetch_cycle(&effects);
    assert!(cycle_b > cycle_a);
    assert_eq!(effects[0], Effect::CancelFetch { cycle: cycle_a });
    assert_eq!(notifications(&effects), vec![Notification::LoadingStarted]);

    // A resolves with a valid list: nothing is attributable to it.
    let (state, effects) = update(
        state,
        Msg::FetchCompleted {
            cycle: cycle_a,
            result: Ok(vec![article("stale")]),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.current_cycle(), Some(cycle_b));

    // B resolves: exactly one terminal notification.
    let fresh = vec![article("fresh")];
    let (state, effects) = update(
        state,
        Msg::FetchCompleted {
            cycle: cycle_b,
            result: Ok(fresh.clone()),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::Notify(Notification::LoadSucceeded(fresh.clone()))]
    );
    assert_eq!(state.load(), &LoadState::Delivered(fresh));
}

#[test]
fn restart_picks_up_new_query() {
    init_logging();
    let (state, _effects) = start(LoaderState::new(), true);
    let (state, effects) = restart(state, LoadQuery::new("budget", "politics", "oldest"));

    let url = effects
        .iter()
        .find_map(|effect| match effect {
            Effect::Fetch { url, .. } => Some(url.clone()),
            _ => None,
        })
        .unwrap();
    assert!(url.contains("q=budget"));
    assert!(url.contains("section=politics"));
    assert!(url.contains("order-by=oldest"));
    match state.load() {
        LoadState::Loading { query, .. } => assert_eq!(query.keyword, "budget"),
        other => panic!("expected loading, got {other:?}"),
    }
}

#[test]
fn start_while_loading_is_ignored() {
    init_logging();
    let (state, _effects) = start(LoaderState::new(), true);
    let (next, effects) = start(state.clone(), true);

    assert!(effects.is_empty());
    assert_eq!(next, state);
}

#[test]
fn terminal_states_can_be_retriggered() {
    init_logging();
    let (state, _effects) = start(LoaderState::new(), false);
    assert_eq!(state.load(), &LoadState::NoConnectivity);

    let (state, effects) = start(state, true);
    let cycle = fetch_cycle(&effects);
    assert_eq!(cycle, 1);

    let (state, _effects) = update(
        state,
        Msg::FetchCompleted {
            cycle,
            result: Ok(vec![article("one")]),
        },
    );
    let (state, effects) = restart(state, query());
    assert_eq!(fetch_cycle(&effects), 2);
    // Nothing in flight to cancel when leaving a terminal state.
    assert!(!effects
        .iter()
        .any(|effect| matches!(effect, Effect::CancelFetch { .. })));
    assert!(state.is_loading());
}

#[test]
fn restart_without_connectivity_drops_in_flight_cycle() {
    init_logging();
    let (state, effects) = start(LoaderState::new(), true);
    let cycle = fetch_cycle(&effects);

    let (state, effects) = update(
        state,
        Msg::RestartRequested {
            query: query(),
            connected: false,
        },
    );
    assert_eq!(
        effects,
        vec![
            Effect::CancelFetch { cycle },
            Effect::Notify(Notification::NoConnectivity),
        ]
    );

    let (_state, effects) = update(
        state,
        Msg::FetchCompleted {
            cycle,
            result: Ok(vec![article("stale")]),
        },
    );
    assert!(effects.is_empty());
}

#[test]
fn dispose_cancels_and_silences_everything() {
    init_logging();
    let (state, effects) = start(LoaderState::new(), true);
    let cycle = fetch_cycle(&effects);

    let (state, effects) = update(state, Msg::Disposed);
    assert_eq!(
        effects,
        vec![
            Effect::CancelFetch { cycle },
            Effect::Notify(Notification::Reset),
        ]
    );
    assert!(state.is_disposed());

    let (state, effects) = update(
        state,
        Msg::FetchCompleted {
            cycle,
            result: Ok(vec![article("late")]),
        },
    );
    assert!(effects.is_empty());
    let (state, effects) = start(state, true);
    assert!(effects.is_empty());
    let (state, effects) = update(state, Msg::Disposed);
    assert!(effects.is_empty());
    assert!(state.is_disposed());
}

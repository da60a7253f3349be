use crate::{CycleId, LoadFailure, NewsArticle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start fetching `url` on the worker for `cycle`.
    Fetch { cycle: CycleId, url: String },
    /// Drop the in-flight fetch of a superseded or disposed cycle.
    CancelFetch { cycle: CycleId },
    /// Tell the observer about a state transition.
    Notify(Notification),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    LoadingStarted,
    LoadSucceeded(Vec<NewsArticle>),
    LoadFailed(LoadFailure),
    NoConnectivity,
    Reset,
}

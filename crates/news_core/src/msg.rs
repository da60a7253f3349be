use crate::{CycleId, LoadFailure, LoadQuery, NewsArticle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Consumer became ready. `query` and `connected` are read by the caller
    /// right before dispatch.
    StartRequested { query: LoadQuery, connected: bool },
    /// Manual refresh or configuration change; always begins a new cycle.
    RestartRequested { query: LoadQuery, connected: bool },
    /// Worker finished the fetch it was given for `cycle`.
    FetchCompleted {
        cycle: CycleId,
        result: Result<Vec<NewsArticle>, LoadFailure>,
    },
    /// Consumer torn down.
    Disposed,
    /// Fallback for placeholder wiring.
    NoOp,
}

use std::fmt;

use crate::view_model::{row_view, EmptyMessage, LoaderView};
use crate::{LoadQuery, NewsArticle, SearchEndpoint};

/// Monotonic identifier of a load cycle; the first cycle is 1.
pub type CycleId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Transport,
    Timeout,
    HttpStatus(u16),
    Parse,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Transport => write!(f, "transport error"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Parse => write!(f, "malformed response"),
        }
    }
}

/// Why a cycle failed. The message is informational only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl LoadFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading {
        cycle: CycleId,
        query: LoadQuery,
    },
    Delivered(Vec<NewsArticle>),
    Failed(LoadFailure),
    NoConnectivity,
    Disposed,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoaderState {
    endpoint: SearchEndpoint,
    load: LoadState,
    last_cycle: CycleId,
}

impl LoaderState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoint(endpoint: SearchEndpoint) -> Self {
        Self {
            endpoint,
            ..Self::default()
        }
    }

    pub fn endpoint(&self) -> &SearchEndpoint {
        &self.endpoint
    }

    pub fn load(&self) -> &LoadState {
        &self.load
    }

    /// Cycle whose result is still awaited, if any.
    pub fn current_cycle(&self) -> Option<CycleId> {
        match self.load {
            LoadState::Loading { cycle, .. } => Some(cycle),
            _ => None,
        }
    }

    /// Highest cycle id handed out so far; 0 before the first fetch.
    pub fn last_cycle(&self) -> CycleId {
        self.last_cycle
    }

    pub fn is_loading(&self) -> bool {
        self.current_cycle().is_some()
    }

    pub fn is_disposed(&self) -> bool {
        self.load == LoadState::Disposed
    }

    pub fn view(&self) -> LoaderView {
        match &self.load {
            LoadState::Idle | LoadState::Disposed => LoaderView::default(),
            LoadState::Loading { .. } => LoaderView {
                progress_visible: true,
                ..LoaderView::default()
            },
            LoadState::Delivered(articles) if articles.is_empty() => LoaderView {
                empty_message: Some(EmptyMessage::NoNews),
                ..LoaderView::default()
            },
            LoadState::Delivered(articles) => LoaderView {
                rows: articles.iter().map(row_view).collect(),
                ..LoaderView::default()
            },
            LoadState::Failed(_) => LoaderView {
                empty_message: Some(EmptyMessage::LoadFailed),
                ..LoaderView::default()
            },
            LoadState::NoConnectivity => LoaderView {
                empty_message: Some(EmptyMessage::NoConnection),
                ..LoaderView::default()
            },
        }
    }

    pub(crate) fn begin_cycle(&mut self, query: LoadQuery) -> CycleId {
        self.last_cycle += 1;
        let cycle = self.last_cycle;
        self.load = LoadState::Loading { cycle, query };
        cycle
    }

    pub(crate) fn set_load(&mut self, load: LoadState) {
        self.load = load;
    }
}

//! News loader core: pure load-cycle state machine, query building and view-model helpers.
mod article;
mod effect;
mod msg;
mod query;
mod state;
mod update;
mod view_model;

pub use article::NewsArticle;
pub use effect::{Effect, Notification};
pub use msg::Msg;
pub use query::{
    build_search_url, LoadQuery, SearchEndpoint, DEFAULT_API_KEY, DEFAULT_ORDER_BY,
    SEARCH_ENDPOINT, SECTION_ALL,
};
pub use state::{CycleId, FailureKind, LoadFailure, LoadState, LoaderState};
pub use update::update;
pub use view_model::{row_view, EmptyMessage, LoaderView, RowViewModel};

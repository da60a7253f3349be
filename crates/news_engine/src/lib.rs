//! News engine: article fetching and off-thread effect execution.
mod engine;
mod fetch;
mod parse;
mod types;

pub use engine::EngineHandle;
pub use fetch::{ArticleFetcher, FetchSettings, ReqwestArticleFetcher};
pub use parse::parse_search_response;
pub use types::{EngineEvent, FailureKind, FetchError};

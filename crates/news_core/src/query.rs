use url::Url;

/// Guardian content search endpoint.
pub const SEARCH_ENDPOINT: &str = "https://content.guardianapis.com/search";
/// Public developer key accepted by the endpoint.
pub const DEFAULT_API_KEY: &str = "test";
/// Section sentinel meaning "do not filter by section".
pub const SECTION_ALL: &str = "all";
pub const DEFAULT_ORDER_BY: &str = "newest";

/// User-facing query parameters for one load cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadQuery {
    pub keyword: String,
    pub section: String,
    pub order_by: String,
}

impl LoadQuery {
    pub fn new(
        keyword: impl Into<String>,
        section: impl Into<String>,
        order_by: impl Into<String>,
    ) -> Self {
        Self {
            keyword: keyword.into(),
            section: section.into(),
            order_by: order_by.into(),
        }
    }
}

impl Default for LoadQuery {
    fn default() -> Self {
        Self::new("", SECTION_ALL, DEFAULT_ORDER_BY)
    }
}

/// Base URL and API key every search request starts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchEndpoint {
    base: Url,
    api_key: String,
}

impl SearchEndpoint {
    pub fn new(base: Url, api_key: impl Into<String>) -> Self {
        Self {
            base,
            api_key: api_key.into(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl Default for SearchEndpoint {
    fn default() -> Self {
        let base = Url::parse(SEARCH_ENDPOINT).expect("search endpoint constant is a valid url");
        Self::new(base, DEFAULT_API_KEY)
    }
}

/// Builds the request URL for `query`.
///
/// `q` and `order-by` are always present, `q` possibly empty. `section` is
/// omitted when it equals [`SECTION_ALL`].
pub fn build_search_url(endpoint: &SearchEndpoint, query: &LoadQuery) -> Url {
    let mut url = endpoint.base.clone();
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("api-key", &endpoint.api_key);
        pairs.append_pair("show-tags", "contributor");
        pairs.append_pair("q", &query.keyword);
        if query.section != SECTION_ALL {
            pairs.append_pair("section", &query.section);
        }
        pairs.append_pair("order-by", &query.order_by);
    }
    url
}

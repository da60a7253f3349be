/// A single search result, as delivered to the presentation layer.
///
/// Built once by the fetcher from one response item and never mutated.
/// Optional source fields are normalized to the empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsArticle {
    title: String,
    authors: String,
    section_name: String,
    url: String,
    publication_date: String,
}

impl NewsArticle {
    pub fn new(
        title: impl Into<String>,
        authors: impl Into<String>,
        section_name: impl Into<String>,
        url: impl Into<String>,
        publication_date: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            authors: authors.into(),
            section_name: section_name.into(),
            url: url.into(),
            publication_date: publication_date.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// First contributor's display name, or empty.
    pub fn authors(&self) -> &str {
        &self.authors
    }

    pub fn section_name(&self) -> &str {
        &self.section_name
    }

    /// Absolute article URL; always non-empty.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Timestamp exactly as returned by the source, e.g. `2024-03-01T09:30:00Z`.
    pub fn publication_date(&self) -> &str {
        &self.publication_date
    }
}

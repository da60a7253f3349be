use crate::NewsArticle;

/// One list row. `None` fields are hidden by the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowViewModel {
    pub title: Option<String>,
    pub section_name: Option<String>,
    pub authors: Option<String>,
    /// Raw source timestamp; formatting is left to the renderer.
    pub publication_date: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyMessage {
    NoConnection,
    NoNews,
    LoadFailed,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoaderView {
    pub progress_visible: bool,
    pub rows: Vec<RowViewModel>,
    pub empty_message: Option<EmptyMessage>,
}

pub fn row_view(article: &NewsArticle) -> RowViewModel {
    RowViewModel {
        title: non_empty(article.title()),
        section_name: non_empty(article.section_name()),
        authors: non_empty(article.authors()),
        publication_date: article.publication_date().to_string(),
        url: article.url().to_string(),
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fields_are_hidden() {
        let article = NewsArticle::new("Title", "", "  ", "https://example.com/a", "");
        let row = row_view(&article);
        assert_eq!(row.title.as_deref(), Some("Title"));
        assert_eq!(row.section_name, None);
        assert_eq!(row.authors, None);
        assert_eq!(row.url, "https://example.com/a");
    }
}

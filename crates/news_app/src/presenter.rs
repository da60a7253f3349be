use std::io::Write;

use chrono::{DateTime, NaiveDateTime};
use news_core::{row_view, EmptyMessage, LoadFailure, NewsArticle, RowViewModel};
use news_logging::{news_debug, news_warn};

use crate::LoadObserver;

const DISPLAY_DATE_FORMAT: &str = "%b %-d, %Y";
const OFFSETLESS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Formats a source timestamp as e.g. `Mar 3, 1984`, in the timestamp's own
/// offset. Unparseable input yields an empty string.
pub fn format_publication_date(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format(DISPLAY_DATE_FORMAT).to_string();
    }
    match NaiveDateTime::parse_from_str(raw, OFFSETLESS_FORMAT) {
        Ok(parsed) => parsed.format(DISPLAY_DATE_FORMAT).to_string(),
        Err(err) => {
            news_warn!("Unparseable publication date {:?}: {}", raw, err);
            String::new()
        }
    }
}

/// Renders a row as text. Hidden fields leave no separator behind.
pub fn render_row(row: &RowViewModel) -> String {
    let date = format_publication_date(&row.publication_date);
    let details: Vec<&str> = [
        row.section_name.as_deref(),
        row.authors.as_deref(),
        Some(date.as_str()).filter(|d| !d.is_empty()),
    ]
    .into_iter()
    .flatten()
    .collect();

    let mut text = row.title.clone().unwrap_or_default();
    if !details.is_empty() {
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str("  ");
        text.push_str(&details.join(" | "));
    }
    text
}

pub fn empty_message_text(message: EmptyMessage) -> &'static str {
    match message {
        EmptyMessage::NoConnection => "No internet connection.",
        EmptyMessage::NoNews => "No news found.",
        EmptyMessage::LoadFailed => "Could not load news.",
    }
}

/// Observer that prints the list to a terminal-like writer.
pub struct TerminalPresenter<W: Write> {
    out: W,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn print(&mut self, text: &str) {
        if let Err(err) = writeln!(self.out, "{text}") {
            news_warn!("Failed to write to presenter output: {}", err);
        }
    }
}

impl<W: Write> LoadObserver for TerminalPresenter<W> {
    fn on_loading_started(&mut self) {
        self.print("Loading...");
    }

    fn on_load_succeeded(&mut self, articles: &[NewsArticle]) {
        if articles.is_empty() {
            self.print(empty_message_text(EmptyMessage::NoNews));
            return;
        }
        for (index, article) in articles.iter().enumerate() {
            let row = render_row(&row_view(article));
            self.print(&format!("{:>2}. {}", index + 1, row));
        }
    }

    fn on_load_failed(&mut self, failure: &LoadFailure) {
        news_debug!("Showing failure state: {}", failure);
        self.print(empty_message_text(EmptyMessage::LoadFailed));
    }

    fn on_no_connectivity(&mut self) {
        self.print(empty_message_text(EmptyMessage::NoConnection));
    }

    fn on_reset(&mut self) {
        let _ = self.out.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utc_timestamp_is_formatted() {
        assert_eq!(format_publication_date("1984-03-03T10:00:00Z"), "Mar 3, 1984");
    }

    #[test]
    fn offset_timestamp_keeps_its_own_day() {
        assert_eq!(
            format_publication_date("2024-12-31T23:30:00-05:00"),
            "Dec 31, 2024"
        );
    }

    #[test]
    fn timestamp_without_offset_is_accepted() {
        assert_eq!(format_publication_date("2024-01-09T08:00:00"), "Jan 9, 2024");
    }

    #[test]
    fn garbage_yields_empty() {
        assert_eq!(format_publication_date("yesterday"), "");
        assert_eq!(format_publication_date(""), "");
    }

    #[test]
    fn row_without_section_has_no_dangling_separator() {
        let article = NewsArticle::new(
            "Storm warning",
            "Ann Writer",
            "",
            "https://example.com/storm",
            "2024-01-20T18:00:00Z",
        );
        assert_eq!(
            render_row(&row_view(&article)),
            "Storm warning\n  Ann Writer | Jan 20, 2024"
        );
    }
}

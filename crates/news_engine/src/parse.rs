use news_core::NewsArticle;
use news_logging::{news_debug, news_warn};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use url::Url;

use crate::{FailureKind, FetchError};

const CONTRIBUTOR_TAG: &str = "contributor";

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    response: SearchResponse,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Option<Vec<Value>>,
}

// Fields of the wrong JSON type read as absent, so one odd field never
// costs the whole result.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SearchResult {
    #[serde(deserialize_with = "lenient_string")]
    web_title: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    section_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    web_url: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    web_publication_date: Option<String>,
    #[serde(deserialize_with = "lenient_tags")]
    tags: Vec<Tag>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Tag {
    #[serde(rename = "type", deserialize_with = "lenient_string")]
    kind: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    web_title: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        _ => None,
    })
}

fn lenient_tags<'de, D>(deserializer: D) -> Result<Vec<Tag>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Parses a search response body into articles.
///
/// An unparseable body or one without a `response` object fails the whole
/// batch. Results that are not objects or lack an absolute `webUrl` are
/// skipped; other missing or mistyped fields become empty strings.
pub fn parse_search_response(body: &[u8]) -> Result<Vec<NewsArticle>, FetchError> {
    let envelope: SearchEnvelope = serde_json::from_slice(body)
        .map_err(|err| FetchError::new(FailureKind::Parse, err.to_string()))?;

    let results = envelope.response.results.unwrap_or_default();
    let total = results.len();
    let mut articles = Vec::with_capacity(total);
    for (index, value) in results.into_iter().enumerate() {
        match article_from_value(value) {
            Ok(article) => articles.push(article),
            Err(reason) => news_warn!("Skipping search result {}: {}", index, reason),
        }
    }

    news_debug!("Parsed {} of {} search results", articles.len(), total);
    Ok(articles)
}

fn article_from_value(value: Value) -> Result<NewsArticle, String> {
    let result: SearchResult = serde_json::from_value(value).map_err(|err| err.to_string())?;

    let url = result
        .web_url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .ok_or_else(|| "missing webUrl".to_string())?;
    Url::parse(&url).map_err(|err| format!("webUrl {url:?} is not absolute: {err}"))?;

    let authors = result
        .tags
        .into_iter()
        .find(is_contributor)
        .and_then(|tag| tag.web_title)
        .unwrap_or_default();

    Ok(NewsArticle::new(
        result.web_title.unwrap_or_default(),
        authors,
        result.section_name.unwrap_or_default(),
        url,
        result.web_publication_date.unwrap_or_default(),
    ))
}

// `show-tags=contributor` already filters server side, so untyped tags count too.
fn is_contributor(tag: &Tag) -> bool {
    tag.kind.as_deref().map_or(true, |kind| kind == CONTRIBUTOR_TAG)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_contributor_tags_are_ignored() {
        let tag = Tag {
            kind: Some("keyword".to_string()),
            web_title: Some("Politics".to_string()),
        };
        assert!(!is_contributor(&tag));
        assert!(is_contributor(&Tag::default()));
    }
}

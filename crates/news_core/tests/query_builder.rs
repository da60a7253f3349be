use news_core::{build_search_url, LoadQuery, SearchEndpoint, SECTION_ALL};
use pretty_assertions::assert_eq;
use url::Url;

fn param_names(url: &Url) -> Vec<String> {
    url.query_pairs().map(|(k, _)| k.into_owned()).collect()
}

fn param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

#[test]
fn empty_keyword_and_all_sections_omits_section() {
    let query = LoadQuery::new("", SECTION_ALL, "newest");
    let url = build_search_url(&SearchEndpoint::default(), &query);

    assert_eq!(
        url.as_str(),
        "https://content.guardianapis.com/search?api-key=test&show-tags=contributor&q=&order-by=newest"
    );
    assert!(!param_names(&url).contains(&"section".to_string()));
    assert_eq!(param(&url, "q").as_deref(), Some(""));
}

#[test]
fn concrete_section_is_appended_before_order_by() {
    let query = LoadQuery::new("climate", "environment", "relevance");
    let url = build_search_url(&SearchEndpoint::default(), &query);

    assert_eq!(
        param_names(&url),
        vec!["api-key", "show-tags", "q", "section", "order-by"]
    );
    assert_eq!(param(&url, "section").as_deref(), Some("environment"));
    assert_eq!(param(&url, "order-by").as_deref(), Some("relevance"));
}

#[test]
fn section_sentinel_is_case_sensitive() {
    let query = LoadQuery::new("x", "All", "oldest");
    let url = build_search_url(&SearchEndpoint::default(), &query);
    assert_eq!(param(&url, "section").as_deref(), Some("All"));
}

#[test]
fn keyword_is_form_encoded() {
    let query = LoadQuery::new("brexit & trade", SECTION_ALL, "newest");
    let url = build_search_url(&SearchEndpoint::default(), &query);

    assert!(url.as_str().contains("q=brexit+%26+trade"));
    assert_eq!(param(&url, "q").as_deref(), Some("brexit & trade"));
}

#[test]
fn custom_endpoint_and_key_are_used() {
    let base = Url::parse("http://127.0.0.1:8080/search").unwrap();
    let endpoint = SearchEndpoint::new(base, "secret");
    let url = build_search_url(&endpoint, &LoadQuery::default());

    assert_eq!(url.host_str(), Some("127.0.0.1"));
    assert_eq!(url.path(), "/search");
    assert_eq!(param(&url, "api-key").as_deref(), Some("secret"));
    assert_eq!(param(&url, "show-tags").as_deref(), Some("contributor"));
}

#[test]
fn builder_is_deterministic() {
    let query = LoadQuery::new("a", "world", "newest");
    let endpoint = SearchEndpoint::default();
    assert_eq!(
        build_search_url(&endpoint, &query),
        build_search_url(&endpoint, &query)
    );
}

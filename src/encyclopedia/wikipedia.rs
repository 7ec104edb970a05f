//! Wikipedia access through the MediaWiki action API
//!
//! A name is first turned into an article title with a full-text search
//! (so "betelgeuse" and "Alpha Orionis" land on the same page), then the
//! article is rendered to HTML with redirects followed.

use std::time::Duration;

use serde::Deserialize;

use super::Encyclopedia;
use crate::{Result, SkygazrError};

const DEFAULT_ENDPOINT: &str = "https://en.wikipedia.org/w/api.php";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!(
    "skygazr/",
    env!("CARGO_PKG_VERSION"),
    " (command-line sky locator)"
);

#[derive(Debug, Deserialize)]
struct SearchResponse {
    query: Option<SearchQuery>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ParseResponse {
    parse: Option<ParsedPage>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ParsedPage {
    title: String,
    text: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    info: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.info)
    }
}

/// Blocking MediaWiki client
pub struct WikipediaClient {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl WikipediaClient {
    /// Client for English Wikipedia
    pub fn new() -> Result<Self> {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Client for another MediaWiki installation's `api.php`
    pub fn with_endpoint(endpoint: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SkygazrError::Network(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            endpoint: endpoint.to_string(),
            client,
        })
    }

    fn get<T: for<'de> Deserialize<'de>>(&self, params: &[(&str, &str)]) -> Result<T> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(params)
            .send()
            .map_err(|e| SkygazrError::Network(format!("Wikipedia request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(SkygazrError::Network(format!(
                "Wikipedia returned status {}",
                response.status()
            )));
        }

        response
            .json()
            .map_err(|e| SkygazrError::Encyclopedia(format!("Unreadable Wikipedia response: {}", e)))
    }

    /// Title of the best search hit for `name`
    pub fn search_title(&self, name: &str) -> Result<String> {
        let response: SearchResponse = self.get(&[
            ("action", "query"),
            ("list", "search"),
            ("srsearch", name),
            ("srlimit", "1"),
            ("format", "json"),
        ])?;
        title_from_search(response, name)
    }

    /// Rendered HTML of the article with this exact title
    pub fn render(&self, title: &str) -> Result<String> {
        let response: ParseResponse = self.get(&[
            ("action", "parse"),
            ("page", title),
            ("prop", "text"),
            ("redirects", "1"),
            ("format", "json"),
            ("formatversion", "2"),
        ])?;
        html_from_parse(response, title)
    }
}

impl Encyclopedia for WikipediaClient {
    fn page_html(&self, name: &str) -> Result<String> {
        let title = self.search_title(name)?;
        log::info!("Looking up {:?} on Wikipedia as {:?}", name, title);
        self.render(&title)
    }
}

fn title_from_search(response: SearchResponse, name: &str) -> Result<String> {
    if let Some(error) = response.error {
        return Err(SkygazrError::Encyclopedia(error.to_string()));
    }
    response
        .query
        .and_then(|query| query.search.into_iter().next())
        .map(|hit| hit.title)
        .ok_or_else(|| SkygazrError::TargetNotFound(format!("No Wikipedia article matches {}", name)))
}

fn html_from_parse(response: ParseResponse, title: &str) -> Result<String> {
    if let Some(error) = response.error {
        return Err(SkygazrError::Encyclopedia(format!("{} ({})", error, title)));
    }
    let page = response
        .parse
        .ok_or_else(|| SkygazrError::Encyclopedia(format!("Empty parse result for {}", title)))?;
    log::debug!("Rendered {} ({} bytes of HTML)", page.title, page.text.len());
    Ok(page.text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_from_search() {
        let response: SearchResponse = serde_json::from_str(
            r#"{"batchcomplete":"","query":{"searchinfo":{"totalhits":812},
                "search":[{"ns":0,"title":"Betelgeuse","pageid":4054,"size":160000}]}}"#,
        )
        .unwrap();
        assert_eq!(title_from_search(response, "betelgeuse").unwrap(), "Betelgeuse");
    }

    #[test]
    fn test_empty_search_is_not_found() {
        let response: SearchResponse =
            serde_json::from_str(r#"{"query":{"search":[]}}"#).unwrap();
        assert!(matches!(
            title_from_search(response, "Xyzzy"),
            Err(SkygazrError::TargetNotFound(_))
        ));
    }

    #[test]
    fn test_html_from_parse() {
        let response: ParseResponse = serde_json::from_str(
            r#"{"parse":{"title":"Sirius","pageid":1,"text":"<table class=\"infobox\"></table>"}}"#,
        )
        .unwrap();
        assert_eq!(
            html_from_parse(response, "Sirius").unwrap(),
            r#"<table class="infobox"></table>"#
        );
    }

    #[test]
    fn test_api_error_is_reported() {
        let response: ParseResponse = serde_json::from_str(
            r#"{"error":{"code":"missingtitle","info":"The page you specified doesn't exist."}}"#,
        )
        .unwrap();
        match html_from_parse(response, "Nowhere") {
            Err(SkygazrError::Encyclopedia(message)) => assert!(message.starts_with("missingtitle")),
            other => panic!("unexpected {:?}", other),
        }
    }
}

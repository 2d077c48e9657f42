use async_trait::async_trait;
use hsi_core::{Error, Result, SearchClient, SearchOptions, SearchResult};
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use tracing::debug;

pub const DEFAULT_ENDPOINT: &str = "https://api.bing.microsoft.com/v7.0/search";

#[derive(Clone)]
pub struct SearchConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub max_results: u32,
    pub market: String,
    pub safe_search: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            max_results: 50,
            market: "en-GB".to_string(),
            safe_search: "Moderate".to_string(),
        }
    }
}

impl fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchConfig")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("max_results", &self.max_results)
            .field("market", &self.market)
            .field("safe_search", &self.safe_search)
            .finish()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BingResponse {
    web_pages: Option<WebPages>,
}

#[derive(Deserialize)]
struct WebPages {
    #[serde(default)]
    value: Vec<WebPage>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WebPage {
    name: String,
    url: String,
    snippet: String,
    date_published: Option<String>,
}

impl From<WebPage> for SearchResult {
    fn from(page: WebPage) -> Self {
        SearchResult {
            title: page.name,
            url: page.url,
            snippet: page.snippet,
            date_published: page.date_published,
        }
    }
}

/// Bing Web Search v7 client.
pub struct BingSearch {
    client: Client,
    config: SearchConfig,
}

impl fmt::Debug for BingSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BingSearch")
            .field("client", &"<reqwest::Client>")
            .field("config", &self.config)
            .finish()
    }
}

impl BingSearch {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn query_params(&self, query: &str, options: &SearchOptions) -> Vec<(&'static str, String)> {
        let count = options.count.unwrap_or(self.config.max_results);
        let mut params = vec![
            ("q", query.to_string()),
            ("count", count.to_string()),
            ("mkt", self.config.market.clone()),
            ("safeSearch", self.config.safe_search.clone()),
        ];
        if let Some(freshness) = options.freshness {
            params.push(("freshness", freshness.as_str().to_string()));
        }
        if let Some(category) = &options.category {
            params.push(("category", category.clone()));
        }
        params
    }
}

#[async_trait]
impl SearchClient for BingSearch {
    async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchResult>> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| Error::MissingCredential("Missing Bing API Key".to_string()))?;

        debug!(query, ?options, "Searching Bing");
        let response = self
            .client
            .get(&self.config.endpoint)
            .header("Ocp-Apim-Subscription-Key", api_key)
            .query(&self.query_params(query, options))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Upstream(format!(
                "Bing search failed with status {}",
                response.status()
            )));
        }

        let body = response.json::<BingResponse>().await?;
        let results: Vec<SearchResult> = body
            .web_pages
            .map(|pages| pages.value.into_iter().map(SearchResult::from).collect())
            .unwrap_or_default();
        debug!(query, count = results.len(), "Bing search finished");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hsi_core::Freshness;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{header, method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, api_key: Option<&str>) -> BingSearch {
        BingSearch::new(SearchConfig {
            api_key: api_key.map(str::to_string),
            endpoint: format!("{}/v7.0/search", server.uri()),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_search_normalizes_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("Ocp-Apim-Subscription-Key", "secret"))
            .and(query_param("q", "site:aestheticmed.co.uk"))
            .and(query_param("count", "15"))
            .and(query_param("freshness", "Month"))
            .and(query_param("category", "Health"))
            .and(query_param("mkt", "en-GB"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "webPages": {
                    "value": [
                        {
                            "name": "Skin boosters reviewed",
                            "url": "https://aestheticmed.co.uk/skin-boosters",
                            "snippet": "A look at the evidence.",
                            "datePublished": "2024-03-01T00:00:00.0000000"
                        },
                        {
                            "name": "Second",
                            "url": "https://aestheticmed.co.uk/second",
                            "snippet": "More news."
                        }
                    ]
                }
            })))
            .mount(&server)
            .await;

        let search = client_for(&server, Some("secret"));
        let options = SearchOptions::new()
            .freshness(Freshness::Month)
            .count(15)
            .category("Health");
        let results = search.search("site:aestheticmed.co.uk", &options).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Skin boosters reviewed");
        assert_eq!(
            results[0].date_published.as_deref(),
            Some("2024-03-01T00:00:00.0000000")
        );
        assert_eq!(results[1].date_published, None);
    }

    #[tokio::test]
    async fn test_missing_web_pages_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("count", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"_type": "SearchResponse"})))
            .mount(&server)
            .await;

        let search = client_for(&server, Some("secret"));
        let results = search.search("anything", &SearchOptions::new()).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_request() {
        let server = MockServer::start().await;
        let search = client_for(&server, None);
        let err = search.search("q", &SearchOptions::new()).await.unwrap_err();
        assert!(matches!(err, Error::MissingCredential(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upstream_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let search = client_for(&server, Some("bad"));
        let err = search.search("q", &SearchOptions::new()).await.unwrap_err();
        assert!(matches!(err, Error::Upstream(_)));
    }
}

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use crate::errors::AppError;
use crate::models::{ExtractedArticle, NewsArticle};

const BASE_URL: &str = "https://api.worldnewsapi.com";

/// Parameters for a news search. Optional fields are omitted from the
/// request entirely.
#[derive(Debug, Clone, Default)]
pub struct NewsQuery {
    pub text: Option<String>,
    pub language: Option<String>,
    pub categories: Option<String>,
    pub source_country: Option<String>,
    pub number: Option<u32>,
    /// `YYYY-MM-DD HH:MM:SS` as the API expects.
    pub earliest_publish_date: Option<String>,
    pub latest_publish_date: Option<String>,
}

/// Geopolitical signal ingestion: keyword/date-window search, top headlines,
/// and full-article extraction.
#[async_trait]
pub trait NewsProvider: Send + Sync {
    async fn search_news(&self, query: &NewsQuery) -> Result<Vec<NewsArticle>, AppError>;

    async fn top_news(
        &self,
        source_country: &str,
        date: Option<&str>,
    ) -> Result<Vec<NewsArticle>, AppError>;

    /// Scrape full article content from a URL. Best-effort: any upstream
    /// failure yields `None`.
    async fn extract_article(&self, url: &str) -> Result<Option<ExtractedArticle>, AppError>;
}

#[derive(Debug, Deserialize)]
struct SearchNewsResponse {
    #[serde(default)]
    news: Vec<NewsArticle>,
}

#[derive(Debug, Deserialize)]
struct TopNewsResponse {
    #[serde(default)]
    top_news: Vec<TopNewsCluster>,
}

#[derive(Debug, Deserialize)]
struct TopNewsCluster {
    #[serde(default)]
    news: Vec<NewsArticle>,
}

/// World News API client.
pub struct WorldNewsProvider {
    client: Client,
    api_key: Option<String>,
}

impl WorldNewsProvider {
    pub fn from_env() -> Self {
        Self {
            client: Client::new(),
            api_key: std::env::var("WORLD_NEWS_API_KEY").ok(),
        }
    }

    fn key(&self) -> Result<&str, AppError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| AppError::Config("WORLD_NEWS_API_KEY is not set".to_string()))
    }
}

#[async_trait]
impl NewsProvider for WorldNewsProvider {
    async fn search_news(&self, query: &NewsQuery) -> Result<Vec<NewsArticle>, AppError> {
        let key = self.key()?;

        let mut params: Vec<(&str, String)> = vec![("api-key", key.to_string())];
        if let Some(text) = &query.text {
            params.push(("text", text.clone()));
        }
        if let Some(language) = &query.language {
            params.push(("language", language.clone()));
        }
        if let Some(categories) = &query.categories {
            params.push(("categories", categories.clone()));
        }
        if let Some(country) = &query.source_country {
            params.push(("source-country", country.clone()));
        }
        if let Some(earliest) = &query.earliest_publish_date {
            params.push(("earliest-publish-date", earliest.clone()));
        }
        if let Some(latest) = &query.latest_publish_date {
            params.push(("latest-publish-date", latest.clone()));
        }
        params.push(("number", query.number.unwrap_or(10).to_string()));

        let response = self
            .client
            .get(format!("{BASE_URL}/search-news"))
            .query(&params)
            .send()
            .await
            .map_err(|e| AppError::External(format!("World News API request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::External(format!(
                "World News API returned {status}: {body}"
            )));
        }

        let parsed: SearchNewsResponse = response
            .json()
            .await
            .map_err(|e| AppError::External(format!("failed to parse news response: {e}")))?;

        Ok(parsed.news)
    }

    async fn top_news(
        &self,
        source_country: &str,
        date: Option<&str>,
    ) -> Result<Vec<NewsArticle>, AppError> {
        let key = self.key()?;

        let mut params: Vec<(&str, String)> = vec![
            ("api-key", key.to_string()),
            ("source-country", source_country.to_string()),
            ("language", "en".to_string()),
        ];
        if let Some(date) = date {
            params.push(("date", date.to_string()));
        }

        let response = self
            .client
            .get(format!("{BASE_URL}/top-news"))
            .query(&params)
            .send()
            .await
            .map_err(|e| AppError::External(format!("World News API request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::External(format!(
                "World News API returned {status}: {body}"
            )));
        }

        let parsed: TopNewsResponse = response
            .json()
            .await
            .map_err(|e| AppError::External(format!("failed to parse top news response: {e}")))?;

        Ok(parsed
            .top_news
            .into_iter()
            .flat_map(|cluster| cluster.news)
            .collect())
    }

    async fn extract_article(&self, url: &str) -> Result<Option<ExtractedArticle>, AppError> {
        let key = self.key()?;

        let params: Vec<(&str, String)> =
            vec![("api-key", key.to_string()), ("url", url.to_string())];

        let response = self
            .client
            .get(format!("{BASE_URL}/extract-news"))
            .query(&params)
            .send()
            .await
            .map_err(|e| AppError::External(format!("World News API request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            warn!("extract-news returned {status} for {url}");
            return Ok(None);
        }

        match response.json::<ExtractedArticle>().await {
            Ok(article) => Ok(Some(article)),
            Err(e) => {
                warn!("failed to parse extract-news response: {e}");
                Ok(None)
            }
        }
    }
}

//! News drill-down for reconciliation tasks: search the wire for the event
//! type, scrape the best article, and condense it with the chat model.

use chrono::{Duration, Utc};
use std::sync::Arc;

use crate::errors::AppError;
use crate::external::{ChatCompletions, ChatOptions, NewsProvider, NewsQuery};
use crate::models::{NewsArticle, NewsSummary};

const SUMMARY_CHAR_BUDGET: usize = 8_000;

const SYSTEM_PROMPT: &str =
    "You are a compliance analyst. Summarize news in clear, factual bullet points.";

pub struct NewsSummaryService {
    news: Arc<dyn NewsProvider>,
    chat: Arc<dyn ChatCompletions>,
}

impl NewsSummaryService {
    pub fn new(news: Arc<dyn NewsProvider>, chat: Arc<dyn ChatCompletions>) -> Self {
        Self { news, chat }
    }

    /// `None` when no article can be found at all. Degrades through scraped
    /// text, search-result snippets, and a stock message as upstream pieces
    /// fail.
    pub async fn summary_for_event(
        &self,
        event_type: &str,
    ) -> Result<Option<NewsSummary>, AppError> {
        let earliest = (Utc::now() - Duration::days(30)).format("%Y-%m-%d").to_string();
        let articles = self
            .news
            .search_news(&NewsQuery {
                text: Some(event_type.to_string()),
                language: Some("en".to_string()),
                number: Some(5),
                earliest_publish_date: Some(earliest),
                ..NewsQuery::default()
            })
            .await?;

        let with_url = articles.iter().find(|article| {
            article
                .url
                .as_deref()
                .is_some_and(|url| url.starts_with("http"))
        });

        let Some(article) = with_url.or_else(|| articles.first()) else {
            return Ok(None);
        };

        let url = article.url.as_deref().unwrap_or_default();
        let extracted = if url.starts_with("http") {
            self.news.extract_article(url).await?
        } else {
            None
        };

        match extracted {
            Some(extracted) => {
                let text = [extracted.title.as_deref(), extracted.text.as_deref()]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join("\n\n");
                let summary = self.summarize(&text, event_type).await?;

                Ok(Some(NewsSummary {
                    title: extracted
                        .title
                        .clone()
                        .unwrap_or_else(|| article.title.clone()),
                    summary: summary
                        .or_else(|| {
                            extracted
                                .text
                                .as_ref()
                                .map(|text| text.chars().take(500).collect())
                        })
                        .unwrap_or_else(|| "No summary available.".to_string()),
                    source: extracted
                        .authors
                        .first()
                        .or_else(|| article.authors.first())
                        .cloned(),
                    url: extracted.url.clone().or_else(|| article.url.clone()),
                    publish_date: extracted
                        .publish_date
                        .clone()
                        .or_else(|| article.publish_date.clone()),
                    event_type: event_type.to_string(),
                }))
            }
            None => self.summary_from_search_result(article, event_type).await,
        }
    }

    async fn summary_from_search_result(
        &self,
        article: &NewsArticle,
        event_type: &str,
    ) -> Result<Option<NewsSummary>, AppError> {
        let text = [
            Some(article.title.as_str()),
            article.summary.as_deref(),
            article.text.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join("\n\n");
        let summary = self.summarize(&text, event_type).await?;

        Ok(Some(NewsSummary {
            title: article.title.clone(),
            summary: summary
                .or_else(|| article.summary.clone())
                .unwrap_or_else(|| "No summary available.".to_string()),
            source: article.authors.first().cloned(),
            url: article.url.clone(),
            publish_date: article.publish_date.clone(),
            event_type: event_type.to_string(),
        }))
    }

    async fn summarize(
        &self,
        article_text: &str,
        event_type: &str,
    ) -> Result<Option<String>, AppError> {
        let truncated: String = article_text.chars().take(SUMMARY_CHAR_BUDGET).collect();
        let prompt = format!(
            r#"Summarize this news article in 3-5 concise bullet points. Focus on:
- Main facts and developments
- Geopolitical, regulatory, or compliance implications
- Any entities, countries, or sectors mentioned

Context: This relates to reconciliation event "{event_type}".

Article:
{truncated}

Provide only the summary bullets, no preamble."#
        );

        self.chat
            .chat(
                &prompt,
                &ChatOptions {
                    system_prompt: Some(SYSTEM_PROMPT.to_string()),
                    max_tokens: 512,
                    temperature: 0.2,
                },
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExtractedArticle;
    use async_trait::async_trait;

    struct StubNews {
        articles: Vec<NewsArticle>,
        extracted: Option<ExtractedArticle>,
    }

    #[async_trait]
    impl NewsProvider for StubNews {
        async fn search_news(&self, _query: &NewsQuery) -> Result<Vec<NewsArticle>, AppError> {
            Ok(self.articles.clone())
        }

        async fn top_news(
            &self,
            _source_country: &str,
            _date: Option<&str>,
        ) -> Result<Vec<NewsArticle>, AppError> {
            Ok(Vec::new())
        }

        async fn extract_article(
            &self,
            _url: &str,
        ) -> Result<Option<ExtractedArticle>, AppError> {
            Ok(self.extracted.clone())
        }
    }

    struct StubChat {
        content: Option<String>,
    }

    #[async_trait]
    impl ChatCompletions for StubChat {
        async fn chat(
            &self,
            _user_prompt: &str,
            _options: &ChatOptions,
        ) -> Result<Option<String>, AppError> {
            Ok(self.content.clone())
        }
    }

    fn article(url: Option<&str>) -> NewsArticle {
        NewsArticle {
            id: None,
            title: "EU widens sanctions list".to_string(),
            text: None,
            summary: Some("More entities added.".to_string()),
            url: url.map(|u| u.to_string()),
            publish_date: Some("2025-11-01 10:00:00".to_string()),
            authors: vec!["Brussels Desk".to_string()],
        }
    }

    #[tokio::test]
    async fn summarizes_the_scraped_article() {
        let service = NewsSummaryService::new(
            Arc::new(StubNews {
                articles: vec![article(Some("https://example.com/eu"))],
                extracted: Some(ExtractedArticle {
                    title: Some("EU widens sanctions list again".to_string()),
                    text: Some("Full article body.".to_string()),
                    url: Some("https://example.com/eu".to_string()),
                    publish_date: None,
                    authors: Vec::new(),
                }),
            }),
            Arc::new(StubChat {
                content: Some("- entities added\n- compliance impact".to_string()),
            }),
        );

        let summary = service
            .summary_for_event("EU Sanctions Update")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(summary.title, "EU widens sanctions list again");
        assert!(summary.summary.starts_with("- entities added"));
        assert_eq!(summary.source.as_deref(), Some("Brussels Desk"));
        assert_eq!(summary.event_type, "EU Sanctions Update");
    }

    #[tokio::test]
    async fn falls_back_to_search_snippets_when_scrape_fails() {
        let service = NewsSummaryService::new(
            Arc::new(StubNews {
                articles: vec![article(Some("https://example.com/eu"))],
                extracted: None,
            }),
            Arc::new(StubChat { content: None }),
        );

        let summary = service
            .summary_for_event("EU Sanctions Update")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(summary.title, "EU widens sanctions list");
        assert_eq!(summary.summary, "More entities added.");
    }

    #[tokio::test]
    async fn no_articles_means_no_summary() {
        let service = NewsSummaryService::new(
            Arc::new(StubNews {
                articles: Vec::new(),
                extracted: None,
            }),
            Arc::new(StubChat { content: None }),
        );
        assert!(service
            .summary_for_event("EU Sanctions Update")
            .await
            .unwrap()
            .is_none());
    }
}

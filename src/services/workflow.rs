//! Geopolitical → financial workflow pipeline.
//!
//! One run per inbound request, strictly sequential:
//! news → extraction → reasoning → estimates → rebalance → persist.
//! Soft upstream failures reduce fidelity (steps come back `None`); only
//! hard failures abort the run.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::external::{estimates_for_tickers, EstimatesProvider, NewsProvider, NewsQuery};
use crate::models::{
    AgentReasoning, AnalystEstimate, ExtractedEvent, GeoEventType, KeyEvent, NewGeoEvent,
    NewsArticle, PortfolioHolding, RebalancePlan, ReconciliationTask, Severity, TaskPriority,
    TaskStatus, WorkflowResponse,
};
use crate::services::extraction::ExtractionService;
use crate::services::reasoning::ReasoningService;
use crate::services::rebalance;
use crate::store::{EventRepository, MemoryRepository};

pub const DEFAULT_QUERY: &str = "US politics economy tariffs";

/// Tickers queried for estimates when reasoning suggests none.
const DEFAULT_ESTIMATE_TICKERS: [&str; 4] = ["NVDA", "AMD", "SOXX", "XLU"];

#[derive(Debug, Clone, Default)]
pub struct WorkflowRequest {
    pub query: Option<String>,
    pub use_top_news: bool,
    pub from: Option<String>,
    pub to: Option<String>,
    pub timestamp: Option<String>,
    pub portfolio: Vec<PortfolioHolding>,
}

pub struct WorkflowService {
    news: Arc<dyn NewsProvider>,
    extraction: ExtractionService,
    reasoning: ReasoningService,
    estimates: Arc<dyn EstimatesProvider>,
    repo: Arc<dyn EventRepository>,
    fallback: Arc<MemoryRepository>,
}

impl WorkflowService {
    pub fn new(
        news: Arc<dyn NewsProvider>,
        extraction: ExtractionService,
        reasoning: ReasoningService,
        estimates: Arc<dyn EstimatesProvider>,
        repo: Arc<dyn EventRepository>,
        fallback: Arc<MemoryRepository>,
    ) -> Self {
        Self {
            news,
            extraction,
            reasoning,
            estimates,
            repo,
            fallback,
        }
    }

    pub async fn run(&self, request: WorkflowRequest) -> Result<WorkflowResponse, AppError> {
        let window = DateWindow::from_request(&request);

        let news = if request.use_top_news {
            self.news
                .top_news("us", window.top_news_date.as_deref())
                .await?
        } else {
            self.news
                .search_news(&NewsQuery {
                    text: Some(
                        request
                            .query
                            .clone()
                            .unwrap_or_else(|| DEFAULT_QUERY.to_string()),
                    ),
                    language: Some("en".to_string()),
                    categories: Some("politics,technology,business".to_string()),
                    number: Some(5),
                    earliest_publish_date: window.earliest,
                    latest_publish_date: window.latest,
                    ..NewsQuery::default()
                })
                .await?
        };

        let headlines = news
            .iter()
            .map(|article| {
                format!(
                    "{}. {}",
                    article.title,
                    article.summary.as_deref().unwrap_or_default()
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        if headlines.trim().is_empty() {
            info!("workflow found no news for the requested window");
            return Ok(WorkflowResponse {
                step1_news: Vec::new(),
                step2_extraction: None,
                step3_reasoning: None,
                step4_estimates: HashMap::new(),
                step5_rebalance: RebalancePlan::default(),
                key_event_id: None,
                error: Some("No news articles found".to_string()),
            });
        }

        let extraction = self.extraction.analyze(&headlines).await?;
        let reasoning = match &extraction {
            Some(event) => self.reasoning.assess(event).await?,
            None => None,
        };

        let tickers: Vec<String> = reasoning
            .as_ref()
            .filter(|r| !r.suggested_tickers.is_empty())
            .map(|r| r.suggested_tickers.iter().take(5).cloned().collect())
            .unwrap_or_else(|| {
                DEFAULT_ESTIMATE_TICKERS
                    .iter()
                    .map(|ticker| ticker.to_string())
                    .collect()
            });
        let estimates = estimates_for_tickers(self.estimates.as_ref(), &tickers).await;

        let plan = rebalance::compute(extraction.as_ref(), reasoning.as_ref(), &request.portfolio);

        let key_event_id = self
            .persist_run(&news, &extraction, &reasoning, &estimates, &plan)
            .await;

        info!(
            "workflow complete: {} articles, severity {:?}, {} adjustments",
            news.len(),
            extraction.as_ref().map(|event| event.severity),
            plan.adjustments.len()
        );

        Ok(WorkflowResponse {
            step1_news: news,
            step2_extraction: extraction,
            step3_reasoning: reasoning,
            step4_estimates: estimates,
            step5_rebalance: plan,
            key_event_id: Some(key_event_id),
            error: None,
        })
    }

    /// Wire the run into the dashboards and store the snapshot. Store
    /// failures degrade to the in-memory repository and never fail the
    /// response.
    async fn persist_run(
        &self,
        news: &[NewsArticle],
        extraction: &Option<ExtractedEvent>,
        reasoning: &Option<AgentReasoning>,
        estimates: &HashMap<String, Vec<AnalystEstimate>>,
        plan: &RebalancePlan,
    ) -> String {
        let now = Utc::now();
        let now_display = now.format("%Y-%m-%d %H:%M:%S").to_string();
        let id = format!("wf-{}", now.timestamp_millis());

        for article in news {
            let geo = NewGeoEvent {
                timestamp: article
                    .publish_date
                    .clone()
                    .unwrap_or_else(|| now_display.clone()),
                kind: GeoEventType::Political,
                severity: extraction
                    .as_ref()
                    .map(|event| event.severity)
                    .unwrap_or(Severity::Medium),
                title: article.title.clone(),
                description: article
                    .summary
                    .clone()
                    .or_else(|| {
                        article
                            .text
                            .as_ref()
                            .map(|text| text.chars().take(300).collect())
                    })
                    .unwrap_or_default(),
                country: extraction
                    .as_ref()
                    .and_then(|event| event.affected_countries.first().cloned())
                    .unwrap_or_else(|| "Global".to_string()),
                affected_transactions: 0,
                source: article
                    .authors
                    .first()
                    .cloned()
                    .unwrap_or_else(|| "World News API".to_string()),
            };
            if let Err(e) = self.repo.insert_geo_event(&geo).await {
                warn!("geo event insert failed: {e}");
            }
        }

        if !plan.adjustments.is_empty() {
            let task = ReconciliationTask {
                id: format!("rec-{}", now.timestamp_millis()),
                event_type: extraction
                    .as_ref()
                    .map(|event| event.event_type.clone())
                    .unwrap_or_else(|| "Workflow Rebalance".to_string()),
                triggered_by: "Geopolitical Workflow".to_string(),
                status: TaskStatus::Completed,
                transactions_scanned: 0,
                transactions_flagged: 0,
                transactions_reconciled: plan.adjustments.len() as i64,
                start_time: now_display.clone(),
                completion_time: Some(now_display),
                estimated_savings: 0.0,
                assigned_to: Some("AI Engine".to_string()),
                priority: TaskPriority::High,
            };
            if let Err(e) = self.repo.insert_reconciliation_task(&task).await {
                warn!("reconciliation task insert failed: {e}");
            }
        }

        let key_event = KeyEvent {
            id: id.clone(),
            timestamp: now,
            news: news.to_vec(),
            extraction: extraction.clone(),
            reasoning: reasoning.clone(),
            estimates: estimates.clone(),
            rebalance: plan.clone(),
        };

        if let Err(e) = self.repo.store_key_event(&key_event).await {
            warn!("key event store failed, keeping snapshot in memory: {e}");
            if let Err(e) = self.fallback.store_key_event(&key_event).await {
                warn!("in-memory key event store failed: {e}");
            }
        }

        id
    }
}

struct DateWindow {
    earliest: Option<String>,
    latest: Option<String>,
    top_news_date: Option<String>,
}

impl DateWindow {
    /// `timestamp` wins and spans a 24-hour window; otherwise `from`/`to`
    /// bound the search independently. Unparseable values are ignored.
    fn from_request(request: &WorkflowRequest) -> Self {
        if let Some(instant) = request.timestamp.as_deref().and_then(parse_flexible) {
            return Self {
                earliest: Some(to_api_date(instant)),
                latest: Some(to_api_date(instant + Duration::days(1))),
                top_news_date: Some(instant.format("%Y-%m-%d").to_string()),
            };
        }

        Self {
            earliest: request
                .from
                .as_deref()
                .and_then(parse_flexible)
                .map(to_api_date),
            latest: request
                .to
                .as_deref()
                .and_then(parse_flexible)
                .map(to_api_date),
            top_news_date: None,
        }
    }
}

fn parse_flexible(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(parsed.and_utc());
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(parsed.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

/// `YYYY-MM-DD HH:MM:SS`, the format the news API expects.
fn to_api_date(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::{ChatCompletions, ChatOptions};
    use async_trait::async_trait;

    struct StubNews {
        articles: Vec<NewsArticle>,
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
            Ok(self.articles.clone())
        }

        async fn extract_article(
            &self,
            _url: &str,
        ) -> Result<Option<crate::models::ExtractedArticle>, AppError> {
            Ok(None)
        }
    }

    /// Routes on the system prompt: the extraction and reasoning passes use
    /// the same chat seam but distinct personas.
    struct StubChat {
        extraction: Option<String>,
        reasoning: Option<String>,
    }

    #[async_trait]
    impl ChatCompletions for StubChat {
        async fn chat(
            &self,
            _user_prompt: &str,
            options: &ChatOptions,
        ) -> Result<Option<String>, AppError> {
            let system = options.system_prompt.as_deref().unwrap_or_default();
            if system.contains("geopolitical risk analyst") {
                Ok(self.extraction.clone())
            } else {
                Ok(self.reasoning.clone())
            }
        }
    }

    struct StubEstimates;

    #[async_trait]
    impl EstimatesProvider for StubEstimates {
        async fn analyst_estimates(
            &self,
            _ticker: &str,
            _period: &str,
        ) -> Result<Vec<AnalystEstimate>, AppError> {
            Ok(Vec::new())
        }
    }

    fn chip_tariff_articles() -> Vec<NewsArticle> {
        vec![
            NewsArticle {
                id: Some(1),
                title: "TSMC braces for chip tariffs".to_string(),
                text: None,
                summary: Some("Fresh export controls loom over Taiwan fabs.".to_string()),
                url: Some("https://example.com/a".to_string()),
                publish_date: Some("2025-11-02 08:00:00".to_string()),
                authors: vec!["Wire Desk".to_string()],
            },
            NewsArticle {
                id: Some(2),
                title: "Washington weighs chip tariffs".to_string(),
                text: None,
                summary: None,
                url: None,
                publish_date: None,
                authors: Vec::new(),
            },
        ]
    }

    fn service(
        articles: Vec<NewsArticle>,
        extraction: Option<&str>,
        reasoning: Option<&str>,
    ) -> (WorkflowService, Arc<MemoryRepository>) {
        let repo = Arc::new(MemoryRepository::new());
        let chat: Arc<dyn ChatCompletions> = Arc::new(StubChat {
            extraction: extraction.map(|s| s.to_string()),
            reasoning: reasoning.map(|s| s.to_string()),
        });
        let service = WorkflowService::new(
            Arc::new(StubNews { articles }),
            ExtractionService::new(chat.clone()),
            ReasoningService::new(chat),
            Arc::new(StubEstimates),
            repo.clone(),
            Arc::new(MemoryRepository::new()),
        );
        (service, repo)
    }

    #[tokio::test]
    async fn critical_chip_event_produces_the_expected_plan() {
        let (service, repo) = service(
            chip_tariff_articles(),
            Some(
                r#"{"event_type": "Trade Restriction", "affected_countries": ["TW"], "affected_industries": ["semiconductors"], "severity": "CRITICAL"}"#,
            ),
            Some(
                r#"{"geo_risk_assessment": "severe", "market_impact": "broad", "portfolio_recommendation": "hedge", "suggested_tickers": []}"#,
            ),
        );

        let response = service.run(WorkflowRequest::default()).await.unwrap();

        let plan = &response.step5_rebalance;
        assert_eq!(plan.adjustments.len(), 3);
        assert_eq!(plan.adjustments[0].ticker, "NVDA");
        assert_eq!(plan.adjustments[0].delta_percent, -6.0);
        assert_eq!(plan.adjustments[1].ticker, "AMD");
        assert_eq!(plan.adjustments[1].delta_percent, -6.0);
        assert_eq!(plan.adjustments[2].ticker, "XLU");
        assert_eq!(plan.adjustments[2].delta_percent, 3.0);
        assert_eq!(
            plan.freeze_exposure,
            Some(vec!["NVDA".to_string(), "AMD".to_string()])
        );

        // Empty suggested tickers fall back to the default basket.
        let mut queried: Vec<&str> = response
            .step4_estimates
            .keys()
            .map(String::as_str)
            .collect();
        queried.sort_unstable();
        assert_eq!(queried, vec!["AMD", "NVDA", "SOXX", "XLU"]);

        // The snapshot is durable and queryable by its id.
        let id = response.key_event_id.expect("key event id");
        let stored = repo.key_event_by_id(&id).await.unwrap().expect("stored");
        assert_eq!(stored.news, response.step1_news);
        assert_eq!(stored.rebalance, response.step5_rebalance);

        // Dashboards get one geo row per article and one completed task.
        let geo = repo.geo_events(50).await.unwrap();
        assert_eq!(geo.len(), 2);
        assert_eq!(geo[0].severity, Severity::Critical);
        assert_eq!(geo[0].country, "TW");

        let tasks = repo.reconciliation_tasks().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].transactions_reconciled, 3);
        assert_eq!(tasks[0].status, TaskStatus::Completed);
    }

    #[tokio::test]
    async fn empty_news_short_circuits_the_run() {
        let (service, repo) = service(Vec::new(), None, None);
        let response = service.run(WorkflowRequest::default()).await.unwrap();

        assert!(response.step1_news.is_empty());
        assert!(response.step2_extraction.is_none());
        assert!(response.step5_rebalance.adjustments.is_empty());
        assert_eq!(response.error.as_deref(), Some("No news articles found"));
        assert!(response.key_event_id.is_none());
        assert!(repo.key_events(50).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn extraction_soft_failure_degrades_but_still_persists() {
        let (service, repo) = service(chip_tariff_articles(), None, None);
        let response = service.run(WorkflowRequest::default()).await.unwrap();

        assert!(response.step2_extraction.is_none());
        assert!(response.step3_reasoning.is_none());
        assert!(response.step5_rebalance.adjustments.is_empty());
        assert_eq!(response.step4_estimates.len(), 4);

        let id = response.key_event_id.expect("key event id");
        let stored = repo.key_event_by_id(&id).await.unwrap().expect("stored");
        assert!(stored.extraction.is_none());

        // Severity defaults to MEDIUM on the dashboard rows.
        let geo = repo.geo_events(50).await.unwrap();
        assert_eq!(geo[0].severity, Severity::Medium);
        assert_eq!(geo[0].country, "Global");
        // No adjustments, no reconciliation task.
        assert!(repo.reconciliation_tasks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn portfolio_filters_the_plan() {
        let (service, _repo) = service(
            chip_tariff_articles(),
            Some(
                r#"{"event_type": "Trade Restriction", "affected_countries": ["TW"], "affected_industries": ["chips"], "severity": "HIGH"}"#,
            ),
            None,
        );

        let request = WorkflowRequest {
            portfolio: vec![PortfolioHolding {
                ticker: "XLU".to_string(),
                weight: None,
            }],
            ..WorkflowRequest::default()
        };
        let response = service.run(request).await.unwrap();

        let plan = &response.step5_rebalance;
        assert_eq!(plan.adjustments.len(), 1);
        assert_eq!(plan.adjustments[0].ticker, "XLU");
        assert_eq!(plan.adjustments[0].delta_percent, 3.0);
    }

    #[test]
    fn timestamp_window_spans_a_day() {
        let request = WorkflowRequest {
            timestamp: Some("2025-11-02T06:30:00Z".to_string()),
            ..WorkflowRequest::default()
        };
        let window = DateWindow::from_request(&request);
        assert_eq!(window.earliest.as_deref(), Some("2025-11-02 06:30:00"));
        assert_eq!(window.latest.as_deref(), Some("2025-11-03 06:30:00"));
        assert_eq!(window.top_news_date.as_deref(), Some("2025-11-02"));
    }

    #[test]
    fn bare_dates_and_garbage_are_handled() {
        let request = WorkflowRequest {
            from: Some("2025-11-01".to_string()),
            to: Some("not a date".to_string()),
            ..WorkflowRequest::default()
        };
        let window = DateWindow::from_request(&request);
        assert_eq!(window.earliest.as_deref(), Some("2025-11-01 00:00:00"));
        assert!(window.latest.is_none());
    }
}

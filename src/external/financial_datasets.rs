use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::warn;

use crate::errors::AppError;
use crate::models::AnalystEstimate;

const BASE_URL: &str = "https://api.financialdatasets.ai";

/// Analyst estimates per ticker. Best-effort by contract: a missing API key
/// or any upstream failure yields an empty list, never an error surfaced to
/// the pipeline.
#[async_trait]
pub trait EstimatesProvider: Send + Sync {
    async fn analyst_estimates(
        &self,
        ticker: &str,
        period: &str,
    ) -> Result<Vec<AnalystEstimate>, AppError>;
}

#[derive(Debug, Deserialize)]
struct EstimatesResponse {
    #[serde(default)]
    analyst_estimates: Vec<AnalystEstimate>,
}

pub struct FinancialDatasetsProvider {
    client: Client,
    api_key: Option<String>,
}

impl FinancialDatasetsProvider {
    pub fn from_env() -> Self {
        Self {
            client: Client::new(),
            api_key: std::env::var("FINANCIAL_DATASETS_API_KEY").ok(),
        }
    }
}

#[async_trait]
impl EstimatesProvider for FinancialDatasetsProvider {
    async fn analyst_estimates(
        &self,
        ticker: &str,
        period: &str,
    ) -> Result<Vec<AnalystEstimate>, AppError> {
        let Some(key) = self.api_key.as_deref() else {
            return Ok(Vec::new());
        };

        let response = self
            .client
            .get(format!("{BASE_URL}/analyst-estimates/"))
            .query(&[("ticker", ticker), ("period", period)])
            .header("X-API-KEY", key)
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                warn!("analyst estimates request failed for {ticker}: {e}");
                return Ok(Vec::new());
            }
        };

        if !response.status().is_success() {
            warn!(
                "analyst estimates returned {} for {ticker}",
                response.status()
            );
            return Ok(Vec::new());
        }

        match response.json::<EstimatesResponse>().await {
            Ok(parsed) => Ok(parsed.analyst_estimates),
            Err(e) => {
                warn!("failed to parse analyst estimates for {ticker}: {e}");
                Ok(Vec::new())
            }
        }
    }
}

/// Fetch estimates for each ticker in turn. Per-ticker failures degrade to
/// an empty list so one bad symbol cannot sink the batch.
pub async fn estimates_for_tickers(
    provider: &dyn EstimatesProvider,
    tickers: &[String],
) -> HashMap<String, Vec<AnalystEstimate>> {
    let mut estimates = HashMap::new();
    for ticker in tickers {
        let rows = match provider.analyst_estimates(ticker, "annual").await {
            Ok(rows) => rows,
            Err(e) => {
                warn!("skipping estimates for {ticker}: {e}");
                Vec::new()
            }
        };
        estimates.insert(ticker.clone(), rows);
    }
    estimates
}

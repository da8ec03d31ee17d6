use std::sync::Arc;
use tracing::warn;

use crate::errors::AppError;
use crate::external::{ChatCompletions, ChatOptions};
use crate::models::{AgentReasoning, ExtractedEvent};
use crate::services::decode;

const SYSTEM_PROMPT: &str = r#"You coordinate three specialist agents: GeoRisk, MarketImpact, Portfolio. Assess impact on a US equity portfolio. Respond ONLY with valid JSON:
{
  "geo_risk_assessment": "GeoRisk Agent: historical analogs, country risk",
  "market_impact": "MarketImpact Agent: sector sensitivity, volatility outlook",
  "portfolio_recommendation": "Portfolio Agent: rebalance, hedge, or hold",
  "suggested_tickers": ["NVDA", "AMD", "SOXX", "XLU", "etc"]
}"#;

/// Runs the multi-agent reasoning pass over an extracted event.
pub struct ReasoningService {
    chat: Arc<dyn ChatCompletions>,
}

impl ReasoningService {
    pub fn new(chat: Arc<dyn ChatCompletions>) -> Self {
        Self { chat }
    }

    pub async fn assess(&self, event: &ExtractedEvent) -> Result<Option<AgentReasoning>, AppError> {
        let context = serde_json::to_string_pretty(event)
            .map_err(|e| AppError::External(format!("failed to encode event context: {e}")))?;
        let prompt = format!("Context:\n{context}\n\nAssess impact on US equity portfolio.");
        let options = ChatOptions {
            system_prompt: Some(SYSTEM_PROMPT.to_string()),
            max_tokens: 1024,
            temperature: 0.0,
        };

        let Some(content) = self.chat.chat(&prompt, &options).await? else {
            return Ok(None);
        };

        match decode::agent_reasoning(&content) {
            Ok(reasoning) => Ok(Some(reasoning)),
            Err(e) => {
                warn!("discarding reasoning response: {e}");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;
    use async_trait::async_trait;

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

    fn sample_event() -> ExtractedEvent {
        ExtractedEvent {
            event_type: "Trade Restriction".to_string(),
            affected_countries: vec!["TW".to_string()],
            affected_industries: vec!["semiconductors".to_string()],
            severity: Severity::High,
            summary: None,
        }
    }

    #[tokio::test]
    async fn parses_reasoning_and_tickers() {
        let service = ReasoningService::new(Arc::new(StubChat {
            content: Some(
                r#"{"geo_risk_assessment": "elevated", "market_impact": "volatile", "portfolio_recommendation": "hedge", "suggested_tickers": ["NVDA", "XLU"]}"#
                    .to_string(),
            ),
        }));
        let reasoning = service.assess(&sample_event()).await.unwrap().unwrap();
        assert_eq!(reasoning.portfolio_recommendation, "hedge");
        assert_eq!(reasoning.suggested_tickers, vec!["NVDA", "XLU"]);
    }

    #[tokio::test]
    async fn malformed_output_is_a_soft_failure() {
        let service = ReasoningService::new(Arc::new(StubChat {
            content: Some("not json".to_string()),
        }));
        assert!(service.assess(&sample_event()).await.unwrap().is_none());
    }
}

use std::sync::Arc;
use tracing::warn;

use crate::errors::AppError;
use crate::external::{ChatCompletions, ChatOptions};
use crate::models::ExtractedEvent;
use crate::services::decode;

/// Character budget for the concatenated headlines sent upstream. Overlong
/// input is cut and marked rather than rejected.
const INPUT_CHAR_BUDGET: usize = 8_000;

const SYSTEM_PROMPT: &str = r#"You are a geopolitical risk analyst. Extract structured risk events from news. Respond ONLY with valid JSON matching this schema:
{
  "event_type": "string (e.g. Trade Restriction, Sanctions, Conflict)",
  "affected_countries": ["ISO codes"],
  "affected_industries": ["industry names"],
  "severity": "LOW" | "MEDIUM" | "HIGH" | "CRITICAL",
  "summary": "one sentence"
}"#;

/// Turns raw headlines into a structured risk event.
pub struct ExtractionService {
    chat: Arc<dyn ChatCompletions>,
}

impl ExtractionService {
    pub fn new(chat: Arc<dyn ChatCompletions>) -> Self {
        Self { chat }
    }

    /// `Ok(None)` on any soft upstream failure (5xx, empty or unparseable
    /// output); `Err` only on hard failures that should abort the run.
    pub async fn analyze(&self, headlines: &str) -> Result<Option<ExtractedEvent>, AppError> {
        let input = cap_input(headlines);
        let options = ChatOptions {
            system_prompt: Some(SYSTEM_PROMPT.to_string()),
            max_tokens: 512,
            temperature: 0.0,
        };

        let Some(content) = self.chat.chat(&input, &options).await? else {
            return Ok(None);
        };

        match decode::extracted_event(&content) {
            Ok(event) => Ok(Some(event)),
            Err(e) => {
                warn!("discarding extraction response: {e}");
                Ok(None)
            }
        }
    }
}

fn cap_input(text: &str) -> String {
    if text.chars().count() <= INPUT_CHAR_BUDGET {
        return text.to_string();
    }
    let capped: String = text.chars().take(INPUT_CHAR_BUDGET).collect();
    format!("{capped}\n[input truncated]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;
    use async_trait::async_trait;

    /// Deterministic upstream: always returns the same canned content.
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

    fn service_with(content: Option<&str>) -> ExtractionService {
        ExtractionService::new(Arc::new(StubChat {
            content: content.map(|s| s.to_string()),
        }))
    }

    #[tokio::test]
    async fn identical_input_yields_identical_event() {
        let service = service_with(Some(
            r#"{"event_type": "Sanctions", "affected_countries": ["RU"], "affected_industries": ["energy"], "severity": "HIGH"}"#,
        ));
        let first = service.analyze("Sanctions widen.").await.unwrap();
        let second = service.analyze("Sanctions widen.").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.unwrap().severity, Severity::High);
    }

    #[tokio::test]
    async fn fenced_output_is_unwrapped() {
        let service = service_with(Some(
            "```json\n{\"event_type\": \"Conflict\", \"severity\": \"CRITICAL\"}\n```",
        ));
        let event = service.analyze("headlines").await.unwrap().unwrap();
        assert_eq!(event.event_type, "Conflict");
        assert_eq!(event.severity, Severity::Critical);
    }

    #[tokio::test]
    async fn malformed_output_is_a_soft_failure() {
        let service = service_with(Some("sorry, no JSON today"));
        assert_eq!(service.analyze("headlines").await.unwrap(), None);
    }

    #[tokio::test]
    async fn empty_upstream_is_a_soft_failure() {
        let service = service_with(None);
        assert_eq!(service.analyze("headlines").await.unwrap(), None);
    }

    #[test]
    fn short_input_passes_through_untouched() {
        assert_eq!(cap_input("short headlines"), "short headlines");
    }

    #[test]
    fn overlong_input_is_capped_and_marked() {
        let long = "x".repeat(INPUT_CHAR_BUDGET + 500);
        let capped = cap_input(&long);
        assert!(capped.ends_with("[input truncated]"));
        assert!(capped.chars().count() < long.chars().count());
    }
}

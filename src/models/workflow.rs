use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{AgentReasoning, AnalystEstimate, ExtractedEvent, NewsArticle, RebalancePlan};

/// Durable snapshot of one pipeline run. Written once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub news: Vec<NewsArticle>,
    #[serde(default)]
    pub extraction: Option<ExtractedEvent>,
    #[serde(default)]
    pub reasoning: Option<AgentReasoning>,
    #[serde(default)]
    pub estimates: HashMap<String, Vec<AnalystEstimate>>,
    pub rebalance: RebalancePlan,
}

/// Wire shape of a workflow run, one field per pipeline step.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowResponse {
    pub step1_news: Vec<NewsArticle>,
    pub step2_extraction: Option<ExtractedEvent>,
    pub step3_reasoning: Option<AgentReasoning>,
    pub step4_estimates: HashMap<String, Vec<AnalystEstimate>>,
    pub step5_rebalance: RebalancePlan,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_event_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

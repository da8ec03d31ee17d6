use serde::{Deserialize, Serialize};

/// One analyst estimate row from the financial datasets API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalystEstimate {
    #[serde(default)]
    pub fiscal_period: String,
    #[serde(default)]
    pub period: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub earnings_per_share: Option<f64>,
}

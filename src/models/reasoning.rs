use serde::{Deserialize, Serialize};

/// Narrative output of the specialist-agent reasoning pass.
///
/// Free text by contract; the rebalance synthesizer never reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentReasoning {
    pub geo_risk_assessment: String,
    pub market_impact: String,
    pub portfolio_recommendation: String,
    #[serde(default)]
    pub suggested_tickers: Vec<String>,
}

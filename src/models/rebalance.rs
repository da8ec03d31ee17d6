use serde::{Deserialize, Serialize};

/// A caller-supplied position. An empty holding set means "show all".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioHolding {
    pub ticker: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

/// Request-body form of a holding: either a bare ticker string or the
/// full object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum HoldingSpec {
    Ticker(String),
    Full {
        ticker: String,
        #[serde(default)]
        weight: Option<f64>,
    },
}

impl From<HoldingSpec> for PortfolioHolding {
    fn from(spec: HoldingSpec) -> Self {
        match spec {
            HoldingSpec::Ticker(ticker) => PortfolioHolding {
                ticker,
                weight: None,
            },
            HoldingSpec::Full { ticker, weight } => PortfolioHolding { ticker, weight },
        }
    }
}

/// One suggested percentage-point change for a ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalanceAdjustment {
    pub ticker: String,
    pub delta_percent: f64,
    pub reason: String,
}

/// Deterministic output of the rebalance synthesizer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RebalancePlan {
    #[serde(default)]
    pub adjustments: Vec<RebalanceAdjustment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hedge_with: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeze_exposure: Option<Vec<String>>,
}

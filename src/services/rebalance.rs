//! Deterministic rebalance synthesis. AI decides what happened; code decides
//! how much to move. Pure and total over its inputs.

use crate::models::{
    AgentReasoning, ExtractedEvent, PortfolioHolding, RebalanceAdjustment, RebalancePlan, Severity,
};

pub const SEMICONDUCTOR_BASKET: [&str; 4] = ["NVDA", "AMD", "INTC", "QCOM"];
pub const HEDGE_TICKER: &str = "XLU";

/// Combine the extracted event and the caller's holdings into percentage
/// adjustments. `reasoning` is accepted for signature symmetry with the
/// pipeline but deliberately never read: narrative output must not steer
/// position sizing.
pub fn compute(
    event: Option<&ExtractedEvent>,
    _reasoning: Option<&AgentReasoning>,
    portfolio: &[PortfolioHolding],
) -> RebalancePlan {
    let Some(event) = event else {
        return RebalancePlan::default();
    };

    let held: Vec<String> = portfolio
        .iter()
        .map(|holding| holding.ticker.to_uppercase())
        .collect();
    // Empty portfolio means "show all".
    let include = |ticker: &str| held.is_empty() || held.contains(&ticker.to_uppercase());

    let is_semiconductor = event
        .affected_industries
        .iter()
        .map(|industry| industry.to_lowercase())
        .any(|industry| industry.contains("semiconductor") || industry.contains("chip"));

    if matches!(event.severity, Severity::High | Severity::Critical) && is_semiconductor {
        // NOTE: the CRITICAL factor (0.6) is smaller than the HIGH one (0.7),
        // which reads inverted; preserved as observed pending a product call.
        let reduce_pct = if event.severity == Severity::Critical {
            0.6
        } else {
            0.7
        };

        let mut adjustments = Vec::new();
        for ticker in &SEMICONDUCTOR_BASKET[..2] {
            if include(ticker) {
                adjustments.push(RebalanceAdjustment {
                    ticker: ticker.to_string(),
                    delta_percent: -(reduce_pct * 10.0),
                    reason: format!("High severity {}", event.event_type),
                });
            }
        }
        if include(HEDGE_TICKER) {
            adjustments.push(RebalanceAdjustment {
                ticker: HEDGE_TICKER.to_string(),
                delta_percent: 3.0,
                reason: "Hedge with utilities".to_string(),
            });
        }

        return RebalancePlan {
            adjustments,
            hedge_with: Some(HEDGE_TICKER.to_string()),
            freeze_exposure: Some(
                ["NVDA", "AMD"]
                    .iter()
                    .filter(|ticker| include(ticker))
                    .map(|ticker| ticker.to_string())
                    .collect(),
            ),
        };
    }

    if event.severity == Severity::Medium && is_semiconductor {
        let mut adjustments = Vec::new();
        if include("NVDA") {
            adjustments.push(RebalanceAdjustment {
                ticker: "NVDA".to_string(),
                delta_percent: -2.0,
                reason: "Moderate semiconductor risk".to_string(),
            });
        }
        if include("AMD") {
            adjustments.push(RebalanceAdjustment {
                ticker: "AMD".to_string(),
                delta_percent: -1.5,
                reason: "Moderate semiconductor risk".to_string(),
            });
        }
        return RebalancePlan {
            adjustments,
            ..RebalancePlan::default()
        };
    }

    RebalancePlan::default()
}

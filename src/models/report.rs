use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactType {
    Political,
    Economic,
    Military,
    Social,
    Unknown,
}

impl ImpactType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactType::Political => "political",
            ImpactType::Economic => "economic",
            ImpactType::Military => "military",
            ImpactType::Social => "social",
            ImpactType::Unknown => "unknown",
        }
    }

    pub fn from_str_lossy(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "political" => ImpactType::Political,
            "economic" => ImpactType::Economic,
            "military" => ImpactType::Military,
            "social" => ImpactType::Social,
            _ => ImpactType::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Verified,
    Disputed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Verified => "verified",
            ReportStatus::Disputed => "disputed",
        }
    }

    pub fn from_str_lossy(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "verified" => ReportStatus::Verified,
            "disputed" => ReportStatus::Disputed,
            _ => ReportStatus::Pending,
        }
    }
}

/// A crowd-sourced geopolitical intelligence report with a staked amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntelligenceReport {
    pub id: String,
    pub title: String,
    pub description: String,
    pub event_date: String,
    pub countries: Vec<String>,
    pub impact_type: ImpactType,
    pub stake_amount: f64,
    pub status: ReportStatus,
    pub created_at: String,
}

/// Submission payload for `POST /api/reports/submit`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitReport {
    pub title: String,
    pub description: String,
    pub event_date: String,
    pub countries: Vec<String>,
    pub impact_type: ImpactType,
    pub stake_amount: f64,
}

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Ordinal risk label attached to an extracted event.
///
/// Deserialization is lossy on purpose: model output and stored rows may
/// carry labels outside the closed set, and those coerce to `Medium` rather
/// than failing the whole payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }

    pub fn from_str_lossy(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "LOW" => Severity::Low,
            "HIGH" => Severity::High,
            "CRITICAL" => Severity::Critical,
            _ => Severity::Medium,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Severity::from_str_lossy(&raw))
    }
}

/// Structured risk event extracted from a batch of headlines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedEvent {
    pub event_type: String,
    #[serde(default)]
    pub affected_countries: Vec<String>,
    #[serde(default)]
    pub affected_industries: Vec<String>,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Display category for a geopolitical event row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeoEventType {
    Political,
    Trade,
    Sanctions,
    Regulation,
    Policy,
    Compliance,
}

impl GeoEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeoEventType::Political => "political",
            GeoEventType::Trade => "trade",
            GeoEventType::Sanctions => "sanctions",
            GeoEventType::Regulation => "regulation",
            GeoEventType::Policy => "policy",
            GeoEventType::Compliance => "compliance",
        }
    }

    pub fn from_str_lossy(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "trade" => GeoEventType::Trade,
            "sanctions" => GeoEventType::Sanctions,
            "regulation" => GeoEventType::Regulation,
            "policy" => GeoEventType::Policy,
            "compliance" => GeoEventType::Compliance,
            _ => GeoEventType::Political,
        }
    }
}

/// Denormalized dashboard row derived from pipeline runs; written once,
/// read many.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoEvent {
    pub id: i64,
    pub timestamp: String,
    #[serde(rename = "type")]
    pub kind: GeoEventType,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub country: String,
    pub affected_transactions: i64,
    pub source: String,
}

/// A geo event before the store assigns its row id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGeoEvent {
    pub timestamp: String,
    pub kind: GeoEventType,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub country: String,
    pub affected_transactions: i64,
    pub source: String,
}

impl NewGeoEvent {
    pub fn with_id(self, id: i64) -> GeoEvent {
        GeoEvent {
            id,
            timestamp: self.timestamp,
            kind: self.kind,
            severity: self.severity,
            title: self.title,
            description: self.description,
            country: self.country,
            affected_transactions: self.affected_transactions,
            source: self.source,
        }
    }
}

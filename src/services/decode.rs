//! Schema-validating decoders for model output.
//!
//! The chat model is asked for a single JSON object but its output shape is
//! never trusted: payloads arrive fenced, fields go missing, enums drift.
//! Decoding either yields a fully-coerced domain value or a tagged
//! `SchemaMismatch` the caller downgrades to a soft failure.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use thiserror::Error;

use crate::models::{AgentReasoning, ExtractedEvent, Severity};

#[derive(Debug, Error)]
#[error("schema mismatch: {0}")]
pub struct SchemaMismatch(String);

static CODE_FENCE: OnceLock<Regex> = OnceLock::new();

/// Unwrap a ```json ... ``` fence if present; otherwise return the trimmed
/// text as-is.
pub fn strip_code_fence(text: &str) -> String {
    let re = CODE_FENCE
        .get_or_init(|| Regex::new(r"```(?:json)?\s*([\s\S]*?)```").expect("valid fence pattern"));
    match re.captures(text).and_then(|caps| caps.get(1)) {
        Some(body) => body.as_str().trim().to_string(),
        None => text.trim().to_string(),
    }
}

pub fn extracted_event(text: &str) -> Result<ExtractedEvent, SchemaMismatch> {
    let object = parse_object(text)?;
    Ok(ExtractedEvent {
        event_type: string_field(&object, "event_type").unwrap_or_else(|| "Unknown".to_string()),
        affected_countries: string_vec_field(&object, "affected_countries"),
        affected_industries: string_vec_field(&object, "affected_industries"),
        severity: object
            .get("severity")
            .and_then(Value::as_str)
            .map(Severity::from_str_lossy)
            .unwrap_or(Severity::Medium),
        summary: string_field(&object, "summary"),
    })
}

pub fn agent_reasoning(text: &str) -> Result<AgentReasoning, SchemaMismatch> {
    let object = parse_object(text)?;
    Ok(AgentReasoning {
        geo_risk_assessment: string_field(&object, "geo_risk_assessment").unwrap_or_default(),
        market_impact: string_field(&object, "market_impact").unwrap_or_default(),
        portfolio_recommendation: string_field(&object, "portfolio_recommendation")
            .unwrap_or_default(),
        suggested_tickers: string_vec_field(&object, "suggested_tickers"),
    })
}

fn parse_object(text: &str) -> Result<serde_json::Map<String, Value>, SchemaMismatch> {
    let stripped = strip_code_fence(text);
    let value: Value = serde_json::from_str(&stripped)
        .map_err(|e| SchemaMismatch(format!("not valid JSON: {e}")))?;
    match value {
        Value::Object(object) => Ok(object),
        other => Err(SchemaMismatch(format!(
            "expected a JSON object, got {}",
            type_name(&other)
        ))),
    }
}

fn string_field(object: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(|s| s.to_string())
}

/// Non-array or mixed-type values coerce to the string elements present,
/// which may be none.
fn string_vec_field(object: &serde_json::Map<String, Value>, key: &str) -> Vec<String> {
    object
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(|s| s.to_string()))
                .collect()
        })
        .unwrap_or_default()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a bool",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

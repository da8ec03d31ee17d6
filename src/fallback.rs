//! Canned demo payloads. Read endpoints serve these only after both the
//! store and the live backfill have failed, and every degradation is logged
//! at the call site.

use chrono::{Duration, Utc};

use crate::models::{
    GeoEvent, GeoEventType, ReconciliationTask, Severity, TaskPriority, TaskStatus,
};

fn display_time(offset_minutes: i64) -> String {
    (Utc::now() - Duration::minutes(offset_minutes))
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

pub fn geo_events() -> Vec<GeoEvent> {
    vec![
        GeoEvent {
            id: 1,
            timestamp: display_time(10),
            kind: GeoEventType::Sanctions,
            severity: Severity::High,
            title: "EU updates sanctions list".to_string(),
            description: "New entities added to the restricted list.".to_string(),
            country: "EU".to_string(),
            affected_transactions: 125,
            source: "Automated Policy Monitor".to_string(),
        },
        GeoEvent {
            id: 2,
            timestamp: display_time(45),
            kind: GeoEventType::Trade,
            severity: Severity::Critical,
            title: "New tariffs proposed on semiconductor imports".to_string(),
            description: "Export controls expected to widen to advanced nodes.".to_string(),
            country: "Taiwan".to_string(),
            affected_transactions: 0,
            source: "Geopolitical Monitor".to_string(),
        },
        GeoEvent {
            id: 3,
            timestamp: display_time(120),
            kind: GeoEventType::Policy,
            severity: Severity::Medium,
            title: "Central bank signals steady rates".to_string(),
            description: "No change expected before year end.".to_string(),
            country: "USA".to_string(),
            affected_transactions: 0,
            source: "Regulatory Feed".to_string(),
        },
    ]
}

pub fn reconciliation_tasks() -> Vec<ReconciliationTask> {
    vec![
        ReconciliationTask {
            id: "REC-001".to_string(),
            event_type: "EU Sanctions Update".to_string(),
            triggered_by: "Automated Policy Monitor".to_string(),
            status: TaskStatus::Completed,
            transactions_scanned: 1247,
            transactions_flagged: 125,
            transactions_reconciled: 125,
            start_time: display_time(10),
            completion_time: Some(display_time(9)),
            estimated_savings: 3200.0,
            assigned_to: Some("AI Engine".to_string()),
            priority: TaskPriority::Critical,
        },
        ReconciliationTask {
            id: "REC-002".to_string(),
            event_type: "Belarus Trade Restrictions".to_string(),
            triggered_by: "OFAC Alert".to_string(),
            status: TaskStatus::Completed,
            transactions_scanned: 892,
            transactions_flagged: 45,
            transactions_reconciled: 45,
            start_time: display_time(25),
            completion_time: Some(display_time(24)),
            estimated_savings: 1800.0,
            assigned_to: Some("AI Engine".to_string()),
            priority: TaskPriority::High,
        },
        ReconciliationTask {
            id: "REC-003".to_string(),
            event_type: "Country Risk Update - Brazil".to_string(),
            triggered_by: "Geopolitical Monitor".to_string(),
            status: TaskStatus::RequiresReview,
            transactions_scanned: 567,
            transactions_flagged: 156,
            transactions_reconciled: 142,
            start_time: display_time(60),
            completion_time: None,
            estimated_savings: 1200.0,
            assigned_to: Some("Compliance Team".to_string()),
            priority: TaskPriority::High,
        },
    ]
}

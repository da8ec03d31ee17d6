pub mod geo_event_queries;
pub mod key_event_queries;
pub mod reconciliation_queries;
pub mod report_queries;
pub mod schema;

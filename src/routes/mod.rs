pub(crate) mod events;
pub(crate) mod health;
pub(crate) mod key_events;
pub(crate) mod news_summary;
pub(crate) mod reconciliation_tasks;
pub(crate) mod reports;
pub(crate) mod workflow;

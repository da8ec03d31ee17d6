pub mod dedalus;
pub mod financial_datasets;
pub mod world_news;

pub use dedalus::{ChatCompletions, ChatOptions, DedalusClient, DedalusConfig};
pub use financial_datasets::{estimates_for_tickers, EstimatesProvider, FinancialDatasetsProvider};
pub use world_news::{NewsProvider, NewsQuery, WorldNewsProvider};

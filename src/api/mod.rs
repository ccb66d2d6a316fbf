pub mod client;

pub use client::{ApiClient, PredictionApi, DEFAULT_HISTORY_LIMIT};

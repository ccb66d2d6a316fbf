pub mod api;
pub mod api_worker;
pub mod app;
pub mod config;
pub mod controller;
pub mod error;
pub mod input;
pub mod logger;
pub mod models;
pub mod questions;
pub mod ui;
pub mod utils;

// Re-exports for convenience
pub use api::{ApiClient, PredictionApi, DEFAULT_HISTORY_LIMIT};
pub use api_worker::{handle_request, spawn_api_worker};
pub use app::App;
pub use config::Config;
pub use controller::{validate_numeric, QuizController};
pub use error::{ConfigError, RequestFailure, ValidationError};
pub use models::{
    AnswerSet, AnswerValue, ApiRequest, ApiResponse, AppState, HistoryRecord, Personality,
    PredictionId, PredictionResult, QuizState, Verdict,
};
pub use questions::PERSONALITY_QUESTIONS;
pub use ui::{draw_history, draw_quiz, draw_result};

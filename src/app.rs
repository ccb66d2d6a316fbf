use crate::api::DEFAULT_HISTORY_LIMIT;
use crate::controller::QuizController;
use crate::input::{handle_quiz_input, InputOutcome};
use crate::models::{ApiRequest, ApiResponse, AppState, HistoryView, QuizState};
use crate::ui::{draw_history, draw_quiz, draw_result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::{error, warn};
use ratatui::Frame;
use tokio::sync::mpsc::UnboundedSender;

/// Top-level screen state: the quiz itself plus the history view.
#[derive(Debug)]
pub struct App {
    pub controller: QuizController,
    pub app_state: AppState,
    pub history: HistoryView,
    api_tx: UnboundedSender<ApiRequest>,
}

impl App {
    pub fn new(api_tx: UnboundedSender<ApiRequest>) -> Self {
        Self {
            controller: QuizController::new(api_tx.clone()),
            app_state: AppState::Quiz,
            history: HistoryView::Loading,
            api_tx,
        }
    }

    /// Returns false once the user asked to leave.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self.app_state {
            AppState::Quiz => match handle_quiz_input(&mut self.controller, key) {
                InputOutcome::Continue => true,
                InputOutcome::OpenHistory => {
                    self.app_state = AppState::History;
                    self.request_history();
                    true
                }
                InputOutcome::Quit => false,
            },
            AppState::History => match key.code {
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => false,
                KeyCode::Esc | KeyCode::Char('b') => {
                    self.app_state = AppState::Quiz;
                    true
                }
                KeyCode::Char('r') if self.history != HistoryView::Loading => {
                    self.request_history();
                    true
                }
                _ => true,
            },
        }
    }

    pub fn process_api_response(&mut self, response: ApiResponse) {
        match response {
            ApiResponse::History { records } => self.history = HistoryView::Loaded(records),
            ApiResponse::HistoryFailed { error } => {
                warn!("Error fetching history: {}", error);
                self.history = HistoryView::Failed(error);
            }
            other => {
                self.controller.process_api_response(other);
            }
        }
    }

    pub fn draw(&self, f: &mut Frame) {
        match self.app_state {
            AppState::History => draw_history(f, &self.history),
            AppState::Quiz => match self.controller.state() {
                QuizState::ShowingResult | QuizState::FeedbackRecorded => {
                    draw_result(f, &self.controller)
                }
                _ => draw_quiz(f, &self.controller),
            },
        }
    }

    fn request_history(&mut self) {
        self.history = HistoryView::Loading;
        let request = ApiRequest::History {
            limit: DEFAULT_HISTORY_LIMIT,
        };
        if self.api_tx.send(request).is_err() {
            error!("API worker is gone, history not requested");
            self.history = HistoryView::Failed("API worker stopped".to_string());
        }
    }
}

use crate::error::ValidationError;
use crate::models::{
    AnswerSet, AnswerValue, ApiRequest, ApiResponse, PredictionId, PredictionResult, Question,
    QuestionKind, QuizState, Verdict,
};
use crate::questions::PERSONALITY_QUESTIONS;
use log::{debug, error, info, warn};
use tokio::sync::mpsc::UnboundedSender;

pub const PREDICTION_ERROR_MESSAGE: &str = "Error getting prediction. Please try again.";

/// Drives one quiz attempt at a time: collects answers, asks for a prediction
/// once the last question is answered, and records feedback on the result.
///
/// API calls are handed to the worker over `api_tx`; completions come back
/// through [`QuizController::process_api_response`].
#[derive(Debug)]
pub struct QuizController {
    questions: &'static [Question],
    state: QuizState,
    answers: AnswerSet,
    input_buffer: String,
    result: Option<PredictionResult>,
    correlation_id: Option<PredictionId>,
    error: Option<String>,
    feedback_requested: bool,
    attempt: u64,
    api_tx: UnboundedSender<ApiRequest>,
}

impl QuizController {
    pub fn new(api_tx: UnboundedSender<ApiRequest>) -> Self {
        Self::with_questions(&PERSONALITY_QUESTIONS, api_tx)
    }

    pub fn with_questions(
        questions: &'static [Question],
        api_tx: UnboundedSender<ApiRequest>,
    ) -> Self {
        Self {
            questions,
            state: QuizState::Asking { index: 0 },
            answers: AnswerSet::new(),
            input_buffer: String::new(),
            result: None,
            correlation_id: None,
            error: None,
            feedback_requested: false,
            attempt: 0,
            api_tx,
        }
    }

    pub fn state(&self) -> QuizState {
        self.state
    }

    pub fn questions(&self) -> &'static [Question] {
        self.questions
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        self.result.as_ref()
    }

    pub fn correlation_id(&self) -> Option<&PredictionId> {
        self.correlation_id.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn input(&self) -> &str {
        &self.input_buffer
    }

    pub fn feedback_requested(&self) -> bool {
        self.feedback_requested
    }

    pub fn current_question(&self) -> Option<&'static Question> {
        match self.state {
            QuizState::Asking { index } => self.questions.get(index),
            _ => None,
        }
    }

    /// One-based question number and total, as shown in "Question N of M".
    pub fn progress(&self) -> (usize, usize) {
        let index = match self.state {
            QuizState::Asking { index } => index,
            _ => self.questions.len().saturating_sub(1),
        };
        (index + 1, self.questions.len())
    }

    /// Fraction of the quiz already behind the user, for the progress gauge.
    pub fn progress_ratio(&self) -> f64 {
        if self.questions.is_empty() {
            return 0.0;
        }
        match self.state {
            QuizState::Asking { index } => index as f64 / self.questions.len() as f64,
            _ => 1.0,
        }
    }

    /// While a prediction is outstanding every answer control is disabled.
    pub fn is_busy(&self) -> bool {
        self.state == QuizState::Predicting
    }

    /// Retry is offered once every answer is stored but the user is still on the last question,
    /// which only happens after a failed prediction.
    pub fn can_retry(&self) -> bool {
        self.state == QuizState::Asking { index: self.last_index() }
            && self.answers.is_complete(self.questions)
    }

    pub fn push_char(&mut self, c: char) {
        let Some(question) = self.current_question() else {
            return;
        };
        if question.is_boolean() {
            return;
        }
        if c.is_ascii_digit() || (c == '-' && self.input_buffer.is_empty()) {
            self.input_buffer.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        self.input_buffer.pop();
    }

    pub fn clear_input(&mut self) {
        self.input_buffer.clear();
    }

    /// Submits the input buffer as the answer to the current numeric question.
    pub fn submit_input(&mut self) -> Result<QuizState, ValidationError> {
        let raw = self.input_buffer.clone();
        self.answer_numeric(&raw)
    }

    pub fn answer_numeric(&mut self, raw: &str) -> Result<QuizState, ValidationError> {
        let QuizState::Asking { index } = self.state else {
            debug!("Ignoring numeric answer in state {:?}", self.state);
            return Ok(self.state);
        };
        let questions = self.questions;
        let Some(question) = questions.get(index) else {
            return Ok(self.state);
        };
        let QuestionKind::Numeric { min, max, .. } = question.kind else {
            return Err(ValidationError::WrongQuestionKind {
                field: question.field,
            });
        };

        match validate_numeric(raw, min, max) {
            Ok(value) => {
                self.answers.insert(question.field, AnswerValue::Integer(value));
                self.error = None;
                Ok(self.advance())
            }
            Err(e) => {
                debug!("Rejected '{}' for {}: {}", raw, question.field, e);
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn answer_boolean(&mut self, value: bool) -> Result<QuizState, ValidationError> {
        let QuizState::Asking { index } = self.state else {
            debug!("Ignoring boolean answer in state {:?}", self.state);
            return Ok(self.state);
        };
        let questions = self.questions;
        let Some(question) = questions.get(index) else {
            return Ok(self.state);
        };
        if !question.is_boolean() {
            return Err(ValidationError::WrongQuestionKind {
                field: question.field,
            });
        }

        self.answers.insert(question.field, AnswerValue::Boolean(value));
        self.error = None;
        Ok(self.advance())
    }

    /// Re-issues the prediction with the answers already collected.
    pub fn retry(&mut self) -> QuizState {
        if self.can_retry() {
            info!("Retrying prediction for attempt {}", self.attempt);
            self.request_prediction();
        }
        self.state
    }

    /// Sends the user's verdict on the shown result. Only the first request per attempt is sent.
    pub fn request_feedback(&mut self, is_correct: bool) -> QuizState {
        if self.state != QuizState::ShowingResult || self.feedback_requested {
            return self.state;
        }
        let Some(prediction_id) = self.correlation_id.clone() else {
            debug!("No prediction id, feedback not sent");
            return self.state;
        };

        self.feedback_requested = true;
        let request = ApiRequest::Feedback {
            attempt: self.attempt,
            prediction_id,
            verdict: Verdict::from(is_correct),
        };
        if self.api_tx.send(request).is_err() {
            error!("API worker is gone, feedback not sent");
        }
        self.state
    }

    pub fn reset(&mut self) -> QuizState {
        self.attempt = self.attempt.wrapping_add(1);
        self.state = QuizState::Asking { index: 0 };
        self.answers = AnswerSet::new();
        self.input_buffer.clear();
        self.result = None;
        self.correlation_id = None;
        self.error = None;
        self.feedback_requested = false;
        info!("Quiz reset, starting attempt {}", self.attempt);
        self.state
    }

    /// Applies a worker completion. Completions from an earlier attempt are dropped.
    pub fn process_api_response(&mut self, response: ApiResponse) -> QuizState {
        match response {
            ApiResponse::Prediction { attempt, result }
                if attempt == self.attempt && self.state == QuizState::Predicting =>
            {
                info!(
                    "Received prediction {} ({:?})",
                    result.personality, result.probability
                );
                self.correlation_id = result.prediction_id.clone();
                self.result = Some(result);
                self.error = None;
                self.state = QuizState::ShowingResult;
            }
            ApiResponse::PredictionFailed { attempt, error }
                if attempt == self.attempt && self.state == QuizState::Predicting =>
            {
                warn!("Error making prediction: {}", error);
                self.fail_prediction();
            }
            ApiResponse::FeedbackRecorded { attempt }
                if attempt == self.attempt && self.state == QuizState::ShowingResult =>
            {
                info!("Feedback recorded for attempt {}", attempt);
                self.state = QuizState::FeedbackRecorded;
            }
            ApiResponse::FeedbackFailed { attempt, error } if attempt == self.attempt => {
                // Not surfaced: the result is already on screen.
                warn!("Error submitting feedback: {}", error);
            }
            other => debug!("Discarding response not meant for this attempt: {:?}", other),
        }
        self.state
    }

    fn last_index(&self) -> usize {
        self.questions.len().saturating_sub(1)
    }

    fn advance(&mut self) -> QuizState {
        let QuizState::Asking { index } = self.state else {
            return self.state;
        };
        self.input_buffer.clear();
        if index + 1 < self.questions.len() {
            self.state = QuizState::Asking { index: index + 1 };
        } else {
            self.request_prediction();
        }
        self.state
    }

    fn request_prediction(&mut self) {
        debug_assert!(self.answers.is_complete(self.questions));
        self.state = QuizState::Predicting;
        self.error = None;
        self.input_buffer.clear();

        let request = ApiRequest::Predict {
            attempt: self.attempt,
            answers: self.answers.clone(),
        };
        if self.api_tx.send(request).is_err() {
            error!("API worker is gone, prediction not requested");
            self.fail_prediction();
        }
    }

    /// Back to the last question with its answer kept and pre-filled.
    fn fail_prediction(&mut self) {
        let last = self.last_index();
        self.state = QuizState::Asking { index: last };
        self.error = Some(PREDICTION_ERROR_MESSAGE.to_string());
        if let Some(question) = self.questions.get(last)
            && let Some(AnswerValue::Integer(value)) = self.answers.get(question.field)
        {
            self.input_buffer = value.to_string();
        }
    }
}

/// Present, an integer, and within the question's bounds when it has them.
pub fn validate_numeric(
    raw: &str,
    min: Option<i64>,
    max: Option<i64>,
) -> Result<i64, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { min });
    }
    let value: i64 = trimmed
        .parse()
        .map_err(|_| ValidationError::NotAnInteger {
            input: trimmed.to_string(),
            min,
        })?;
    if let Some(min) = min
        && value < min
    {
        return Err(ValidationError::BelowMinimum { value, min });
    }
    if let Some(max) = max
        && value > max
    {
        return Err(ValidationError::AboveMaximum { value, max });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Personality;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    fn controller() -> (QuizController, UnboundedReceiver<ApiRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (QuizController::new(tx), rx)
    }

    /// Answers all seven questions with the scenario values.
    fn answer_all(controller: &mut QuizController) {
        controller.answer_numeric("3").unwrap();
        controller.answer_boolean(true).unwrap();
        controller.answer_numeric("2").unwrap();
        controller.answer_numeric("5").unwrap();
        controller.answer_boolean(false).unwrap();
        controller.answer_numeric("10").unwrap();
        controller.answer_numeric("1").unwrap();
    }

    fn introvert_result() -> PredictionResult {
        PredictionResult {
            personality: Personality::Introvert,
            probability: [0.2, 0.8],
            prediction_id: Some(PredictionId::Text("abc123".to_string())),
            feature_details: None,
        }
    }

    fn to_result(controller: &mut QuizController, rx: &mut UnboundedReceiver<ApiRequest>) {
        answer_all(controller);
        let _ = rx.try_recv().unwrap();
        controller.process_api_response(ApiResponse::Prediction {
            attempt: 0,
            result: introvert_result(),
        });
    }

    #[test]
    fn test_initial_state() {
        let (controller, _rx) = controller();
        assert_eq!(controller.state(), QuizState::Asking { index: 0 });
        assert!(controller.answers().is_empty());
        assert_eq!(controller.progress(), (1, 7));
        assert_eq!(controller.progress_ratio(), 0.0);
        assert!(controller.error().is_none());
    }

    #[test]
    fn test_validate_numeric() {
        assert_eq!(validate_numeric(" 12 ", Some(0), None), Ok(12));
        assert_eq!(
            validate_numeric("", Some(0), None),
            Err(ValidationError::Empty { min: Some(0) })
        );
        assert!(matches!(
            validate_numeric("3.5", Some(0), None),
            Err(ValidationError::NotAnInteger { .. })
        ));
        assert!(matches!(
            validate_numeric("abc", None, None),
            Err(ValidationError::NotAnInteger { .. })
        ));
        assert_eq!(validate_numeric("-4", None, None), Ok(-4));
        assert_eq!(
            validate_numeric("8", Some(0), Some(7)),
            Err(ValidationError::AboveMaximum { value: 8, max: 7 })
        );
    }

    #[test]
    fn test_below_minimum_leaves_answers_unchanged() {
        for (i, question) in PERSONALITY_QUESTIONS.iter().enumerate() {
            let QuestionKind::Numeric { min: Some(min), .. } = question.kind else {
                continue;
            };
            let (tx, _rx) = mpsc::unbounded_channel();
            let mut controller = QuizController::new(tx);
            // Walk up to the question under test
            for earlier in &PERSONALITY_QUESTIONS[..i] {
                if earlier.is_boolean() {
                    controller.answer_boolean(true).unwrap();
                } else {
                    controller.answer_numeric("1").unwrap();
                }
            }
            let before = controller.answers().clone();

            let err = controller
                .answer_numeric(&(min - 1).to_string())
                .unwrap_err();

            assert!(matches!(err, ValidationError::BelowMinimum { .. }));
            assert_eq!(controller.answers(), &before);
            assert_eq!(controller.state(), QuizState::Asking { index: i });
            assert_eq!(controller.error(), Some(err.to_string().as_str()));
        }
    }

    #[test]
    fn test_above_maximum_rejected() {
        let (mut controller, _rx) = controller();
        let err = controller.answer_numeric("25").unwrap_err();
        assert_eq!(err, ValidationError::AboveMaximum { value: 25, max: 24 });
        assert_eq!(controller.error(), Some("Value must be at most 24"));
        assert!(controller.answers().is_empty());

        // A valid answer clears the error and advances
        controller.answer_numeric("24").unwrap();
        assert!(controller.error().is_none());
        assert_eq!(controller.state(), QuizState::Asking { index: 1 });
    }

    #[test]
    fn test_boolean_answers_always_advance() {
        for value in [true, false] {
            let (mut controller, _rx) = controller();
            controller.answer_numeric("4").unwrap();
            let state = controller.answer_boolean(value).unwrap();
            assert_eq!(state, QuizState::Asking { index: 2 });
            assert_eq!(
                controller.answers().get("stage_fear"),
                Some(AnswerValue::Boolean(value))
            );
        }
    }

    #[test]
    fn test_wrong_question_kind_rejected() {
        let (mut controller, _rx) = controller();
        assert_eq!(
            controller.answer_boolean(true),
            Err(ValidationError::WrongQuestionKind {
                field: "time_spent_alone"
            })
        );
        controller.answer_numeric("1").unwrap();
        assert!(controller.answer_numeric("1").is_err());
        assert_eq!(controller.answers().len(), 1);
    }

    #[test]
    fn test_completing_quiz_sends_exactly_one_predict() {
        let (mut controller, mut rx) = controller();
        answer_all(&mut controller);

        assert_eq!(controller.state(), QuizState::Predicting);
        assert!(controller.is_busy());

        let ApiRequest::Predict { attempt, answers } = rx.try_recv().unwrap() else {
            panic!("expected a predict request");
        };
        assert_eq!(attempt, 0);
        assert_eq!(answers.len(), 7);
        assert!(answers.is_complete(&PERSONALITY_QUESTIONS));
        assert_eq!(answers.get("time_spent_alone"), Some(AnswerValue::Integer(3)));
        assert_eq!(answers.get("stage_fear"), Some(AnswerValue::Boolean(true)));
        assert_eq!(answers.get("social_event_attendance"), Some(AnswerValue::Integer(2)));
        assert_eq!(answers.get("going_outside"), Some(AnswerValue::Integer(5)));
        assert_eq!(
            answers.get("drained_after_socializing"),
            Some(AnswerValue::Boolean(false))
        );
        assert_eq!(answers.get("friends_circle_size"), Some(AnswerValue::Integer(10)));
        assert_eq!(answers.get("post_frequency"), Some(AnswerValue::Integer(1)));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_input_ignored_while_predicting() {
        let (mut controller, mut rx) = controller();
        answer_all(&mut controller);
        let _ = rx.try_recv().unwrap();

        controller.push_char('5');
        assert_eq!(controller.answer_numeric("5"), Ok(QuizState::Predicting));
        assert_eq!(controller.retry(), QuizState::Predicting);
        assert!(controller.input().is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_successful_prediction_shows_result() {
        let (mut controller, mut rx) = controller();
        to_result(&mut controller, &mut rx);

        assert_eq!(controller.state(), QuizState::ShowingResult);
        assert_eq!(controller.result(), Some(&introvert_result()));
        assert_eq!(
            controller.correlation_id(),
            Some(&PredictionId::Text("abc123".to_string()))
        );
    }

    #[test]
    fn test_failed_prediction_returns_to_last_question_and_retry() {
        let (mut controller, mut rx) = controller();
        answer_all(&mut controller);
        let _ = rx.try_recv().unwrap();

        controller.process_api_response(ApiResponse::PredictionFailed {
            attempt: 0,
            error: "status 500".to_string(),
        });

        assert_eq!(controller.state(), QuizState::Asking { index: 6 });
        assert_eq!(controller.error(), Some(PREDICTION_ERROR_MESSAGE));
        assert_eq!(controller.answers().len(), 7);
        assert_eq!(controller.input(), "1");
        assert!(controller.can_retry());

        assert_eq!(controller.retry(), QuizState::Predicting);
        assert!(controller.error().is_none());
        assert!(matches!(rx.try_recv().unwrap(), ApiRequest::Predict { .. }));
    }

    #[test]
    fn test_resubmitting_last_answer_also_retries() {
        let (mut controller, mut rx) = controller();
        answer_all(&mut controller);
        let _ = rx.try_recv().unwrap();
        controller.process_api_response(ApiResponse::PredictionFailed {
            attempt: 0,
            error: "down".to_string(),
        });

        assert_eq!(controller.submit_input(), Ok(QuizState::Predicting));
        assert!(matches!(rx.try_recv().unwrap(), ApiRequest::Predict { .. }));
    }

    #[test]
    fn test_retry_needs_complete_answers() {
        let (mut controller, mut rx) = controller();
        assert_eq!(controller.retry(), QuizState::Asking { index: 0 });
        assert!(!controller.can_retry());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_feedback_sent_once() {
        let (mut controller, mut rx) = controller();
        to_result(&mut controller, &mut rx);

        controller.request_feedback(true);
        controller.request_feedback(true);
        controller.request_feedback(false);

        assert_eq!(
            rx.try_recv().unwrap(),
            ApiRequest::Feedback {
                attempt: 0,
                prediction_id: PredictionId::Text("abc123".to_string()),
                verdict: Verdict::Correct,
            }
        );
        assert!(rx.try_recv().is_err());

        let state = controller.process_api_response(ApiResponse::FeedbackRecorded { attempt: 0 });
        assert_eq!(state, QuizState::FeedbackRecorded);

        controller.request_feedback(true);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_feedback_failure_is_not_surfaced() {
        let (mut controller, mut rx) = controller();
        to_result(&mut controller, &mut rx);
        controller.request_feedback(false);
        let _ = rx.try_recv().unwrap();

        let state = controller.process_api_response(ApiResponse::FeedbackFailed {
            attempt: 0,
            error: "status 400".to_string(),
        });

        assert_eq!(state, QuizState::ShowingResult);
        assert!(controller.error().is_none());
        controller.request_feedback(false);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_feedback_needs_result_and_id() {
        let (mut controller, mut rx) = controller();
        controller.request_feedback(true);
        assert!(rx.try_recv().is_err());

        answer_all(&mut controller);
        let _ = rx.try_recv().unwrap();
        controller.process_api_response(ApiResponse::Prediction {
            attempt: 0,
            result: PredictionResult {
                prediction_id: None,
                ..introvert_result()
            },
        });
        controller.request_feedback(true);
        assert!(rx.try_recv().is_err());
        assert_eq!(controller.state(), QuizState::ShowingResult);
    }

    #[test]
    fn test_reset_from_result_clears_everything() {
        let (mut controller, mut rx) = controller();
        to_result(&mut controller, &mut rx);

        let state = controller.reset();

        assert_eq!(state, QuizState::Asking { index: 0 });
        assert!(controller.answers().is_empty());
        assert!(controller.result().is_none());
        assert!(controller.correlation_id().is_none());
        assert!(controller.error().is_none());
        assert!(!controller.feedback_requested());
        assert_eq!(controller.progress(), (1, 7));
    }

    #[test]
    fn test_stale_prediction_after_reset_is_dropped() {
        let (mut controller, mut rx) = controller();
        answer_all(&mut controller);
        let _ = rx.try_recv().unwrap();
        controller.reset();

        let state = controller.process_api_response(ApiResponse::Prediction {
            attempt: 0,
            result: introvert_result(),
        });

        assert_eq!(state, QuizState::Asking { index: 0 });
        assert!(controller.result().is_none());
    }

    #[test]
    fn test_input_buffer_accepts_integers_only() {
        let (mut controller, _rx) = controller();
        for c in "-1a2.3".chars() {
            controller.push_char(c);
        }
        assert_eq!(controller.input(), "-123");
        controller.push_char('-');
        assert_eq!(controller.input(), "-123");
        controller.pop_char();
        assert_eq!(controller.input(), "-12");
        controller.clear_input();
        assert!(controller.input().is_empty());

        controller.answer_numeric("1").unwrap();
        controller.push_char('7');
        assert!(controller.input().is_empty(), "boolean questions take no typed input");
    }

    #[test]
    fn test_advancing_clears_input_buffer() {
        let (mut controller, _rx) = controller();
        controller.push_char('8');
        controller.submit_input().unwrap();
        assert!(controller.input().is_empty());
        assert_eq!(controller.answers().get("time_spent_alone"), Some(AnswerValue::Integer(8)));
    }

    #[test]
    fn test_closed_worker_fails_prediction() {
        let (mut controller, rx) = controller();
        drop(rx);
        answer_all(&mut controller);
        assert_eq!(controller.state(), QuizState::Asking { index: 6 });
        assert_eq!(controller.error(), Some(PREDICTION_ERROR_MESSAGE));
    }

    #[test]
    fn test_progress_ratio_tracks_index() {
        let (mut controller, _rx) = controller();
        controller.answer_numeric("1").unwrap();
        controller.answer_boolean(false).unwrap();
        assert_eq!(controller.progress(), (3, 7));
        assert!((controller.progress_ratio() - 2.0 / 7.0).abs() < f64::EPSILON);
    }
}

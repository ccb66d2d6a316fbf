use crate::controller::QuizController;
use crate::models::QuizState;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Continue,
    OpenHistory,
    Quit,
}

/// Maps a key press on the quiz or result screen onto controller commands.
pub fn handle_quiz_input(controller: &mut QuizController, key: KeyEvent) -> InputOutcome {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return InputOutcome::Quit;
    }

    match controller.state() {
        // Everything but quitting waits for the prediction to come back
        QuizState::Predicting => InputOutcome::Continue,
        QuizState::Asking { .. } => {
            if key.code == KeyCode::Esc {
                return InputOutcome::Quit;
            }
            if ctrl {
                if key.code == KeyCode::Char('r') {
                    controller.retry();
                }
                return InputOutcome::Continue;
            }

            let is_boolean = controller
                .current_question()
                .is_some_and(|q| q.is_boolean());
            if is_boolean {
                match key.code {
                    KeyCode::Char('y') | KeyCode::Char('Y') => {
                        let _ = controller.answer_boolean(true);
                    }
                    KeyCode::Char('n') | KeyCode::Char('N') => {
                        let _ = controller.answer_boolean(false);
                    }
                    _ => {}
                }
            } else {
                match key.code {
                    // A rejected answer is kept on the controller for display
                    KeyCode::Enter => {
                        let _ = controller.submit_input();
                    }
                    KeyCode::Backspace => controller.pop_char(),
                    KeyCode::Char(c) => controller.push_char(c),
                    _ => {}
                }
            }
            InputOutcome::Continue
        }
        QuizState::ShowingResult | QuizState::FeedbackRecorded => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                controller.request_feedback(true);
                InputOutcome::Continue
            }
            KeyCode::Char('n') | KeyCode::Char('N') => {
                controller.request_feedback(false);
                InputOutcome::Continue
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                controller.reset();
                InputOutcome::Continue
            }
            KeyCode::Char('h') | KeyCode::Char('H') => InputOutcome::OpenHistory,
            KeyCode::Esc | KeyCode::Char('q') => InputOutcome::Quit,
            _ => InputOutcome::Continue,
        },
    }
}

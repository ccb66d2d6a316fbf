use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct QuizLayout {
    pub header_area: Rect,
    pub progress_area: Rect,
    pub question_area: Rect,
    pub input_area: Rect,
    pub status_area: Rect,
    pub help_area: Rect,
}

pub struct ResultLayout {
    pub header_area: Rect,
    pub badge_area: Rect,
    pub probability_area: Rect,
    pub details_area: Rect,
    pub feedback_area: Rect,
    pub help_area: Rect,
}

pub struct HistoryLayout {
    pub header_area: Rect,
    pub list_area: Rect,
    pub help_area: Rect,
}

pub fn calculate_quiz_chunks(area: Rect) -> QuizLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(4),
        ])
        .split(area);

    QuizLayout {
        header_area: chunks[0],
        progress_area: chunks[1],
        question_area: chunks[2],
        input_area: chunks[3],
        status_area: chunks[4],
        help_area: chunks[5],
    }
}

pub fn calculate_result_chunks(area: Rect) -> ResultLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            // Two label rows and two gauge rows inside a border
            Constraint::Length(6),
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(area);

    ResultLayout {
        header_area: chunks[0],
        badge_area: chunks[1],
        probability_area: chunks[2],
        details_area: chunks[3],
        feedback_area: chunks[4],
        help_area: chunks[5],
    }
}

pub fn calculate_history_chunks(area: Rect) -> HistoryLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(area);

    HistoryLayout {
        header_area: chunks[0],
        list_area: chunks[1],
        help_area: chunks[2],
    }
}

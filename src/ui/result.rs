use super::{key_hint, APP_TITLE};
use crate::controller::QuizController;
use crate::models::{Personality, PredictionResult, QuizState};
use crate::ui::layout::calculate_result_chunks;
use crate::utils::{format_answer, format_percentage};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Row, Table},
    Frame,
};

fn personality_color(personality: Personality) -> Color {
    match personality {
        Personality::Introvert => Color::Blue,
        Personality::Extrovert => Color::Yellow,
    }
}

pub fn draw_result(f: &mut Frame, controller: &QuizController) {
    let Some(result) = controller.result() else {
        return;
    };
    let layout = calculate_result_chunks(f.area());

    let header = Paragraph::new("Your Personality Type Prediction")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(APP_TITLE));
    f.render_widget(header, layout.header_area);

    let badge = Paragraph::new(Line::from(Span::styled(
        format!(" {} ", result.personality),
        Style::default()
            .fg(Color::Black)
            .bg(personality_color(result.personality))
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(badge, layout.badge_area);

    draw_probabilities(f, result, layout.probability_area);

    if result.feature_details.is_some() {
        draw_details(f, controller, result, layout.details_area);
    }

    let feedback = match controller.state() {
        QuizState::FeedbackRecorded => Line::from(Span::styled(
            "Thank you for your feedback!",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        _ if controller.feedback_requested() || controller.correlation_id().is_none() => {
            Line::from("")
        }
        _ => {
            let mut spans = vec![Span::from("Was this prediction accurate?  ")];
            spans.extend(key_hint("y", " Yes, it's correct  "));
            spans.extend(key_hint("n", " No, it's incorrect"));
            Line::from(spans)
        }
    };
    let feedback = Paragraph::new(feedback)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(feedback, layout.feedback_area);

    let mut spans = Vec::new();
    spans.extend(key_hint("r", " Take the Quiz Again  "));
    spans.extend(key_hint("h", " History  "));
    spans.extend(key_hint("Esc", " Quit"));
    let help = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.help_area);
}

fn draw_probabilities(f: &mut Frame, result: &PredictionResult, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Probability Breakdown");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1); 4])
        .split(inner);

    for (i, personality) in Personality::ALL.into_iter().enumerate() {
        let probability = result.probability_of(personality);
        let label = Paragraph::new(format!(
            "{} {}",
            personality,
            format_percentage(probability)
        ));
        f.render_widget(label, rows[i * 2]);

        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(personality_color(personality)))
            .ratio(probability.clamp(0.0, 1.0))
            .label("");
        f.render_widget(gauge, rows[i * 2 + 1]);
    }
}

fn draw_details(
    f: &mut Frame,
    controller: &QuizController,
    result: &PredictionResult,
    area: Rect,
) {
    let Some(details) = &result.feature_details else {
        return;
    };

    let rows: Vec<Row> = controller
        .questions()
        .iter()
        .filter_map(|q| {
            details
                .get(q.field)
                .map(|v| Row::new(vec![q.label.to_string(), format_answer(q, v)]))
        })
        .collect();

    let table = Table::new(rows, [Constraint::Percentage(50), Constraint::Percentage(50)])
        .block(Block::default().borders(Borders::ALL).title("Your Input Details"));
    f.render_widget(table, area);
}

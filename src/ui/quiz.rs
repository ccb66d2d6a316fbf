use super::{key_hint, APP_TITLE};
use crate::controller::QuizController;
use crate::models::QuestionKind;
use crate::ui::layout::calculate_quiz_chunks;
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

pub fn draw_quiz(f: &mut Frame, controller: &QuizController) {
    let layout = calculate_quiz_chunks(f.area());

    let header = Paragraph::new(APP_TITLE)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);

    let (number, total) = controller.progress();
    let progress = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Question {} of {}", number, total)),
        )
        .gauge_style(Style::default().fg(Color::Blue))
        .ratio(controller.progress_ratio().clamp(0.0, 1.0))
        .label("");
    f.render_widget(progress, layout.progress_area);

    let question = controller.current_question();
    let prompt = match question {
        Some(q) => Text::from(q.text),
        None => Text::from("All questions answered."),
    };
    let question_widget = Paragraph::new(prompt)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Question"));
    f.render_widget(question_widget, layout.question_area);

    let input_block = Block::default().borders(Borders::ALL).title("Your Answer");
    match question.map(|q| &q.kind) {
        _ if controller.is_busy() => {
            let loading = Paragraph::new("Getting your prediction...")
                .style(Style::default().fg(Color::Yellow))
                .block(input_block);
            f.render_widget(loading, layout.input_area);
        }
        Some(QuestionKind::Numeric { placeholder, .. }) => {
            let content = if controller.input().is_empty() {
                Line::from(Span::styled(
                    *placeholder,
                    Style::default().fg(Color::DarkGray),
                ))
            } else {
                Line::from(controller.input())
            };
            f.render_widget(Paragraph::new(content).block(input_block), layout.input_area);

            let cursor_x = layout.input_area.x + 1 + controller.input().width() as u16;
            f.set_cursor_position((cursor_x, layout.input_area.y + 1));
        }
        Some(QuestionKind::Boolean) => {
            let mut spans = Vec::new();
            spans.extend(key_hint("y", " Yes    "));
            spans.extend(key_hint("n", " No"));
            let choices = Paragraph::new(Line::from(spans))
                .alignment(Alignment::Center)
                .block(input_block);
            f.render_widget(choices, layout.input_area);
        }
        None => f.render_widget(Paragraph::new("").block(input_block), layout.input_area),
    }

    if let Some(error) = controller.error() {
        let status = Paragraph::new(error)
            .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center);
        f.render_widget(status, layout.status_area);
    }

    let mut basic_spans = Vec::new();
    match question.map(|q| q.is_boolean()) {
        Some(false) if !controller.is_busy() => {
            basic_spans.extend(key_hint("Enter", " Next  "));
            basic_spans.extend(key_hint("Backspace", " Delete  "));
        }
        Some(true) if !controller.is_busy() => {
            basic_spans.extend(key_hint("y/n", " Answer  "));
        }
        _ => {}
    }
    basic_spans.extend(key_hint("Esc", " Quit"));

    let mut ctrl_spans = Vec::new();
    ctrl_spans.extend(key_hint("Ctrl+C", " Exit App"));
    if controller.can_retry() {
        ctrl_spans.push(Span::from("  "));
        ctrl_spans.extend(key_hint("Ctrl+R", " Retry Prediction"));
    }

    let help = Paragraph::new(vec![Line::from(basic_spans), Line::from(ctrl_spans)])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.help_area);
}

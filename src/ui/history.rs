use super::key_hint;
use crate::models::{HistoryRecord, HistoryView, Personality};
use crate::ui::layout::calculate_history_chunks;
use crate::utils::{format_percentage, truncate_string};
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use serde_json::Value;

pub fn draw_history(f: &mut Frame, view: &HistoryView) {
    let layout = calculate_history_chunks(f.area());

    let title = Paragraph::new("Recent Predictions")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, layout.header_area);

    let list_block = Block::default().borders(Borders::ALL);
    let max_width = layout.list_area.width.saturating_sub(2) as usize;
    match view {
        HistoryView::Loading => {
            let loading = Paragraph::new("Loading history...")
                .style(Style::default().fg(Color::Yellow))
                .block(list_block);
            f.render_widget(loading, layout.list_area);
        }
        HistoryView::Failed(_) => {
            let failed = Paragraph::new("Could not load history. Press r to try again.")
                .style(Style::default().fg(Color::Red))
                .block(list_block);
            f.render_widget(failed, layout.list_area);
        }
        HistoryView::Loaded(records) if records.is_empty() => {
            f.render_widget(
                Paragraph::new("No predictions yet.").block(list_block),
                layout.list_area,
            );
        }
        HistoryView::Loaded(records) => {
            let items: Vec<ListItem> = records
                .iter()
                .map(|record| {
                    ListItem::new(Line::from(truncate_string(&summarize(record), max_width)))
                })
                .collect();
            f.render_widget(List::new(items).block(list_block), layout.list_area);
        }
    }

    let mut spans = Vec::new();
    spans.extend(key_hint("Esc", " Back  "));
    spans.extend(key_hint("r", " Refresh  "));
    spans.extend(key_hint("Ctrl+C", " Exit App"));
    let help = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.help_area);
}

/// One line per record, e.g. "#12  Introvert  E 20% / I 80%  feedback: correct".
fn summarize(record: &HistoryRecord) -> String {
    let mut parts = Vec::new();
    if let Some(id) = &record.prediction_id {
        parts.push(format!("#{}", id));
    }
    match &record.timestamp {
        Some(Value::String(timestamp)) => parts.push(timestamp.clone()),
        Some(Value::Null) | None => {}
        Some(other) => parts.push(other.to_string()),
    }
    parts.push(record.personality.as_deref().unwrap_or("Unknown").to_string());
    if let Some(probability) = record.probability {
        parts.push(format!(
            "E {} / I {}",
            format_percentage(probability[Personality::Extrovert.index()]),
            format_percentage(probability[Personality::Introvert.index()])
        ));
    }
    if let Some(feedback) = &record.feedback {
        parts.push(format!("feedback: {}", feedback));
    }
    parts.join("  ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PredictionId;
    use crate::ui::buffer_text;
    use ratatui::{backend::TestBackend, Terminal};

    fn render(view: &HistoryView) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|f| draw_history(f, view)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn test_summarize_record() {
        let record = HistoryRecord {
            prediction_id: Some(PredictionId::Number(12)),
            personality: Some("Introvert".to_string()),
            probability: Some([0.2, 0.8]),
            feedback: Some("correct".to_string()),
            ..HistoryRecord::default()
        };
        assert_eq!(
            summarize(&record),
            "#12  Introvert  E 20% / I 80%  feedback: correct"
        );
        assert_eq!(summarize(&HistoryRecord::default()), "Unknown");

        let stamped = HistoryRecord {
            personality: Some("introvert".to_string()),
            timestamp: Some(serde_json::json!(1718000000)),
            ..HistoryRecord::default()
        };
        assert_eq!(summarize(&stamped), "1718000000  introvert");
    }

    #[test]
    fn test_history_states() {
        assert!(render(&HistoryView::Loading).contains("Loading history..."));
        assert!(
            render(&HistoryView::Failed("boom".to_string())).contains("Could not load history")
        );
        assert!(render(&HistoryView::Loaded(vec![])).contains("No predictions yet."));

        let screen = render(&HistoryView::Loaded(vec![HistoryRecord {
            prediction_id: Some(PredictionId::Text("abc123".to_string())),
            personality: Some("Extrovert".to_string()),
            ..HistoryRecord::default()
        }]));
        assert!(screen.contains("#abc123  Extrovert"));
    }
}

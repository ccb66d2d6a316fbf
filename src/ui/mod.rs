mod history;
pub mod layout;
mod quiz;
mod result;

pub use history::draw_history;
pub use layout::{calculate_history_chunks, calculate_quiz_chunks, calculate_result_chunks};
pub use quiz::draw_quiz;
pub use result::draw_result;

use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
};

pub const APP_TITLE: &str = "Personality Type Prediction";

fn key_hint(key: &'static str, label: &'static str) -> [Span<'static>; 2] {
    [
        Span::styled(
            key,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(label),
    ]
}

#[cfg(test)]
pub(crate) fn buffer_text(buffer: &ratatui::buffer::Buffer) -> String {
    let mut text = String::new();
    for row in buffer.content.chunks(buffer.area.width as usize) {
        for cell in row {
            text.push_str(cell.symbol());
        }
        text.push('\n');
    }
    text
}

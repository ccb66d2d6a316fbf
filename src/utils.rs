use crate::models::{AnswerValue, Question};
use unicode_width::UnicodeWidthChar;

/// Probability in [0, 1] as a whole percentage, rounded half up: 0.3 -> "30%".
pub fn format_percentage(probability: f64) -> String {
    format!("{}%", (probability * 100.0).round() as i64)
}

/// Cuts `s` to at most `max_width` terminal columns, ending in "..." when shortened.
pub fn truncate_string(s: &str, max_width: usize) -> String {
    let total: usize = s.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max_width {
        return s.to_string();
    }

    let budget = max_width.saturating_sub(3);
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push_str("...");
    out
}

/// How a stored answer reads back in the input details table.
pub fn format_answer(question: &Question, value: AnswerValue) -> String {
    match value {
        AnswerValue::Boolean(true) => "Yes".to_string(),
        AnswerValue::Boolean(false) => "No".to_string(),
        AnswerValue::Integer(n) => match question.unit {
            Some(unit) => format!("{} {}", n, unit),
            None => n.to_string(),
        },
    }
}

use crate::models::{Question, QuestionKind};

/// The quiz, in presentation order. Field names are the predict endpoint's keys.
pub static PERSONALITY_QUESTIONS: [Question; 7] = [
    Question {
        id: 1,
        text: "How many hours do you typically spend alone in a day?",
        field: "time_spent_alone",
        kind: QuestionKind::Numeric {
            min: Some(0),
            max: Some(24),
            placeholder: "Hours (0-24)",
        },
        label: "Time Spent Alone",
        unit: Some("hours/day"),
    },
    Question {
        id: 2,
        text: "Do you experience stage fear?",
        field: "stage_fear",
        kind: QuestionKind::Boolean,
        label: "Stage Fear",
        unit: None,
    },
    Question {
        id: 3,
        text: "How many social events do you attend in a typical month?",
        field: "social_event_attendance",
        kind: QuestionKind::Numeric {
            min: Some(0),
            max: None,
            placeholder: "Number of events",
        },
        label: "Social Event Attendance",
        unit: Some("events/month"),
    },
    Question {
        id: 4,
        text: "How many days per week do you go outside for social activities?",
        field: "going_outside",
        kind: QuestionKind::Numeric {
            min: Some(0),
            max: Some(7),
            placeholder: "Days per week (0-7)",
        },
        label: "Going Outside",
        unit: Some("days/week"),
    },
    Question {
        id: 5,
        text: "Do you feel drained after socializing?",
        field: "drained_after_socializing",
        kind: QuestionKind::Boolean,
        label: "Drained After Socializing",
        unit: None,
    },
    Question {
        id: 6,
        text: "How many close friends do you have in your circle?",
        field: "friends_circle_size",
        kind: QuestionKind::Numeric {
            min: Some(0),
            max: None,
            placeholder: "Number of friends",
        },
        label: "Friends Circle Size",
        unit: Some("friends"),
    },
    Question {
        id: 7,
        text: "How many times do you post on social media in a typical week?",
        field: "post_frequency",
        kind: QuestionKind::Numeric {
            min: Some(0),
            max: None,
            placeholder: "Posts per week",
        },
        label: "Post Frequency",
        unit: Some("posts/week"),
    },
];

/// Looks up a question by its answer field.
pub fn find_question<'a>(questions: &'a [Question], field: &str) -> Option<&'a Question> {
    questions.iter().find(|q| q.field == field)
}

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// How a question is answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionKind {
    Numeric {
        min: Option<i64>,
        max: Option<i64>,
        placeholder: &'static str,
    },
    Boolean,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: u32,
    pub text: &'static str,
    /// Key the answer is stored and sent under.
    pub field: &'static str,
    pub kind: QuestionKind,
    /// Row label in the input details table.
    pub label: &'static str,
    pub unit: Option<&'static str>,
}

impl Question {
    pub fn is_boolean(&self) -> bool {
        matches!(self.kind, QuestionKind::Boolean)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Integer(i64),
    Boolean(bool),
}

/// Answers for one quiz attempt, keyed by question field.
///
/// Serializes as the flat JSON object the predict endpoint expects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet {
    values: BTreeMap<String, AnswerValue>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, field: &str, value: AnswerValue) {
        self.values.insert(field.to_string(), value);
    }

    pub fn get(&self, field: &str) -> Option<AnswerValue> {
        self.values.get(field).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True when every question has exactly one stored answer and nothing else is present.
    pub fn is_complete(&self, questions: &[Question]) -> bool {
        self.values.len() == questions.len()
            && questions.iter().all(|q| self.values.contains_key(q.field))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, AnswerValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, AnswerValue)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (K, AnswerValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Personality {
    #[serde(alias = "extrovert", alias = "EXTROVERT")]
    Extrovert,
    #[serde(alias = "introvert", alias = "INTROVERT")]
    Introvert,
}

impl Personality {
    /// Probability pair order used by the service.
    pub const ALL: [Personality; 2] = [Personality::Extrovert, Personality::Introvert];

    pub fn index(self) -> usize {
        match self {
            Personality::Extrovert => 0,
            Personality::Introvert => 1,
        }
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Personality::Extrovert => write!(f, "Extrovert"),
            Personality::Introvert => write!(f, "Introvert"),
        }
    }
}

/// Correlation identifier returned by predict; echoed back with its original JSON type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictionId {
    Number(i64),
    Text(String),
}

impl fmt::Display for PredictionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictionId::Number(n) => write!(f, "{}", n),
            PredictionId::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(rename = "class")]
    pub personality: Personality,
    pub probability: [f64; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction_id: Option<PredictionId>,
    /// Display-only echo of the submitted answers.
    #[serde(
        default,
        deserialize_with = "lenient_answers",
        skip_serializing_if = "Option::is_none"
    )]
    pub feature_details: Option<AnswerSet>,
}

impl PredictionResult {
    pub fn probability_of(&self, personality: Personality) -> f64 {
        self.probability[personality.index()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Correct,
    Incorrect,
}

impl From<bool> for Verdict {
    fn from(is_correct: bool) -> Self {
        if is_correct {
            Verdict::Correct
        } else {
            Verdict::Incorrect
        }
    }
}

/// A past prediction as listed by the history endpoint.
///
/// Every field is optional. A known field whose value has an unexpected shape is
/// moved into `extra` untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawHistoryRecord")]
pub struct HistoryRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction_id: Option<PredictionId>,
    #[serde(rename = "class", skip_serializing_if = "Option::is_none")]
    pub personality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_details: Option<AnswerSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize)]
struct RawHistoryRecord {
    #[serde(default)]
    prediction_id: Option<Value>,
    #[serde(default)]
    class: Option<Value>,
    #[serde(default)]
    probability: Option<Value>,
    #[serde(default)]
    feature_details: Option<Value>,
    #[serde(default)]
    feedback: Option<Value>,
    #[serde(default)]
    timestamp: Option<Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<RawHistoryRecord> for HistoryRecord {
    fn from(raw: RawHistoryRecord) -> Self {
        let mut extra = raw.extra;
        let feature_details = match raw.feature_details {
            Some(value) => match answers_from_json(&value) {
                Some(answers) => Some(answers),
                None => {
                    extra.insert("feature_details".to_string(), value);
                    None
                }
            },
            None => None,
        };

        Self {
            prediction_id: typed_or_extra(&mut extra, "prediction_id", raw.prediction_id),
            personality: typed_or_extra(&mut extra, "class", raw.class),
            probability: typed_or_extra(&mut extra, "probability", raw.probability),
            feature_details,
            feedback: typed_or_extra(&mut extra, "feedback", raw.feedback),
            timestamp: raw.timestamp,
            extra,
        }
    }
}

fn typed_or_extra<T: DeserializeOwned>(
    extra: &mut Map<String, Value>,
    key: &str,
    value: Option<Value>,
) -> Option<T> {
    let value = value?;
    match T::deserialize(&value) {
        Ok(typed) => Some(typed),
        Err(_) => {
            extra.insert(key.to_string(), value);
            None
        }
    }
}

fn lenient_answers<'de, D>(deserializer: D) -> Result<Option<AnswerSet>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(answers_from_json))
}

/// Keeps the entries that read as an integer or a boolean and drops the rest.
fn answers_from_json(value: &Value) -> Option<AnswerSet> {
    let map = value.as_object()?;
    Some(
        map.iter()
            .filter_map(|(field, v)| answer_from_json(v).map(|answer| (field.as_str(), answer)))
            .collect(),
    )
}

fn answer_from_json(value: &Value) -> Option<AnswerValue> {
    match value {
        Value::Bool(b) => Some(AnswerValue::Boolean(*b)),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && f.fract() == 0.0)
                    .map(|f| f as i64)
            })
            .map(AnswerValue::Integer),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .map(AnswerValue::Integer)
                .or_else(|_| s.parse::<bool>().map(AnswerValue::Boolean))
                .ok()
        }
        _ => None,
    }
}

/// Work handed to the API worker. `attempt` ties a completion back to the quiz attempt that asked.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiRequest {
    Predict {
        attempt: u64,
        answers: AnswerSet,
    },
    Feedback {
        attempt: u64,
        prediction_id: PredictionId,
        verdict: Verdict,
    },
    History {
        limit: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    Prediction {
        attempt: u64,
        result: PredictionResult,
    },
    PredictionFailed {
        attempt: u64,
        error: String,
    },
    FeedbackRecorded {
        attempt: u64,
    },
    FeedbackFailed {
        attempt: u64,
        error: String,
    },
    History {
        records: Vec<HistoryRecord>,
    },
    HistoryFailed {
        error: String,
    },
}

/// Wizard state. A displayed error is carried separately and only ever sits on `Asking`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizState {
    Asking { index: usize },
    Predicting,
    ShowingResult,
    FeedbackRecorded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Quiz,
    History,
}

/// What the history screen currently has to show.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryView {
    Loading,
    Loaded(Vec<HistoryRecord>),
    Failed(String),
}

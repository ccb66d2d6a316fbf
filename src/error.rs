use thiserror::Error;

/// Local input rejection raised before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{}", valid_value_message(.min))]
    Empty { min: Option<i64> },

    #[error("{}", valid_value_message(.min))]
    NotAnInteger { input: String, min: Option<i64> },

    #[error("Please enter a valid value (minimum {min})")]
    BelowMinimum { value: i64, min: i64 },

    #[error("Value must be at most {max}")]
    AboveMaximum { value: i64, max: i64 },

    #[error("Question '{field}' does not take this kind of answer")]
    WrongQuestionKind { field: &'static str },
}

fn valid_value_message(min: &Option<i64>) -> String {
    match min {
        Some(min) => format!("Please enter a valid value (minimum {})", min),
        None => "Please enter a valid value".to_string(),
    }
}

/// Any failed exchange with the prediction service.
///
/// The detail is kept for the debug log only; the user is shown a generic
/// retry prompt regardless of the variant.
#[derive(Debug, Error)]
pub enum RequestFailure {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("service responded with status {0}")]
    Status(reqwest::StatusCode),

    #[error("could not decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("probability {0} is outside [0, 1]")]
    InvalidProbability(f64),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid API URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported URL scheme '{0}' (expected http or https)")]
    UnsupportedScheme(String),
}

use crate::config::Config;
use crate::error::RequestFailure;
use crate::models::{AnswerSet, HistoryRecord, PredictionId, PredictionResult, Verdict};
use async_trait::async_trait;
use log::{debug, error};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const DEFAULT_HISTORY_LIMIT: usize = 5;

/// The three calls the remote prediction service offers.
///
/// Each is a single request/response exchange: no retries, no caching.
#[async_trait]
pub trait PredictionApi: Send + Sync {
    async fn predict(&self, answers: &AnswerSet) -> Result<PredictionResult, RequestFailure>;

    async fn submit_feedback(
        &self,
        prediction_id: &PredictionId,
        verdict: Verdict,
    ) -> Result<serde_json::Value, RequestFailure>;

    async fn get_history(&self, limit: usize) -> Result<Vec<HistoryRecord>, RequestFailure>;
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct FeedbackBody<'a> {
    prediction_id: &'a PredictionId,
    feedback: Verdict,
}

impl ApiClient {
    pub fn new(config: &Config) -> Self {
        Self::with_http_client(reqwest::Client::new(), config)
    }

    pub fn with_http_client(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            base_url: config.api_url().to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl PredictionApi for ApiClient {
    async fn predict(&self, answers: &AnswerSet) -> Result<PredictionResult, RequestFailure> {
        let outcome: Result<PredictionResult, RequestFailure> = async {
            let response = self
                .http
                .post(self.endpoint("predict"))
                .json(answers)
                .send()
                .await?;
            let result: PredictionResult = read_json(response).await?;
            check_probabilities(&result.probability)?;
            Ok(result)
        }
        .await;

        if let Err(e) = &outcome {
            error!("Error predicting personality: {}", e);
        }
        outcome
    }

    async fn submit_feedback(
        &self,
        prediction_id: &PredictionId,
        verdict: Verdict,
    ) -> Result<serde_json::Value, RequestFailure> {
        let body = FeedbackBody {
            prediction_id,
            feedback: verdict,
        };
        let outcome: Result<serde_json::Value, RequestFailure> = async {
            let response = self
                .http
                .post(self.endpoint("feedback"))
                .json(&body)
                .send()
                .await?;
            read_json(response).await
        }
        .await;

        if let Err(e) = &outcome {
            error!("Error submitting feedback: {}", e);
        }
        outcome
    }

    async fn get_history(&self, limit: usize) -> Result<Vec<HistoryRecord>, RequestFailure> {
        let outcome: Result<Vec<HistoryRecord>, RequestFailure> = async {
            let response = self
                .http
                .get(self.endpoint("history"))
                .query(&[("limit", limit)])
                .send()
                .await?;
            read_json(response).await
        }
        .await;

        if let Err(e) = &outcome {
            error!("Error fetching history: {}", e);
        }
        outcome
    }
}

/// Any non-2xx status is a failure; 4xx and 5xx are not told apart.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, RequestFailure> {
    let status = response.status();
    debug!("{} responded with {}", response.url(), status);
    if !status.is_success() {
        return Err(RequestFailure::Status(status));
    }
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

fn check_probabilities(probability: &[f64; 2]) -> Result<(), RequestFailure> {
    match probability.iter().find(|p| !(0.0..=1.0).contains(*p)) {
        Some(p) => Err(RequestFailure::InvalidProbability(*p)),
        None => Ok(()),
    }
}

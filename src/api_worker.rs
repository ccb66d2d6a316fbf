use crate::api::PredictionApi;
use crate::models::{ApiRequest, ApiResponse};
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

/// Runs API calls off the UI loop, one at a time, until the request channel closes.
pub fn spawn_api_worker(
    api: Arc<dyn PredictionApi>,
    mut requests: UnboundedReceiver<ApiRequest>,
    responses: UnboundedSender<ApiResponse>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(request) = requests.recv().await {
            let response = handle_request(api.as_ref(), request).await;
            if responses.send(response).is_err() {
                debug!("Response channel closed, dropping API worker");
                break;
            }
        }
        info!("API worker channel disconnected, exiting");
    })
}

pub async fn handle_request(api: &dyn PredictionApi, request: ApiRequest) -> ApiResponse {
    match request {
        ApiRequest::Predict { attempt, answers } => {
            info!("Worker sending predict request for attempt {}", attempt);
            match api.predict(&answers).await {
                Ok(result) => ApiResponse::Prediction { attempt, result },
                Err(e) => ApiResponse::PredictionFailed {
                    attempt,
                    error: e.to_string(),
                },
            }
        }
        ApiRequest::Feedback {
            attempt,
            prediction_id,
            verdict,
        } => {
            info!("Worker sending {:?} feedback for {}", verdict, prediction_id);
            match api.submit_feedback(&prediction_id, verdict).await {
                Ok(_) => ApiResponse::FeedbackRecorded { attempt },
                Err(e) => {
                    warn!("Feedback for {} not recorded: {}", prediction_id, e);
                    ApiResponse::FeedbackFailed {
                        attempt,
                        error: e.to_string(),
                    }
                }
            }
        }
        ApiRequest::History { limit } => match api.get_history(limit).await {
            Ok(records) => ApiResponse::History { records },
            Err(e) => ApiResponse::HistoryFailed {
                error: e.to_string(),
            },
        },
    }
}

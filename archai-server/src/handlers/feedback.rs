//! Feedback handlers
//!
//! POST /feedback/correct and POST /feedback/incorrect append one verdict to
//! the feedback log. Entries are not linked to a particular prediction.

use axum::{extract::State, http::StatusCode, Json};
use archai_core::{persistence_message, Verdict};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Response for a feedback submission
#[derive(Debug, Serialize, ToSchema)]
pub struct FeedbackResponse {
    /// Whether the verdict reached the log
    pub recorded: bool,
    /// Text to show the user
    #[schema(example = "Gracias por tu retroalimentación. Hemos registrado que la predicción fue correcta.")]
    pub message: String,
    /// Timestamp written to the log, when recorded
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "2024-05-01 18:42:07")]
    pub timestamp: Option<String>,
}

/// Mark the last prediction as correct
#[utoipa::path(
    post,
    path = "/feedback/correct",
    tag = "Feedback",
    responses(
        (status = 200, description = "Verdict recorded", body = FeedbackResponse),
        (status = 500, description = "Feedback log could not be written", body = FeedbackResponse)
    )
)]
pub async fn feedback_correct_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<FeedbackResponse>) {
    record(state, Verdict::Correct).await
}

/// Mark the last prediction as incorrect
#[utoipa::path(
    post,
    path = "/feedback/incorrect",
    tag = "Feedback",
    responses(
        (status = 200, description = "Verdict recorded", body = FeedbackResponse),
        (status = 500, description = "Feedback log could not be written", body = FeedbackResponse)
    )
)]
pub async fn feedback_incorrect_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<FeedbackResponse>) {
    record(state, Verdict::Incorrect).await
}

async fn record(state: AppState, verdict: Verdict) -> (StatusCode, Json<FeedbackResponse>) {
    let recorder = state.feedback.clone();
    let outcome = tokio::task::spawn_blocking(move || recorder.record(verdict)).await;

    match outcome {
        Ok(Ok(entry)) => (
            StatusCode::OK,
            Json(FeedbackResponse {
                recorded: true,
                message: verdict.confirmation().to_string(),
                timestamp: Some(entry.timestamp),
            }),
        ),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, verdict = ?verdict, "Failed to record feedback");
            failure(persistence_message(&e))
        }
        Err(e) => {
            tracing::error!(error = %e, "Feedback task failed");
            failure(format!("Error al registrar la retroalimentación: {}", e))
        }
    }
}

fn failure(message: String) -> (StatusCode, Json<FeedbackResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(FeedbackResponse {
            recorded: false,
            message,
            timestamp: None,
        }),
    )
}

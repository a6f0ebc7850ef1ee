use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::MaintenanceOperator;
use crate::core::state::AppState;
use crate::core::time::unix_now;
use crate::repositories;
use crate::schemas::maintenance::{AttemptTimingResponse, SweepRequest, SweepResponse};
use crate::services::attempt_timing::{attempt_end_time, decide};
use crate::services::effective_quiz::EffectiveQuiz;
use crate::tasks::overdue;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/overdue-attempts/sweep", post(sweep_overdue))
        .route("/attempts/:attempt_id/timing", get(attempt_timing))
}

/// Runs one sweep on demand, with the same window the scheduler would use unless
/// the caller pins `now` or `processto`. Refused with 409 while another sweep runs.
async fn sweep_overdue(
    _operator: MaintenanceOperator,
    State(state): State<AppState>,
    Json(payload): Json<SweepRequest>,
) -> Result<Json<SweepResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let now = payload.now.unwrap_or_else(unix_now);
    let processto = payload.processto.unwrap_or_else(|| state.settings().sweep().processto(now));
    if processto > now {
        return Err(ApiError::BadRequest("processto must not be after now".to_string()));
    }

    tracing::info!(now, processto, "Manual overdue sweep requested");

    let outcome = overdue::try_sweep_overdue_attempts(&state, now, processto)
        .await
        .map_err(|e| ApiError::internal(format!("{e:#}"), "Overdue sweep failed"))?
        .ok_or_else(|| ApiError::Conflict("An overdue sweep is already running".to_string()))?;

    Ok(Json(SweepResponse::new(outcome, now, processto)))
}

/// Effective deadline of one attempt and the transition a sweep would apply now.
async fn attempt_timing(
    _operator: MaintenanceOperator,
    State(state): State<AppState>,
    Path(attempt_id): Path<i64>,
) -> Result<Json<AttemptTimingResponse>, ApiError> {
    let row = repositories::attempts::find_with_usertimes(state.db(), attempt_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch attempt"))?
        .ok_or_else(|| ApiError::NotFound(format!("Attempt {attempt_id} not found")))?;

    let quiz = repositories::quizzes::find_by_id(state.db(), row.attempt.quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch quiz"))?
        .ok_or_else(|| ApiError::NotFound(format!("Quiz {} not found", row.attempt.quiz_id)))?;

    let now = unix_now();
    let effective = EffectiveQuiz::for_attempt(&quiz, &row);
    let end_time = attempt_end_time(&effective, &row.attempt);
    let decision = decide(&effective, &row.attempt, now, row.attempt.preview);
    let processto = state.settings().sweep().processto(now);

    Ok(Json(AttemptTimingResponse::new(row, end_time, decision, processto)))
}

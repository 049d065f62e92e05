//! Frame API endpoints.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use planframe_core::{construct_frame, Evaluation, FrameError, ProblemFrame, ValidationReport};
use planframe_optimizer::{OptimizationOutcome, OptimizeRequest};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use super::error_response;
use crate::state::AppState;

/// Response after creating a frame.
#[derive(Debug, Serialize)]
pub struct CreateFrameResponse {
    pub id: String,
    pub frame: ProblemFrame,
}

/// Construct a frame from a raw payload and store it.
pub async fn create_frame(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<CreateFrameResponse>, (StatusCode, String)> {
    let frame = construct_frame(payload).map_err(error_response)?;
    let id = state
        .manager
        .save(frame.clone(), None)
        .await
        .map_err(error_response)?;

    Ok(Json(CreateFrameResponse { id, frame }))
}

/// Get a stored frame.
pub async fn get_frame(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProblemFrame>, (StatusCode, String)> {
    state
        .manager
        .get(&id)
        .await
        .map_err(error_response)?
        .map(Json)
        .ok_or_else(|| error_response(FrameError::frame_not_found(&id)))
}

/// Replace the working state of a frame.
pub async fn update_state(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Json<ProblemFrame>, (StatusCode, String)> {
    if state.manager.get(&id).await.map_err(error_response)?.is_none() {
        return Err(error_response(FrameError::frame_not_found(&id)));
    }

    let new_state = planframe_core::State::from_value(payload).map_err(error_response)?;
    let frame = state
        .manager
        .update_state(&id, new_state)
        .await
        .map_err(error_response)?;

    Ok(Json(frame))
}

/// Run reference validation on a stored frame.
pub async fn validate_frame(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ValidationReport>, (StatusCode, String)> {
    let report = state.manager.validate(&id).await.map_err(error_response)?;
    info!("Validated frame {}: {} errors", id, report.errors.len());
    Ok(Json(report))
}

/// Validate a stored frame and compute its KPIs.
pub async fn evaluate_frame(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Evaluation>, (StatusCode, String)> {
    let evaluation = state.manager.evaluate(&id).await.map_err(error_response)?;
    Ok(Json(evaluation))
}

/// Hand a stored frame to the configured optimizer.
///
/// The body is optional; an empty body means default options.
pub async fn optimize_frame(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<OptimizationOutcome>, (StatusCode, String)> {
    let frame = state
        .manager
        .get(&id)
        .await
        .map_err(error_response)?
        .ok_or_else(|| error_response(FrameError::frame_not_found(&id)))?;

    let payload = if body.is_empty() {
        None
    } else {
        let raw: Value = serde_json::from_slice(&body)
            .map_err(|e| error_response(FrameError::schema(e.to_string())))?;
        Some(raw)
    };
    let request = OptimizeRequest::from_payload(payload).map_err(error_response)?;

    info!("Optimizing frame {} with {}", id, state.optimizer.name());
    let outcome = state
        .optimizer
        .optimize(&frame, &request)
        .await
        .map_err(error_response)?;

    Ok(Json(outcome))
}

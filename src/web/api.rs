use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use compass_core::geodesy::CoordinateFormat;
use compass_core::{CalibrationSettings, PositionFault};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{error, info, warn};

use crate::display_controller::{Command, Input};
use crate::display_state::{DisplaySnapshot, HeadingView, PositionView};

#[derive(Clone)]
pub struct AppState {
    pub snapshot: watch::Receiver<DisplaySnapshot>,
    pub commands: mpsc::Sender<Input>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: String,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: "ok".to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            status: "error".to_string(),
            data: None,
            error: Some(message),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PositionReport {
    pub position: Option<PositionView>,
    pub fault: Option<PositionFault>,
    pub format: CoordinateFormat,
    pub label: String,
    pub coordinates: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FormatChange {
    pub format: CoordinateFormat,
    pub label: String,
}

#[derive(Debug, Deserialize)]
pub struct OffsetStep {
    pub step: f64,
}

fn current(state: &AppState) -> DisplaySnapshot {
    state.snapshot.borrow().clone()
}

/// Queue a command and wait for the snapshot the pipeline produced after it.
async fn send_command(state: &AppState, command: Command) -> Result<DisplaySnapshot, StatusCode> {
    let (reply, applied) = oneshot::channel();
    let input = Input::Command {
        command,
        reply: Some(reply),
    };
    if state.commands.send(input).await.is_err() {
        error!("Display pipeline is not running");
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }
    applied.await.map_err(|_| {
        error!("Display pipeline dropped the command");
        StatusCode::SERVICE_UNAVAILABLE
    })
}

pub async fn get_state(State(state): State<AppState>) -> Result<Json<ApiResponse<DisplaySnapshot>>, StatusCode> {
    Ok(Json(ApiResponse::ok(current(&state))))
}

pub async fn get_heading(State(state): State<AppState>) -> Result<Json<ApiResponse<HeadingView>>, StatusCode> {
    let snapshot = current(&state);
    match snapshot.heading {
        Some(heading) => Ok(Json(ApiResponse::ok(heading))),
        None => {
            let message = match snapshot.sensor_fault {
                Some(fault) => fault.to_string(),
                None => "no heading yet".to_string(),
            };
            Ok(Json(ApiResponse::error(message)))
        }
    }
}

pub async fn get_position(State(state): State<AppState>) -> Result<Json<ApiResponse<PositionReport>>, StatusCode> {
    let snapshot = current(&state);
    Ok(Json(ApiResponse::ok(PositionReport {
        position: snapshot.position,
        fault: snapshot.position_fault,
        format: snapshot.coordinate_format,
        label: snapshot.coordinate_label,
        coordinates: snapshot.coordinates,
    })))
}

pub async fn get_calibration(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<CalibrationSettings>>, StatusCode> {
    Ok(Json(ApiResponse::ok(current(&state).calibration)))
}

pub async fn update_calibration(
    State(state): State<AppState>,
    Json(settings): Json<CalibrationSettings>,
) -> Result<Json<ApiResponse<CalibrationSettings>>, StatusCode> {
    info!(%settings, "POST /api/calibration called");
    if !settings.is_valid() {
        warn!(%settings, "Rejecting out-of-range calibration");
        return Err(StatusCode::BAD_REQUEST);
    }
    let snapshot = send_command(&state, Command::SaveCalibration(settings)).await?;
    Ok(Json(ApiResponse::ok(snapshot.calibration)))
}

pub async fn adjust_calibration(
    State(state): State<AppState>,
    Json(request): Json<OffsetStep>,
) -> Result<Json<ApiResponse<CalibrationSettings>>, StatusCode> {
    info!(step = request.step, "POST /api/calibration/adjust called");
    if !request.step.is_finite() {
        warn!(step = request.step, "Rejecting offset step");
        return Err(StatusCode::BAD_REQUEST);
    }
    let snapshot = send_command(&state, Command::AdjustOffset(request.step)).await?;
    Ok(Json(ApiResponse::ok(snapshot.calibration)))
}

pub async fn reset_calibration(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<CalibrationSettings>>, StatusCode> {
    info!("POST /api/calibration/reset called");
    let snapshot = send_command(&state, Command::ResetOffset).await?;
    Ok(Json(ApiResponse::ok(snapshot.calibration)))
}

pub async fn next_format(State(state): State<AppState>) -> Result<Json<ApiResponse<FormatChange>>, StatusCode> {
    info!("POST /api/format/next called");
    let snapshot = send_command(&state, Command::CycleFormat).await?;
    Ok(Json(ApiResponse::ok(FormatChange {
        format: snapshot.coordinate_format,
        label: snapshot.coordinate_label,
    })))
}

pub fn create_api_router(state: AppState) -> Router {
    Router::new()
        .route("/state", get(get_state))
        .route("/heading", get(get_heading))
        .route("/position", get(get_position))
        .route("/calibration", get(get_calibration).post(update_calibration))
        .route("/calibration/adjust", post(adjust_calibration))
        .route("/calibration/reset", post(reset_calibration))
        .route("/format/next", post(next_format))
        .with_state(state)
}

//! Frame authoring handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

use crate::app_state::AppState;
use crate::models::{
    ApiResponse, CreateFrameRequest, DeleteFrameRequest, EditFrameRequest, Frame,
};

type HandlerResult<T> = Result<Json<ApiResponse<T>>, (StatusCode, Json<ApiResponse<T>>)>;

fn ok<T>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: true,
        data: Some(data),
        error: None,
    })
}

fn fail<T>(status: StatusCode, error: String) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        status,
        Json(ApiResponse {
            success: false,
            data: None,
            error: Some(error),
        }),
    )
}

/// List all frames
pub async fn list_frames(State(app_state): State<AppState>) -> HandlerResult<Vec<Frame>> {
    match app_state.store.list_frames().await {
        Ok(frames) => Ok(ok(frames)),
        Err(e) => Err(fail(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to list frames: {}", e),
        )),
    }
}

/// Create a new frame
pub async fn create_frame(
    State(app_state): State<AppState>,
    Json(request): Json<CreateFrameRequest>,
) -> HandlerResult<Frame> {
    if let Err(e) = request.validate() {
        return Err(fail(
            StatusCode::BAD_REQUEST,
            format!("Validation error: {}", e),
        ));
    }

    match app_state.store.create_frame(request).await {
        Ok(frame) => Ok(ok(frame)),
        Err(e) => Err(fail(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to create frame: {}", e),
        )),
    }
}

/// Update a frame's title and image
pub async fn update_frame(
    State(app_state): State<AppState>,
    Json(request): Json<EditFrameRequest>,
) -> HandlerResult<Frame> {
    if let Err(e) = request.validate() {
        return Err(fail(
            StatusCode::BAD_REQUEST,
            format!("Validation error: {}", e),
        ));
    }

    match app_state.store.update_frame(request).await {
        Ok(Some(frame)) => Ok(ok(frame)),
        Ok(None) => Err(fail(
            StatusCode::NOT_FOUND,
            "Frame not found".to_string(),
        )),
        Err(e) => Err(fail(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to update frame: {}", e),
        )),
    }
}

/// Delete a frame
pub async fn delete_frame(
    State(app_state): State<AppState>,
    Json(request): Json<DeleteFrameRequest>,
) -> HandlerResult<()> {
    match app_state.store.delete_frame(request.id).await {
        Ok(true) => Ok(ok(())),
        Ok(false) => Err(fail(
            StatusCode::NOT_FOUND,
            "Frame not found".to_string(),
        )),
        Err(e) => Err(fail(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to delete frame: {}", e),
        )),
    }
}

//! Composer action endpoints
//!
//! Frame clients discover the composer through the metadata document and
//! post signed composer actions that resolve to the frame-authoring form.

use axum::extract::State;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::info;

use crate::app_state::AppState;
use crate::frame_html::default_error_frame;
use crate::services::neynar::FrameActionPayload;

/// Static composer descriptor
pub async fn composer_metadata(State(state): State<AppState>) -> Json<serde_json::Value> {
    let base_url = &state.config.base_url;
    Json(json!({
        "type": "composer",
        "name": "Slice Referrals",
        "icon": "meter",
        "description": "Earn with referrals",
        "aboutUrl": base_url,
        "imageUrl": format!("{base_url}/favicon-100x100.png"),
        "action": {
            "type": "post",
        },
    }))
}

/// Signed composer action: resolve the caller and point at the form
pub async fn composer_action(
    State(state): State<AppState>,
    Json(payload): Json<FrameActionPayload>,
) -> Response {
    let message = match state.verifier.validate(&payload).await {
        Ok(message) if message.is_valid => message,
        Ok(_) | Err(_) => {
            info!("composer message not valid");
            return Html(default_error_frame(&state.config.base_url)).into_response();
        }
    };

    let account_address = message.account_address();

    Json(json!({
        "type": "form",
        "title": "Create Store Frame",
        "url": format!(
            "{}/frame/composer?creator={account_address}",
            state.config.base_url
        ),
    }))
    .into_response()
}

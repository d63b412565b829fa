//! API handlers for the Target Onchain backend

pub mod composer;
pub mod frame_action;
pub mod frames;
pub mod stores;

pub use composer::{composer_action, composer_metadata};
pub use frame_action::{frame_action, frame_explain};
pub use frames::{create_frame, delete_frame, list_frames, update_frame};
pub use stores::list_stores;

pub async fn root() -> &'static str {
    "Target Onchain API Server"
}

pub async fn health_check() -> &'static str {
    "OK"
}

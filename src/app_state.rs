//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;

use crate::config::AppConfig;
use crate::services::catalog::FrameStore;
use crate::services::neynar::FrameMessageVerifier;
use crate::services::recommendation::RecommendationPolicy;
use crate::services::verification::VerificationEngine;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FrameStore>,
    pub verifier: Arc<dyn FrameMessageVerifier>,
    pub verification: Arc<VerificationEngine>,
    pub policy: Arc<RecommendationPolicy>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn FrameStore>,
        verifier: Arc<dyn FrameMessageVerifier>,
        verification: Arc<VerificationEngine>,
        policy: Arc<RecommendationPolicy>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            store,
            verifier,
            verification,
            policy,
            config,
        }
    }
}

impl FromRef<AppState> for Arc<dyn FrameStore> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.store.clone()
    }
}

impl FromRef<AppState> for Arc<dyn FrameMessageVerifier> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.verifier.clone()
    }
}

impl FromRef<AppState> for Arc<VerificationEngine> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.verification.clone()
    }
}

impl FromRef<AppState> for Arc<RecommendationPolicy> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.policy.clone()
    }
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}

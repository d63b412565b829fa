//! Data models for the Target Onchain backend

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use validator::Validate;

/// Frame model - one interactive storefront card configuration
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Frame {
    pub id: i64,
    pub shop: String,
    pub title: String,
    pub image: String,
    pub button: String,
    pub matching_criteria: MatchingCriteria,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Matching criteria - selects which verification strategy and
/// recommendation heuristic apply to a frame.
///
/// `PoapsOwned` and `All` are declared but have no registered strategy;
/// frames configured with them always take the unverified path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "matching_criteria", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchingCriteria {
    ReceiptsXyzAllTimeRunning,
    CoinbaseOnchainVerificationsCountry,
    CoinbaseOnchainVerificationsAccount,
    CoinbaseOnchainVerificationsOne,
    PoapsOwned,
    All,
}

/// Product model - a storefront catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub shop: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub handle: String,
    pub variant_id: Option<String>,
    pub variant_formatted_price: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create frame request payload
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFrameRequest {
    #[validate(length(min = 1))]
    pub title: String,
    pub shop: String,
    #[validate(length(min = 1))]
    pub image: String,
    pub button: String,
    pub matching_criteria: MatchingCriteria,
}

/// Edit frame request payload
#[derive(Debug, Deserialize, Validate)]
pub struct EditFrameRequest {
    pub id: i64,
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub image: String,
}

/// Delete frame request payload
#[derive(Debug, Deserialize)]
pub struct DeleteFrameRequest {
    pub id: i64,
}

/// API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

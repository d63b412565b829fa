//! Storefront directory proxy
//!
//! Serves the local storefront directory file, optionally filtered by
//! creator address or a name search.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListStoresQuery {
    pub creator: Option<String>,
    pub search: Option<String>,
}

/// One storefront directory entry. Extra fields pass through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    pub name: String,
    #[serde(rename = "creatorAddress", skip_serializing_if = "Option::is_none")]
    pub creator_address: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// List storefronts, filtered by creator address and name search
pub async fn list_stores(
    State(state): State<AppState>,
    Query(query): Query<ListStoresQuery>,
) -> Result<Json<Vec<Store>>, StatusCode> {
    let raw = tokio::fs::read_to_string(&state.config.stores_data_path)
        .await
        .map_err(|err| {
            error!(path = %state.config.stores_data_path, error = %err, "failed to read stores file");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let stores: Vec<Store> = serde_json::from_str(&raw).map_err(|err| {
        error!(path = %state.config.stores_data_path, error = %err, "stores file is not valid json");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(filter_stores(stores, &query)))
}

fn filter_stores(stores: Vec<Store>, query: &ListStoresQuery) -> Vec<Store> {
    let creator = query.creator.as_deref().map(str::to_lowercase);
    let search = query.search.as_deref().map(str::to_lowercase);

    stores
        .into_iter()
        .filter(|store| match &creator {
            Some(creator) => store
                .creator_address
                .as_deref()
                .map(|address| address.to_lowercase() == *creator)
                .unwrap_or(false),
            None => true,
        })
        .filter(|store| match &search {
            Some(search) => store.name.to_lowercase().contains(search),
            None => true,
        })
        .collect()
}

//! Runtime configuration loaded from the environment

use std::env;

/// Application configuration.
///
/// Everything the verification engine and the external collaborators need is
/// resolved here once at startup; no other module reads the environment.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Public base URL of this deployment, used for og images and post-back
    /// targets.
    pub base_url: String,
    /// GraphQL endpoint of the attestation index.
    pub eas_scan_url: String,
    /// API key for the frame message validation service.
    pub neynar_api_key: String,
    /// Schema UID for Receipts.xyz running-activity attestations.
    pub receipts_running_schema: String,
    /// Attester address for Receipts.xyz attestations.
    pub receipts_attester: String,
    /// Schema UID for Coinbase country-of-residence attestations.
    pub coinbase_country_schema: String,
    /// Schema UID for Coinbase verified-account attestations.
    pub coinbase_account_schema: String,
    /// Schema UID for Coinbase One membership attestations.
    pub coinbase_one_schema: String,
    /// Attester address for all Coinbase onchain verifications.
    pub coinbase_attester: String,
    /// Path to the storefront directory file served by the stores proxy.
    pub stores_data_path: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3001".to_string()),
            eas_scan_url: env::var("BASE_EAS_SCAN_URL")
                .unwrap_or_else(|_| "https://base.easscan.org/graphql".to_string()),
            neynar_api_key: env::var("NEYNAR_API_KEY").unwrap_or_default(),
            receipts_running_schema: env::var("RECEIPTS_XYZ_ALL_TIME_RUNNING_SCHEMA")
                .unwrap_or_default(),
            receipts_attester: env::var("RECEIPTS_XYZ_ATTESTER").unwrap_or_default(),
            coinbase_country_schema: env::var(
                "COINBASE_ONCHAIN_VERIFICATION_COUNTRY_RESIDENCE_SCHEMA",
            )
            .unwrap_or_default(),
            coinbase_account_schema: env::var("COINBASE_ONCHAIN_VERIFICATION_ACCOUNT_SCHEMA")
                .unwrap_or_default(),
            coinbase_one_schema: env::var("COINBASE_ONCHAIN_VERIFICATION_ONE_SCHEMA")
                .unwrap_or_default(),
            coinbase_attester: env::var("COINBASE_ONCHAIN_VERIFICATION_ATTESTER")
                .unwrap_or_default(),
            stores_data_path: env::var("STORES_DATA_FILE")
                .unwrap_or_else(|_| "data/stores.json".to_string()),
        }
    }
}

//! Frame message validation via the Neynar API
//!
//! Inbound frame interactions carry a signed message. This module delegates
//! the cryptographic check to the external validation API and normalizes the
//! answer down to what the pipeline needs: validity, the optional text
//! input, and the interactor's verified accounts.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

const NEYNAR_VALIDATE_URL: &str = "https://api.neynar.com/v2/farcaster/frame/validate";

/// Raw frame action payload as posted by frame clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameActionPayload {
    #[serde(rename = "untrustedData", default)]
    pub untrusted_data: Option<serde_json::Value>,
    #[serde(rename = "trustedData")]
    pub trusted_data: TrustedData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustedData {
    #[serde(rename = "messageBytes")]
    pub message_bytes: String,
}

/// Outcome of validating one signed frame interaction.
#[derive(Debug, Clone, Default)]
pub struct ValidatedFrameMessage {
    pub is_valid: bool,
    /// Text typed into the frame's input box, when present.
    pub input: Option<String>,
    /// Wallet addresses verified for the interactor.
    pub verified_accounts: Vec<String>,
}

impl ValidatedFrameMessage {
    /// Resolve the viewer address: an explicit test-mode input wins over the
    /// verified wallet; empty when neither is present.
    pub fn account_address(&self) -> String {
        self.input
            .clone()
            .or_else(|| self.verified_accounts.first().cloned())
            .unwrap_or_default()
    }
}

/// External check of a signed frame interaction.
#[async_trait]
pub trait FrameMessageVerifier: Send + Sync {
    async fn validate(&self, payload: &FrameActionPayload) -> Result<ValidatedFrameMessage>;
}

#[derive(Debug, Deserialize)]
struct ValidateResponse {
    valid: bool,
    action: Option<ValidatedAction>,
}

#[derive(Debug, Deserialize)]
struct ValidatedAction {
    input: Option<ActionInput>,
    interactor: Option<Interactor>,
}

#[derive(Debug, Deserialize)]
struct ActionInput {
    text: String,
}

#[derive(Debug, Deserialize)]
struct Interactor {
    #[serde(default)]
    verified_accounts: Vec<String>,
}

/// Neynar-backed frame message verifier.
pub struct NeynarClient {
    http: Client,
    api_key: String,
    api_url: String,
}

impl NeynarClient {
    pub fn new(api_key: String) -> Self {
        Self {
            http: Client::new(),
            api_key,
            api_url: NEYNAR_VALIDATE_URL.to_string(),
        }
    }
}

#[async_trait]
impl FrameMessageVerifier for NeynarClient {
    async fn validate(&self, payload: &FrameActionPayload) -> Result<ValidatedFrameMessage> {
        let response = self
            .http
            .post(&self.api_url)
            .header("api_key", &self.api_key)
            .json(&json!({
                "message_bytes_in_hex": payload.trusted_data.message_bytes,
            }))
            .send()
            .await
            .context("frame validation request failed")?
            .json::<ValidateResponse>()
            .await
            .context("frame validation response was not json")?;

        let action = response.action.unwrap_or(ValidatedAction {
            input: None,
            interactor: None,
        });

        // An empty input box comes back as an empty string; treat it as absent.
        let input = action
            .input
            .map(|input| input.text)
            .filter(|text| !text.is_empty());

        Ok(ValidatedFrameMessage {
            is_valid: response.valid,
            input,
            verified_accounts: action
                .interactor
                .map(|interactor| interactor.verified_accounts)
                .unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_wins_over_verified_account() {
        let message = ValidatedFrameMessage {
            is_valid: true,
            input: Some("0xTest".to_string()),
            verified_accounts: vec!["0xWallet".to_string()],
        };
        assert_eq!(message.account_address(), "0xTest");
    }

    #[test]
    fn falls_back_to_first_verified_account() {
        let message = ValidatedFrameMessage {
            is_valid: true,
            input: None,
            verified_accounts: vec!["0xWallet".to_string(), "0xOther".to_string()],
        };
        assert_eq!(message.account_address(), "0xWallet");
    }

    #[test]
    fn defaults_to_empty_address() {
        let message = ValidatedFrameMessage::default();
        assert_eq!(message.account_address(), "");
    }
}

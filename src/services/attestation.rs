//! Attestation index client
//!
//! Queries an EAS-style GraphQL index for attestations issued to a wallet
//! address and filters them down to the ones this system recognizes as
//! proof: permanent, never-expiring, non-revoked.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

/// Attestation record returned by the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attestation {
    pub id: String,
    pub attester: String,
    pub recipient: String,
    #[serde(rename = "refUID")]
    pub ref_uid: String,
    pub revocable: bool,
    pub revocation_time: i64,
    pub revoked: bool,
    pub expiration_time: i64,
    /// Opaque encoded payload; see [`crate::services::schema`] for decoding.
    pub data: String,
    pub schema: AttestationSchema,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttestationSchema {
    pub id: String,
}

impl Attestation {
    /// Only permanent, never-expiring, non-revoked attestations count.
    pub fn is_valid(&self) -> bool {
        self.revocation_time == 0 && self.expiration_time == 0 && !self.revoked
    }
}

#[derive(Debug, Error)]
pub enum AttestationError {
    #[error("attestation index request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("attestation index returned a malformed response: {0}")]
    MalformedResponse(String),
}

/// Read access to the external attestation index.
#[async_trait]
pub trait AttestationIndex: Send + Sync {
    /// Fetch the valid attestations issued to `recipient`, optionally
    /// narrowed by schema UID and attester address (both case-insensitive).
    async fn valid_attestations(
        &self,
        recipient: &str,
        schema: Option<&str>,
        attester: Option<&str>,
    ) -> Result<Vec<Attestation>, AttestationError>;
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    data: Option<QueryData>,
}

#[derive(Debug, Deserialize)]
struct QueryData {
    attestations: Option<Vec<Attestation>>,
}

/// GraphQL client for an EAS scan index.
pub struct EasClient {
    http: Client,
    graphql_url: String,
}

impl EasClient {
    pub fn new(graphql_url: String) -> Self {
        Self {
            http: Client::new(),
            graphql_url,
        }
    }

    fn build_query(recipient: &str, schema: Option<&str>, attester: Option<&str>) -> String {
        let mut filters = format!(r#"recipient: {{ equals: "{recipient}", mode: insensitive }}"#);
        if let Some(schema) = schema {
            filters.push_str(&format!(
                r#", schemaId: {{ equals: "{schema}", mode: insensitive }}"#
            ));
        }
        if let Some(attester) = attester {
            filters.push_str(&format!(
                r#", attester: {{ equals: "{attester}", mode: insensitive }}"#
            ));
        }

        format!(
            r#"
    query Attestations {{
      attestations(
        where: {{ {filters} }}
      ) {{
        id
        attester
        recipient
        refUID
        revocable
        revocationTime
        revoked
        expirationTime
        data
        schema {{
          id
        }}
      }}
    }}
  "#
        )
    }

    fn parse_response(body: serde_json::Value) -> Result<Vec<Attestation>, AttestationError> {
        let response: QueryResponse = serde_json::from_value(body)
            .map_err(|err| AttestationError::MalformedResponse(err.to_string()))?;

        let data = response.data.ok_or_else(|| {
            AttestationError::MalformedResponse("missing data.attestations".to_string())
        })?;

        Ok(data.attestations.unwrap_or_default())
    }
}

#[async_trait]
impl AttestationIndex for EasClient {
    async fn valid_attestations(
        &self,
        recipient: &str,
        schema: Option<&str>,
        attester: Option<&str>,
    ) -> Result<Vec<Attestation>, AttestationError> {
        let query = Self::build_query(recipient, schema, attester);

        // Single page only; the index paginates but this client does not
        // follow cursors. Known limitation.
        let body = self
            .http
            .post(&self.graphql_url)
            .json(&json!({ "query": query }))
            .send()
            .await?
            .json::<serde_json::Value>()
            .await?;

        let attestations = Self::parse_response(body)?;

        // The index already narrowed by schemaId; the schema is re-checked
        // here as well. Both filters are kept on purpose.
        let filtered = attestations
            .into_iter()
            .filter(|attestation| {
                attestation.is_valid()
                    && schema
                        .map(|schema| attestation.schema.id.eq_ignore_ascii_case(schema))
                        .unwrap_or(true)
            })
            .collect();

        Ok(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attestation_json(revocation_time: i64, expiration_time: i64, revoked: bool) -> serde_json::Value {
        json!({
            "id": "0x01",
            "attester": "0xAttester",
            "recipient": "0xRecipient",
            "refUID": "0x00",
            "revocable": true,
            "revocationTime": revocation_time,
            "revoked": revoked,
            "expirationTime": expiration_time,
            "data": "0x",
            "schema": { "id": "0xSchema" }
        })
    }

    #[test]
    fn validity_predicate_rejects_revoked_and_expiring() {
        let valid: Attestation = serde_json::from_value(attestation_json(0, 0, false)).unwrap();
        assert!(valid.is_valid());

        let revoked_at: Attestation = serde_json::from_value(attestation_json(1700000000, 0, false)).unwrap();
        assert!(!revoked_at.is_valid());

        let expiring: Attestation = serde_json::from_value(attestation_json(0, 1800000000, false)).unwrap();
        assert!(!expiring.is_valid());

        let revoked: Attestation = serde_json::from_value(attestation_json(0, 0, true)).unwrap();
        assert!(!revoked.is_valid());
    }

    #[test]
    fn build_query_includes_optional_filters() {
        let query = EasClient::build_query("0xAbC", Some("0xSchema"), Some("0xAttester"));
        assert!(query.contains(r#"recipient: { equals: "0xAbC", mode: insensitive }"#));
        assert!(query.contains(r#"schemaId: { equals: "0xSchema", mode: insensitive }"#));
        assert!(query.contains(r#"attester: { equals: "0xAttester", mode: insensitive }"#));

        let bare = EasClient::build_query("0xAbC", None, None);
        assert!(!bare.contains("schemaId"));
        assert!(!bare.contains("attester:"));
    }

    #[test]
    fn parse_response_requires_data_envelope() {
        let err = EasClient::parse_response(json!({ "errors": [] })).unwrap_err();
        assert!(matches!(err, AttestationError::MalformedResponse(_)));
    }

    #[test]
    fn parse_response_accepts_missing_attestation_list() {
        let attestations = EasClient::parse_response(json!({ "data": {} })).unwrap();
        assert!(attestations.is_empty());
    }

    #[test]
    fn parse_response_reads_attestations() {
        let body = json!({ "data": { "attestations": [attestation_json(0, 0, false)] } });
        let attestations = EasClient::parse_response(body).unwrap();
        assert_eq!(attestations.len(), 1);
        assert_eq!(attestations[0].recipient, "0xRecipient");
    }
}

//! Verification strategies
//!
//! One strategy per matching criteria, each a fixed schema/attester pair
//! with a threshold rule and its own success/failure narrative. The criteria
//! set is closed, so dispatch is an exhaustive match rather than a runtime
//! registry; criteria without a registered strategy come back unverified
//! instead of erroring.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::MatchingCriteria;
use crate::services::attestation::{Attestation, AttestationError, AttestationIndex};

/// Receipts.xyz requires a running streak, not a single proof.
const RECEIPTS_RUNNING_THRESHOLD: usize = 10;

/// Strategy-specific evidence carried into product recommendation.
#[derive(Debug, Clone, Default)]
pub enum VerificationData {
    #[default]
    None,
    /// Number of valid attestations found.
    Count(usize),
    /// The first valid attestation found.
    Attestation(Box<Attestation>),
}

/// Result of running a verification strategy for one address.
#[derive(Debug, Clone, Default)]
pub struct VerificationOutcome {
    pub valid: bool,
    pub explanation: String,
    pub data: VerificationData,
}

impl VerificationOutcome {
    /// Outcome for criteria with no registered strategy.
    fn unverified() -> Self {
        Self::default()
    }
}

/// Runs the verification strategy configured on a frame.
pub struct VerificationEngine {
    index: Arc<dyn AttestationIndex>,
    config: Arc<AppConfig>,
}

impl VerificationEngine {
    pub fn new(index: Arc<dyn AttestationIndex>, config: Arc<AppConfig>) -> Self {
        Self { index, config }
    }

    /// Run the strategy for `criteria` against `address`.
    ///
    /// Unregistered criteria return an unverified outcome with an empty
    /// explanation; only attestation index failures propagate.
    pub async fn run(
        &self,
        criteria: MatchingCriteria,
        address: &str,
    ) -> Result<VerificationOutcome, AttestationError> {
        let outcome = match criteria {
            MatchingCriteria::ReceiptsXyzAllTimeRunning => {
                let attestations = self
                    .index
                    .valid_attestations(
                        address,
                        Some(&self.config.receipts_running_schema),
                        Some(&self.config.receipts_attester),
                    )
                    .await?;
                let count = attestations.len();
                let valid = count >= RECEIPTS_RUNNING_THRESHOLD;
                let explanation = if valid {
                    format!(
                        "10 or more attestations found on Receipts.xyz for {address}. A special product is recommended."
                    )
                } else {
                    format!(
                        "Not more than 10 attestations found on Receipts.xyz for {address}. A random product is recommended."
                    )
                };
                VerificationOutcome {
                    valid,
                    explanation,
                    data: VerificationData::Count(count),
                }
            }
            MatchingCriteria::CoinbaseOnchainVerificationsCountry => {
                let outcome = self
                    .single_attestation(address, &self.config.coinbase_country_schema)
                    .await?;
                let explanation = if outcome.valid {
                    format!(
                        "Country of residence verified for {address} on Coinbase Onchain. A product based on the country is recommended."
                    )
                } else {
                    format!(
                        "Country of residence not verified for {address} on Coinbase Onchain. A random product is recommended."
                    )
                };
                VerificationOutcome {
                    explanation,
                    ..outcome
                }
            }
            MatchingCriteria::CoinbaseOnchainVerificationsAccount => {
                let outcome = self
                    .single_attestation(address, &self.config.coinbase_account_schema)
                    .await?;
                let explanation = if outcome.valid {
                    format!(
                        "Coinbase account member attestation for {address}. A special product is recommended."
                    )
                } else {
                    format!(
                        "No Coinbase account member attestation for {address}. A random product is recommended."
                    )
                };
                VerificationOutcome {
                    explanation,
                    ..outcome
                }
            }
            MatchingCriteria::CoinbaseOnchainVerificationsOne => {
                let outcome = self
                    .single_attestation(address, &self.config.coinbase_one_schema)
                    .await?;
                let explanation = if outcome.valid {
                    format!(
                        "Coinbase One account member attestation for {address}. A special product is recommended."
                    )
                } else {
                    format!(
                        "No Coinbase One account member attestation for {address}. A random product is recommended."
                    )
                };
                VerificationOutcome {
                    explanation,
                    ..outcome
                }
            }
            // Declared criteria without a registered strategy.
            MatchingCriteria::PoapsOwned | MatchingCriteria::All => {
                VerificationOutcome::unverified()
            }
        };

        Ok(outcome)
    }

    /// Shared rule for the Coinbase criteria: one valid attestation from the
    /// configured attester is enough, and the first one is the evidence.
    async fn single_attestation(
        &self,
        address: &str,
        schema: &str,
    ) -> Result<VerificationOutcome, AttestationError> {
        let attestations = self
            .index
            .valid_attestations(address, Some(schema), Some(&self.config.coinbase_attester))
            .await?;

        let valid = !attestations.is_empty();
        let data = attestations
            .into_iter()
            .next()
            .map(|attestation| VerificationData::Attestation(Box::new(attestation)))
            .unwrap_or_default();

        Ok(VerificationOutcome {
            valid,
            explanation: String::new(),
            data,
        })
    }
}

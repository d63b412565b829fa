//! Product recommendation policy
//!
//! Given a verification outcome and a shop catalog, pick the product to show.
//! Each criteria has its own matching heuristic; whenever no heuristic lands
//! a product, a uniformly random pick over the catalog is the terminal rule.
//! The random source is injected so the policy is deterministic under test.

use rand::Rng;
use thiserror::Error;
use tracing::warn;

use crate::models::{MatchingCriteria, Product};
use crate::services::schema::{self, VERIFIED_COUNTRY_SCHEMA};
use crate::services::verification::{VerificationData, VerificationOutcome};

/// The product chosen for one interaction, with its display image and the
/// narrative shown in dev mode.
#[derive(Debug, Clone)]
pub struct Recommendation {
    pub product: Product,
    pub image_src: String,
    pub explanation: String,
}

/// The shop catalog is empty; no recommendation is possible.
#[derive(Debug, Error)]
#[error("no products available")]
pub struct NoProducts;

pub struct RecommendationPolicy {
    base_url: String,
}

impl RecommendationPolicy {
    pub fn new(base_url: String) -> Self {
        Self { base_url }
    }

    /// Choose a product for `address` from `products`.
    ///
    /// Criteria-specific heuristics apply only to a valid verification; in
    /// every other case the random fallback guarantees a product as long as
    /// the catalog is non-empty.
    pub fn recommend<R: Rng + ?Sized>(
        &self,
        criteria: MatchingCriteria,
        outcome: &VerificationOutcome,
        products: &[Product],
        address: &str,
        rng: &mut R,
    ) -> Result<Recommendation, NoProducts> {
        let mut explanation = outcome.explanation.clone();
        let mut custom_explanation = false;
        let mut chosen: Option<(&Product, String)> = None;

        if outcome.valid {
            match criteria {
                MatchingCriteria::ReceiptsXyzAllTimeRunning => {
                    if let Some(product) = products.iter().find(|p| matches_running(&p.description)) {
                        let image = self.og_image_url(
                            "Congrats on your +10th run!",
                            "You're now eligible to buy:",
                            &product.title,
                            &product.image,
                        );
                        chosen = Some((product, image));
                    }
                }
                MatchingCriteria::CoinbaseOnchainVerificationsCountry => {
                    if let Some(country) = decode_country(&outcome.data) {
                        let needle = country.to_lowercase();
                        if let Some(product) = products
                            .iter()
                            .find(|p| p.description.to_lowercase().contains(&needle))
                        {
                            chosen = Some((product, self.product_image_url(product)));
                            explanation = format!(
                                "Country of residence verified as {country} for {address} on Coinbase Onchain"
                            );
                        } else {
                            explanation = format!(
                                "Product not found for country of residence verified as {country} for {address} on Coinbase Onchain"
                            );
                        }
                        custom_explanation = true;
                    }
                }
                MatchingCriteria::CoinbaseOnchainVerificationsAccount
                | MatchingCriteria::CoinbaseOnchainVerificationsOne => {
                    if let Some(product) = products
                        .iter()
                        .find(|p| p.description.to_lowercase().contains("special"))
                    {
                        chosen = Some((product, self.product_image_url(product)));
                    }
                }
                // No heuristic registered for these criteria.
                MatchingCriteria::PoapsOwned | MatchingCriteria::All => {}
            }
        }

        let (product, image_src) = match chosen {
            Some((product, image)) => (product.clone(), image),
            None => {
                if products.is_empty() {
                    return Err(NoProducts);
                }
                let product = products[rng.gen_range(0..products.len())].clone();
                let image = self.product_image_url(&product);
                if !custom_explanation {
                    explanation = format!(
                        "No onchain data or matching product found for {address}. A random product is recommended."
                    );
                }
                (product, image)
            }
        };

        Ok(Recommendation {
            product,
            image_src,
            explanation,
        })
    }

    /// Standard product card: title, description, price, source image.
    fn product_image_url(&self, product: &Product) -> String {
        self.og_image_url(
            &product.title,
            &product.description,
            &product.variant_formatted_price,
            &product.image,
        )
    }

    fn og_image_url(&self, title: &str, subtitle: &str, content: &str, url: &str) -> String {
        format!(
            "{}/api/og?title={title}&subtitle={subtitle}&content={content}&url={url}&width=600",
            self.base_url
        )
    }
}

fn matches_running(description: &str) -> bool {
    let description = description.to_lowercase();
    description.contains("run") || description.contains("jog")
}

/// Extract the verified country from the attestation evidence, if any.
/// Malformed payloads are logged and treated as no match.
fn decode_country(data: &VerificationData) -> Option<String> {
    let VerificationData::Attestation(attestation) = data else {
        return None;
    };

    match schema::decode_payload(VERIFIED_COUNTRY_SCHEMA, &attestation.data) {
        Ok(fields) => fields
            .into_iter()
            .next()
            .map(|field| field.value)
            .filter(|country| !country.is_empty()),
        Err(err) => {
            warn!(attestation_id = %attestation.id, error = %err, "undecodable country attestation payload");
            None
        }
    }
}

//! Error taxonomy for the frame action pipeline

use thiserror::Error;

use crate::services::attestation::AttestationError;

/// Failures that short-circuit the frame action pipeline.
///
/// Every variant is converted into an error frame document before leaving
/// the handler; there is no distinct HTTP status contract. An unregistered
/// matching criteria is deliberately not represented here: it is treated as
/// "not verified" by the verification engine, never as a failure.
#[derive(Debug, Error)]
pub enum FrameActionError {
    /// The inbound interaction failed cryptographic validation.
    #[error("frame message failed validation")]
    InvalidSignature,

    /// The frame id path segment was not a number.
    #[error("malformed frame id: {0}")]
    MalformedRequest(String),

    /// No frame record exists for the requested id.
    #[error("frame {0} not found")]
    FrameNotFound(i64),

    /// The attestation index call failed or returned a malformed body.
    #[error(transparent)]
    Upstream(#[from] AttestationError),

    /// The shop catalog is empty, so no recommendation can be produced.
    #[error("no products available for shop {0}")]
    NoProductsAvailable(String),

    /// A persistence read failed.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

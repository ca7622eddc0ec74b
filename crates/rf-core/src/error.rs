//! Core error type.
//!
//! Sub-crates define their own error enums and either convert `CoreError`
//! via `From` impls or wrap it as one variant.  Both patterns are fine;
//! prefer whichever keeps error sites clean.

use thiserror::Error;

use crate::CommodityId;

/// Errors raised by `rf-core` value-type operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("commodity mismatch: expected {expected}, got {got}")]
    CommodityMismatch {
        expected: CommodityId,
        got: CommodityId,
    },

    #[error("insufficient quantity: wanted {wanted}, held {held}")]
    InsufficientQuantity { wanted: f64, held: f64 },

    #[error("negative quantity: {0}")]
    NegativeQuantity(f64),
}

/// Shorthand result type for `rf-core` operations.
pub type CoreResult<T> = Result<T, CoreError>;

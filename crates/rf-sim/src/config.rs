//! The boundary with the external input-document validator.
//!
//! Schema validation happens outside the kernel.  All the kernel consumes is
//! the verdict: an accepted deck, or a human-readable rejection reason that
//! surfaces as [`SimError::Config`] before any agent is constructed.  The
//! kernel never parses configuration fields itself.

use rf_core::SimConfig;

use crate::{Deployment, SimError, SimResult};

/// An input deck that passed external validation.
///
/// Holds only scalars and names the kernel understands; agent-type-specific
/// parameters travel separately inside `AgentConfig::params`.
#[derive(Clone, Debug)]
pub struct ValidatedDeck {
    pub config: SimConfig,
    /// Commodity names, in deck order (interning order).
    pub commodities: Vec<String>,
    pub deployments: Vec<Deployment>,
}

impl ValidatedDeck {
    /// Convert the validator's verdict into a deck or a configuration error.
    ///
    /// `outcome` is the external collaborator's result: `Ok(deck)` on
    /// acceptance, `Err(reason)` with its human-readable reason on rejection.
    pub fn require(outcome: Result<ValidatedDeck, String>) -> SimResult<ValidatedDeck> {
        outcome.map_err(SimError::Config)
    }
}

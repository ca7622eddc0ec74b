//! `Transaction` — the immutable record of one matched trade.

use std::fmt;

use crate::{AgentId, CommodityId, Step};

/// A resolved match between one offer and one request.
///
/// Created only by the market resolver; never mutated afterwards.  Both
/// parties receive the same record and update their own books from it.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transaction {
    /// The agent whose offer supplied the quantity.
    pub supplier: AgentId,
    /// The agent whose request consumed it.
    pub requester: AgentId,
    pub commodity: CommodityId,
    pub quantity: f64,
    /// The step the resolver produced this match.
    pub step: Step,
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}: {:.3} of {} at {}",
            self.supplier, self.requester, self.quantity, self.commodity, self.step
        )
    }
}

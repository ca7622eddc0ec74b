//! `Resource` — a quantity of one commodity.
//!
//! The kernel requires only that resources be splittable and mergeable in
//! quantity and comparable by quantity for matching.  Composition and quality
//! data belong to concrete facility implementations, not here.
//!
//! Quantities are `f64` (the simulator trades continuous material masses).
//! [`MIN_QUANTITY`] is the dust threshold: any remainder below it is treated
//! as exhausted so float error can never spin the matcher forever.

use crate::{CommodityId, CoreError, CoreResult};

/// Quantities smaller than this are considered zero.
pub const MIN_QUANTITY: f64 = 1e-9;

/// A quantity of a single commodity.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resource {
    pub commodity: CommodityId,
    pub quantity: f64,
}

impl Resource {
    /// Create a resource.  Negative quantities are a construction error.
    pub fn new(commodity: CommodityId, quantity: f64) -> CoreResult<Self> {
        if quantity < 0.0 {
            return Err(CoreError::NegativeQuantity(quantity));
        }
        Ok(Self { commodity, quantity })
    }

    /// `true` if the remaining quantity is below the dust threshold.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.quantity < MIN_QUANTITY
    }

    /// Split off `quantity` units, leaving the remainder in `self`.
    ///
    /// Fails if `self` does not hold that much (beyond the dust threshold).
    pub fn split(&mut self, quantity: f64) -> CoreResult<Resource> {
        if quantity < 0.0 {
            return Err(CoreError::NegativeQuantity(quantity));
        }
        if quantity > self.quantity + MIN_QUANTITY {
            return Err(CoreError::InsufficientQuantity {
                wanted: quantity,
                held: self.quantity,
            });
        }
        let taken = quantity.min(self.quantity);
        self.quantity -= taken;
        Ok(Resource {
            commodity: self.commodity,
            quantity: taken,
        })
    }

    /// Merge `other` into `self`.  Fails if the commodities differ.
    pub fn absorb(&mut self, other: Resource) -> CoreResult<()> {
        if other.commodity != self.commodity {
            return Err(CoreError::CommodityMismatch {
                expected: self.commodity,
                got: other.commodity,
            });
        }
        self.quantity += other.quantity;
        Ok(())
    }
}

//! Message envelopes and routing paths.

use std::fmt;

use rf_core::{AgentId, CommodityId, Resource};

use crate::{DeliveryError, DeliveryResult};

// ── MessageKind ───────────────────────────────────────────────────────────────

/// What a message declares.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MessageKind {
    /// Available supply of a commodity.
    Offer,
    /// Desired demand for a commodity.
    Request,
    /// Material in motion after a resolved transaction.  The only kind that
    /// crosses a step boundary: it settles at the next begin-phase, then
    /// travels its remaining hops within that settlement.
    Shipment,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MessageKind::Offer => "offer",
            MessageKind::Request => "request",
            MessageKind::Shipment => "shipment",
        };
        f.write_str(s)
    }
}

// ── Route ─────────────────────────────────────────────────────────────────────

/// The ordered hop chain a message travels, with a cursor at the current hop.
///
/// The sender is *not* a hop; `hops[0]` is the first recipient.  A hop that
/// neither rewrites nor absorbs the message forwards it, advancing the
/// cursor.  The last hop is the terminal recipient, which must consume the
/// message.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    hops: Vec<AgentId>,
    cursor: usize,
}

impl Route {
    /// A route through `hops`, in delivery order.  Must be non-empty.
    pub fn through(hops: Vec<AgentId>) -> DeliveryResult<Self> {
        if hops.is_empty() {
            return Err(DeliveryError::EmptyRoute);
        }
        Ok(Self { hops, cursor: 0 })
    }

    /// A direct route to a single recipient.
    pub fn direct(to: AgentId) -> Self {
        Self { hops: vec![to], cursor: 0 }
    }

    /// The hop currently addressed.
    #[inline]
    pub fn current(&self) -> AgentId {
        self.hops[self.cursor]
    }

    /// `true` if the current hop is the terminal recipient.
    #[inline]
    pub fn at_terminal(&self) -> bool {
        self.cursor + 1 == self.hops.len()
    }

    /// `true` once the message has cleared its first hop.
    ///
    /// Distinguishes a freshly sent message from one an intermediate hop is
    /// forwarding onward.
    #[inline]
    pub fn in_flight(&self) -> bool {
        self.cursor > 0
    }

    /// Advance the cursor past the current hop.
    ///
    /// Fails if already at the terminal — a terminal hop must absorb the
    /// message, never forward it.
    pub fn advance(&mut self) -> DeliveryResult<()> {
        if self.at_terminal() {
            return Err(DeliveryError::ExhaustedRoute {
                terminal: self.current(),
            });
        }
        self.cursor += 1;
        Ok(())
    }

    /// Replace the remaining hops after the current one (an institution
    /// narrowing an offer to one of its facilities, say).  The cursor stays
    /// on the current hop; call [`advance`][Self::advance] to move on.
    pub fn redirect(&mut self, remaining: Vec<AgentId>) {
        self.hops.truncate(self.cursor + 1);
        self.hops.extend(remaining);
    }
}

// ── Message ───────────────────────────────────────────────────────────────────

/// A directed, typed communication unit.
///
/// Created by an agent during a phase callback, consumed exactly once by its
/// terminal recipient, never reused.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    pub kind: MessageKind,
    pub commodity: CommodityId,
    /// Declared quantity.  For shipments this matches `cargo`.
    pub quantity: f64,
    /// The originating agent, kept for failed-delivery notification.
    pub sender: AgentId,
    /// Material riding along; only shipments carry any.
    pub cargo: Option<Resource>,
    pub route: Route,
}

impl Message {
    pub fn offer(sender: AgentId, commodity: CommodityId, quantity: f64, route: Route) -> Self {
        Self { kind: MessageKind::Offer, commodity, quantity, sender, cargo: None, route }
    }

    pub fn request(sender: AgentId, commodity: CommodityId, quantity: f64, route: Route) -> Self {
        Self { kind: MessageKind::Request, commodity, quantity, sender, cargo: None, route }
    }

    /// A shipment carrying `cargo`; its declared quantity mirrors the cargo.
    pub fn shipment(sender: AgentId, cargo: Resource, route: Route) -> Self {
        Self {
            kind: MessageKind::Shipment,
            commodity: cargo.commodity,
            quantity: cargo.quantity,
            sender,
            cargo: Some(cargo),
            route,
        }
    }

    /// The agent this message is currently addressed to.
    #[inline]
    pub fn recipient(&self) -> AgentId {
        self.route.current()
    }
}

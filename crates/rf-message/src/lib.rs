//! `rf-message` — typed communication between agents.
//!
//! Agents negotiate resource transactions by sending [`Message`]s along a
//! [`Route`]: an ordered chain of hops mirroring the supply-chain approval
//! path (facility → institution → market → … → terminal recipient).  Each hop
//! may forward the message, rewrite it, or absorb it.
//!
//! # Delivery model
//!
//! The model is single-threaded and cooperative.  Offer/Request messages are
//! delivered synchronously within the phase that sent them; Shipment-kind
//! messages are the one cross-step mechanism — they rest in a step-keyed
//! inbox and settle at the next step's begin-phase.  [`MessageChannel`] holds
//! both queues; the scheduler drains them, because only the scheduler may
//! touch other agents.

pub mod channel;
pub mod error;
pub mod message;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use channel::MessageChannel;
pub use error::{DeliveryError, DeliveryResult};
pub use message::{Message, MessageKind, Route};

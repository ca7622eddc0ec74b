//! `rf-agent` — the agent contract and its supporting machinery.
//!
//! An agent is a schedulable, message-capable, cloneable simulation
//! participant: a facility, a market, or an institution.  Rather than
//! splitting those capabilities across separate scheduling, messaging, and
//! cloning traits, everything lives on one object-safe [`Agent`] trait whose
//! optional capabilities are defaulted methods — an implementation overrides
//! exactly the hooks it needs.
//!
//! # What lives here
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`agent`]     | `Agent` trait, `AgentKind`, `AgentCore`                 |
//! | [`context`]   | `StepContext`, `Action`, `BuildRequest`                 |
//! | [`lifecycle`] | `LifecycleState`, `AgentDirectory`, `RegistrationError` |
//! | [`prototype`] | `AgentConfig`, `PrototypeSet` (registration-time factory)|
//! | [`error`]     | `AgentError`                                            |
//!
//! # Callback / action split
//!
//! Phase callbacks never touch other agents directly.  They record what they
//! want — send a message, book supply or demand, build a facility, retire —
//! as [`Action`]s on the [`StepContext`], and the scheduler applies those
//! actions after the callback returns.  This keeps every callback free of
//! aliased mutable state while preserving the synchronous, in-phase delivery
//! contract.

pub mod agent;
pub mod context;
pub mod error;
pub mod lifecycle;
pub mod prototype;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use agent::{Agent, AgentCore, AgentKind};
pub use context::{Action, BuildRequest, StepContext};
pub use error::{AgentError, AgentResult};
pub use lifecycle::{AgentDirectory, AgentEntry, LifecycleState, RegistrationError};
pub use prototype::{AgentConfig, PrototypeCtor, PrototypeSet};

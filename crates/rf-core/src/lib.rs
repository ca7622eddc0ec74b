//! `rf-core` — foundational types for the `rust_rf` resource-flow simulator.
//!
//! This crate is a dependency of every other `rf-*` crate.  It intentionally
//! has no `rf-*` dependencies and minimal external ones (`rustc-hash` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `CommodityId`                              |
//! | [`time`]        | `Step`, `Lifetime`, `SimClock`, `SimConfig`           |
//! | [`commodity`]   | `CommodityBook` string interner                       |
//! | [`resource`]    | `Resource` — a quantity of one commodity              |
//! | [`transaction`] | `Transaction` — an immutable matched trade            |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod commodity;
pub mod error;
pub mod ids;
pub mod resource;
pub mod time;
pub mod transaction;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use commodity::CommodityBook;
pub use error::{CoreError, CoreResult};
pub use ids::{AgentId, CommodityId};
pub use resource::{MIN_QUANTITY, Resource};
pub use time::{Lifetime, SimClock, SimConfig, Step};
pub use transaction::Transaction;

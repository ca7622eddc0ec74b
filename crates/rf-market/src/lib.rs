//! `rf-market` — matching offered supply against requested demand.
//!
//! During a step's begin-phase, offers and requests for each commodity
//! accumulate in that commodity's [`MarketBook`].  Once message exchange
//! settles, the scheduler runs [`resolve`] per active book, producing the
//! step's [`Transaction`][rf_core::Transaction]s.  Books are transient: a
//! resolution pass consumes the book entirely, and unmatched remainder is
//! dropped — nothing carries into the next period unless an agent re-issues
//! it.
//!
//! Resolution never fails.  Zero supply or zero demand simply yields zero
//! transactions.

pub mod book;
pub mod resolver;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use book::{BookEntry, MarketBook, MarketLedger};
pub use resolver::resolve;

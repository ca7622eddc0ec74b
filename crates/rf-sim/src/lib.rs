//! `rf-sim` — the step loop orchestrator for the rust_rf kernel.
//!
//! # One simulated step
//!
//! ```text
//! advance():
//!   ① Builds      — deployments due now are cloned from their prototype,
//!                   registered live, and reported to their institution.
//!   ② Settlement  — shipment-kind messages sent last step reach their routes.
//!   ③ Begin-phase — handle_begin_step for every live agent, registration
//!                   order; emitted offers/requests are delivered hop-by-hop
//!                   synchronously within this phase.
//!   ④ Resolution  — each commodity market with booked activity resolves;
//!                   both parties of every transaction are notified before
//!                   any end-phase callback runs.
//!   ⑤ End-phase   — handle_end_step for every live agent (fresh snapshot:
//!                   agents built this step take part).
//!   ⑥ Sweep       — agents whose decommission step has arrived and whose
//!                   condition consents are torn down.
//!   ⑦ Clock       — current_step += 1.
//! ```
//!
//! # Determinism
//!
//! Identical registration order and identical agent logic produce an
//! identical transaction sequence and identical lifecycle transitions.
//! Every ordering-sensitive pass iterates in registration (`AgentId`) order;
//! no hash-map iteration appears on any such path.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use rf_core::SimConfig;
//! use rf_sim::{NoopObserver, SimBuilder};
//!
//! let mut b = SimBuilder::new(SimConfig { total_steps: 12 });
//! let fuel = b.commodity("fuel");
//! let usa = b.institution("USA", Box::new(Region::default()))?;
//! b.market("fuel_market", usa, fuel, Box::new(CommodityMarket::new(fuel)))?;
//! b.facility("source", usa, Box::new(Source::new(fuel, 10.0)))?;
//! let mut sim = b.build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod config;
pub mod deploy;
pub mod error;
pub mod observer;
pub mod queue;
pub mod registry;
pub mod sim;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use builder::SimBuilder;
pub use config::ValidatedDeck;
pub use deploy::{Deployment, load_deployments_csv, load_deployments_reader};
pub use error::{Phase, SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use queue::BuildQueue;
pub use registry::AgentRegistry;
pub use sim::{Scheduler, StepSummary};

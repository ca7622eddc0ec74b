//! Simulation observer trait for progress reporting and data collection.
//!
//! Output and persistence are outside the kernel; this trait is the hook
//! point they plug into.

use rf_core::{AgentId, Step, Transaction};
use rf_message::{DeliveryError, Message};

use crate::StepSummary;

/// Callbacks invoked by [`Scheduler::advance`][crate::Scheduler::advance] at
/// key points in the step loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — transaction printer
///
/// ```rust,ignore
/// struct TradeLog;
///
/// impl SimObserver for TradeLog {
///     fn on_transactions(&mut self, step: Step, txns: &[Transaction]) {
///         for t in txns {
///             println!("{step}: {t}");
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each step, before any processing.
    fn on_step_start(&mut self, _step: Step) {}

    /// A deployment or in-step build request constructed a new agent.
    fn on_agent_built(&mut self, _agent: AgentId, _step: Step) {}

    /// One market's resolution pass completed with at least one match.
    /// Transactions appear in matching order.
    fn on_transactions(&mut self, _step: Step, _txns: &[Transaction]) {}

    /// A message could not be delivered; the sender has been notified.
    fn on_dead_letter(&mut self, _step: Step, _msg: &Message, _reason: &DeliveryError) {}

    /// The lifecycle sweep tore an agent down.
    fn on_decommission(&mut self, _agent: AgentId, _step: Step) {}

    /// Called at the end of each step, after the sweep.
    fn on_step_end(&mut self, _step: Step, _summary: &StepSummary) {}

    /// Called once by [`Scheduler::run`][crate::Scheduler::run] after the
    /// final step completes.
    fn on_sim_end(&mut self, _final_step: Step) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `advance`
/// or `run` but don't want callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

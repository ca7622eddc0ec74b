//! The `Agent` trait — the main extension point for model code.

use std::any::Any;
use std::fmt;

use rf_core::{AgentId, CommodityId, Lifetime, Step, Transaction};
use rf_message::{DeliveryError, Message};

use crate::{AgentResult, StepContext};

// ── AgentKind ─────────────────────────────────────────────────────────────────

/// The three agent classes the kernel schedules.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentKind {
    /// Produces and consumes resources; where offers and requests originate.
    Facility,
    /// Owns facilities; forwards and narrows messages on their behalf.
    Institution,
    /// Terminal for offers/requests of one commodity; drives resolution.
    Market,
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AgentKind::Facility => "facility",
            AgentKind::Institution => "institution",
            AgentKind::Market => "market",
        };
        f.write_str(s)
    }
}

// ── AgentCore ─────────────────────────────────────────────────────────────────

/// Configuration-derived fields shared by every agent implementation.
///
/// `AgentCore` holds *only* fields that come from the input deck; runtime
/// state (inventories, queues, books) belongs to the concrete type.  That
/// split is what makes the two-phase clone trivially correct: the core phase
/// is [`fresh_clone`][Self::fresh_clone], the module phase is
/// [`Agent::clone_fresh`].
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentCore {
    /// Name of the prototype this agent was stamped from.
    pub prototype: String,
    pub kind: AgentKind,
    /// Commodities this agent requests.
    pub in_commods: Vec<CommodityId>,
    /// Commodities this agent offers.
    pub out_commods: Vec<CommodityId>,
    pub lifetime: Lifetime,
}

impl AgentCore {
    pub fn new(prototype: impl Into<String>, kind: AgentKind) -> Self {
        Self {
            prototype: prototype.into(),
            kind,
            in_commods: Vec::new(),
            out_commods: Vec::new(),
            lifetime: Lifetime::Unbounded,
        }
    }

    /// The core phase of cloning: copy every configuration-derived field.
    ///
    /// All of `AgentCore` is configuration, so this is a plain copy — the
    /// method exists to mark the phase boundary, and so that adding a runtime
    /// field here by mistake shows up as a review question.
    pub fn fresh_clone(&self) -> AgentCore {
        self.clone()
    }
}

// ── Agent ─────────────────────────────────────────────────────────────────────

/// A simulation participant.
///
/// Required methods are the time-step hooks, the message hook, and the
/// module phase of cloning.  Everything else has a no-op default so simple
/// models implement only what they use.
///
/// # Invariants the scheduler maintains for you
///
/// - Phase callbacks are only invoked while the agent is live
///   (`build_step <= now < decommission_step`).
/// - `handle_begin_step` for step N is called on every live agent before any
///   market resolves for N, and all resolution completes before any
///   `handle_end_step` for N.
/// - Within a phase, agents run in registration order, every run.
pub trait Agent: Send {
    /// The shared configuration-derived fields.
    fn core(&self) -> &AgentCore;

    /// Beginning-of-step hook ("tick"): issue offers and requests here.
    fn handle_begin_step(&mut self, ctx: &mut StepContext<'_>) -> AgentResult<()>;

    /// End-of-step hook ("tock"): settle internal books, request retirement.
    fn handle_end_step(&mut self, ctx: &mut StepContext<'_>) -> AgentResult<()>;

    /// A message has reached this hop.
    ///
    /// The handler may forward it unchanged ([`StepContext::forward`]),
    /// rewrite the route and then forward, or absorb it — a market absorbs
    /// offers/requests by booking them ([`StepContext::book_offer`] /
    /// [`StepContext::book_request`]).  A terminal hop must absorb.
    fn receive_message(&mut self, msg: Message, ctx: &mut StepContext<'_>) -> AgentResult<()>;

    /// One of this agent's offers or requests was matched.
    ///
    /// Called during the resolution stage, before any end-of-step hook runs,
    /// so both parties can react within the same step (ship material, update
    /// inventory, request retirement).
    fn receive_transaction(
        &mut self,
        _txn: &Transaction,
        _ctx: &mut StepContext<'_>,
    ) -> AgentResult<()> {
        Ok(())
    }

    /// A message this agent sent could not be delivered.
    ///
    /// The default drops it; override to retry, redirect, or record.
    fn handle_undelivered(&mut self, _msg: Message, _reason: &DeliveryError) {}

    /// Consulted by the lifecycle sweep once this agent's decommission step
    /// has arrived.  Returning `false` defers teardown to a later sweep
    /// (e.g. until outstanding shipments clear); the kernel never forces it.
    fn check_decommission_condition(&self) -> bool {
        true
    }

    /// Last call before the agent leaves the live registry.
    fn teardown(&mut self) {}

    /// Institution hook: a facility owned by this institution was built.
    fn report_build(&mut self, _child: AgentId, _now: Step) {}

    /// Institution hook: a facility owned by this institution was torn down.
    fn report_decommission(&mut self, _child: AgentId, _now: Step) {}

    /// The module phase of cloning: produce a new agent whose configuration
    /// equals this prototype's (`core().fresh_clone()` plus module config)
    /// and whose runtime state is freshly default-initialized.
    ///
    /// Aliasing mutable state between prototype and clone is the one bug
    /// this component cannot tolerate; see the clone-independence tests.
    fn clone_fresh(&self) -> Box<dyn Agent>;

    /// Downcast support for hosts and tests inspecting concrete state.
    fn as_any(&self) -> &dyn Any;
}

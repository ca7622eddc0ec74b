//! `StepContext` — what a phase callback sees, and the actions it may emit.

use rf_core::{AgentId, CommodityId, Lifetime, Step};
use rf_message::{DeliveryResult, Message};

use crate::AgentDirectory;

// ── BuildRequest ──────────────────────────────────────────────────────────────

/// A request to stamp a new agent out of a named prototype.
///
/// Emitted by callbacks (an institution deciding to build) or queued from the
/// deployment schedule.  The scheduler registers the clone at `build_step`;
/// if that equals the current step the agent is live immediately and takes
/// part in the same step's end-phase.
#[derive(Clone, Debug)]
pub struct BuildRequest {
    pub prototype: String,
    /// Name for the new agent, unique within `institution`'s scope.
    pub name: String,
    /// Owning institution; `AgentId::INVALID` for the root scope.
    pub institution: AgentId,
    pub build_step: Step,
    /// Override the prototype's lifetime, or `None` to inherit it.
    pub lifetime: Option<Lifetime>,
}

// ── Action ────────────────────────────────────────────────────────────────────

/// What a callback asked the scheduler to do.
///
/// Mirrors the intent/apply split: callbacks produce actions, the scheduler
/// consumes them immediately after the callback returns, still within the
/// same phase.
#[derive(Debug)]
pub enum Action {
    /// Deliver a message to the first (or next) hop on its route.
    Send(Message),
    /// Terminal booking of supply with the current commodity's market book.
    BookOffer {
        supplier: AgentId,
        commodity: CommodityId,
        quantity: f64,
    },
    /// Terminal booking of demand.
    BookRequest {
        requester: AgentId,
        commodity: CommodityId,
        quantity: f64,
    },
    /// Clone a prototype and register the result.
    Build(BuildRequest),
    /// Force `agent`'s decommission date to `at` (kept if already earlier).
    Retire { agent: AgentId, at: Step },
}

// ── StepContext ───────────────────────────────────────────────────────────────

/// Per-callback context: the current step, the called agent's identity,
/// read-only directory access, and the action buffer.
pub struct StepContext<'a> {
    now: Step,
    agent: AgentId,
    /// Read-only registry view: names, institutions, markets, liveness.
    pub directory: &'a AgentDirectory,
    actions: Vec<Action>,
}

impl<'a> StepContext<'a> {
    pub fn new(now: Step, agent: AgentId, directory: &'a AgentDirectory) -> Self {
        Self {
            now,
            agent,
            directory,
            actions: Vec::new(),
        }
    }

    /// The current simulation step.
    #[inline]
    pub fn now(&self) -> Step {
        self.now
    }

    /// The agent this callback is running on.
    #[inline]
    pub fn agent(&self) -> AgentId {
        self.agent
    }

    // ── Communication ─────────────────────────────────────────────────────

    /// Send `msg` toward the first hop on its route.  Never blocks; offers
    /// and requests are delivered synchronously within the current phase,
    /// shipments settle at the next step's begin-phase.
    pub fn send(&mut self, msg: Message) {
        self.actions.push(Action::Send(msg));
    }

    /// Forward a received message to its next hop, unchanged.
    ///
    /// Fails if this agent is the terminal hop — terminals must absorb.
    pub fn forward(&mut self, mut msg: Message) -> DeliveryResult<()> {
        msg.route.advance()?;
        self.send(msg);
        Ok(())
    }

    // ── Market booking (terminal absorption by a market agent) ────────────

    /// Book `quantity` of supply from `supplier` into this commodity's book.
    pub fn book_offer(&mut self, supplier: AgentId, commodity: CommodityId, quantity: f64) {
        self.actions.push(Action::BookOffer {
            supplier,
            commodity,
            quantity,
        });
    }

    /// Book `quantity` of demand from `requester`.
    pub fn book_request(&mut self, requester: AgentId, commodity: CommodityId, quantity: f64) {
        self.actions.push(Action::BookRequest {
            requester,
            commodity,
            quantity,
        });
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Request a new agent built from a prototype.
    pub fn build(&mut self, request: BuildRequest) {
        self.actions.push(Action::Build(request));
    }

    /// Request this agent's own decommission at `at` (no earlier than now).
    ///
    /// Teardown still goes through the lifecycle sweep and this agent's
    /// `check_decommission_condition`; a callback never deletes itself.
    pub fn retire(&mut self, at: Step) {
        self.actions.push(Action::Retire {
            agent: self.agent,
            at: at.max(self.now),
        });
    }

    // ── Scheduler side ────────────────────────────────────────────────────

    /// Consume the context, yielding the buffered actions in emission order.
    pub fn into_actions(self) -> Vec<Action> {
        self.actions
    }
}

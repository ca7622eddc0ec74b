//! The `Scheduler` struct and its step loop.

use std::fmt;

use rf_agent::{
    Action, Agent, AgentEntry, AgentResult, BuildRequest, LifecycleState, PrototypeSet,
    StepContext,
};
use rf_core::{AgentId, CommodityBook, CommodityId, SimClock, SimConfig, Step, Transaction};
use rf_market::{MarketLedger, resolve};
use rf_message::{DeliveryError, Message, MessageChannel};

use crate::{AgentRegistry, BuildQueue, Phase, SimError, SimObserver, SimResult};

// ── StepSummary ───────────────────────────────────────────────────────────────

/// Counters for one completed step, handed to `on_step_end`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepSummary {
    pub step: Step,
    /// Live agents that received the begin-phase callback.
    pub ticked: usize,
    pub messages_delivered: usize,
    pub dead_letters: usize,
    pub transactions: usize,
    pub built: usize,
    pub decommissioned: usize,
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

/// The tick/tock driver.
///
/// Owns the live-agent registry and its lifecycle timestamps exclusively;
/// everything else observes agents through messages and transactions.
/// Create directly for hand-assembled setups or via
/// [`SimBuilder`][crate::SimBuilder].
pub struct Scheduler {
    pub config: SimConfig,
    pub clock: SimClock,
    /// Interned commodity names, shared with the host for id lookups.
    pub commodities: CommodityBook,
    pub registry: AgentRegistry,
    /// Prototypes the build queue stamps agents from.
    pub prototypes: PrototypeSet,
    channel: MessageChannel,
    ledger: MarketLedger,
    builds: BuildQueue,
}

impl fmt::Debug for Scheduler {
    // Agent boxes are not Debug; summarize the bookkeeping instead.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("step", &self.clock.current_step)
            .field("agents", &self.registry.len())
            .field("commodities", &self.commodities.len())
            .field("pending_builds", &self.builds.len())
            .finish_non_exhaustive()
    }
}

impl Scheduler {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            clock: SimClock::new(),
            commodities: CommodityBook::new(),
            registry: AgentRegistry::new(),
            prototypes: PrototypeSet::new(),
            channel: MessageChannel::new(),
            ledger: MarketLedger::new(),
            builds: BuildQueue::new(),
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// The current step.  Monotonically non-decreasing; +1 per `advance`.
    #[inline]
    pub fn current_step(&self) -> Step {
        self.clock.current_step
    }

    /// Add `agent` to the registry under `name` within `institution`'s scope
    /// (`AgentId::INVALID` for the root scope).
    ///
    /// A future `build_step` registers the agent as `Unbuilt`; it goes live
    /// at its build date.  The lifetime comes from the agent's core config.
    pub fn register_agent(
        &mut self,
        agent: Box<dyn Agent>,
        name: &str,
        institution: AgentId,
        build_step: Step,
    ) -> SimResult<AgentId> {
        let now = self.clock.current_step;
        let core = agent.core();
        let entry = AgentEntry {
            name: name.to_owned(),
            kind: core.kind,
            institution,
            build_step,
            decommission_step: core.lifetime.decommission_step(build_step),
            state: if build_step <= now {
                LifecycleState::Live
            } else {
                LifecycleState::Unbuilt
            },
        };
        Ok(self.registry.register(agent, entry)?)
    }

    /// Register a market agent and bind it as the resolver target for
    /// `commodity`.
    pub fn register_market(
        &mut self,
        agent: Box<dyn Agent>,
        name: &str,
        institution: AgentId,
        commodity: CommodityId,
    ) -> SimResult<AgentId> {
        let id = self.register_agent(agent, name, institution, self.clock.current_step)?;
        self.registry.directory.register_market(commodity, id)?;
        Ok(id)
    }

    /// Queue a build request for its build step.
    pub fn schedule_build(&mut self, request: BuildRequest) -> SimResult<()> {
        if !self.prototypes.contains(&request.prototype) {
            return Err(SimError::UnknownPrototype(request.prototype));
        }
        self.builds.push(request);
        Ok(())
    }

    /// Execute one full step and advance the clock.
    ///
    /// An uncaught agent error aborts the step as [`SimError::Fault`]; the
    /// kernel performs no rollback of callbacks already run within it.
    pub fn advance<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<StepSummary> {
        let now = self.clock.current_step;
        observer.on_step_start(now);

        let mut summary = StepSummary {
            step: now,
            ..StepSummary::default()
        };

        // ── ① Builds due this step ────────────────────────────────────────
        //
        // Agents registered ahead of time reach their build date, then queued
        // deployments clone their prototype.
        let pending: Vec<AgentId> = self
            .registry
            .directory
            .ids()
            .filter(|&id| {
                self.registry.directory.entry(id).is_some_and(|e| {
                    e.state == LifecycleState::Unbuilt && e.build_step <= now
                })
            })
            .collect();
        for id in pending {
            self.registry.directory.make_live(id);
            let institution = self
                .registry
                .directory
                .entry(id)
                .map_or(AgentId::INVALID, |e| e.institution);
            if institution != AgentId::INVALID
                && let Some(inst) = self.registry.get_mut(institution)
            {
                inst.report_build(id, now);
            }
            observer.on_agent_built(id, now);
            summary.built += 1;
        }

        for request in self.builds.drain_due(now) {
            self.build_now(request, observer, &mut summary)?;
        }

        // ── ② Shipment settlement ─────────────────────────────────────────
        for msg in self.channel.settle_due(now) {
            self.deliver(msg, Phase::BeginStep, observer, &mut summary)?;
        }

        // ── ③ Begin-phase (tick) ──────────────────────────────────────────
        //
        // Snapshot the live set first: agents built *during* this phase are
        // excluded here and picked up by the end-phase snapshot below.
        let live = self.registry.directory.live_at(now);
        summary.ticked = live.len();
        for id in live {
            if !self.registry.directory.is_live(id, now) {
                // Window closed mid-phase (forced retirement at `now`).
                continue;
            }
            let actions = self.invoke(id, Phase::BeginStep, |agent, ctx| {
                agent.handle_begin_step(ctx)
            })?;
            self.apply_actions(actions, Phase::BeginStep, observer, &mut summary)?;
        }

        // ── ④ Market resolution ───────────────────────────────────────────
        //
        // Markets are visited in registration order; each drains its
        // commodity's book.  Both parties hear about every transaction
        // before any end-phase callback runs.
        let markets: Vec<(CommodityId, AgentId)> =
            self.registry.directory.markets().to_vec();
        for (commodity, _market) in markets {
            let Some(book) = self.ledger.take_book(commodity) else {
                continue;
            };
            let transactions = resolve(book, commodity, now);
            if transactions.is_empty() {
                continue;
            }
            observer.on_transactions(now, &transactions);
            summary.transactions += transactions.len();
            for txn in &transactions {
                self.notify_transaction(txn, observer, &mut summary)?;
            }
        }
        // End of period for every book, including bookings under commodities
        // with no bound market: nothing carries into the next step.
        self.ledger.clear();

        // ── ⑤ End-phase (tock) ────────────────────────────────────────────
        for id in self.registry.directory.live_at(now) {
            if !self.registry.directory.is_live(id, now) {
                continue;
            }
            let actions =
                self.invoke(id, Phase::EndStep, |agent, ctx| agent.handle_end_step(ctx))?;
            self.apply_actions(actions, Phase::EndStep, observer, &mut summary)?;
        }

        // ── ⑥ Lifecycle sweep ─────────────────────────────────────────────
        self.sweep(now, observer, &mut summary);

        // ── ⑦ Clock ───────────────────────────────────────────────────────
        self.clock.advance();
        observer.on_step_end(now, &summary);
        Ok(summary)
    }

    /// Run from the current step to `config.end_step()`.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        while self.clock.current_step < self.config.end_step() {
            self.advance(observer)?;
        }
        observer.on_sim_end(self.clock.current_step);
        Ok(())
    }

    /// Run exactly `n` steps from the current position (ignores `end_step`).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_steps<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.advance(observer)?;
        }
        Ok(())
    }

    // ── Callback invocation ───────────────────────────────────────────────

    /// Run one callback on one agent and collect the actions it emitted.
    ///
    /// The agent's box is taken out of its slot for the duration, so the
    /// callback can never reach back into the registry that is calling it.
    fn invoke<F>(&mut self, id: AgentId, phase: Phase, f: F) -> SimResult<Vec<Action>>
    where
        F: FnOnce(&mut dyn Agent, &mut StepContext<'_>) -> AgentResult<()>,
    {
        let now = self.clock.current_step;
        let Some(mut agent) = self.registry.take(id) else {
            // Vacant slot: only possible for the agent currently executing,
            // which cannot be scheduled twice in one pass.
            return Ok(Vec::new());
        };

        let mut ctx = StepContext::new(now, id, &self.registry.directory);
        let result = f(agent.as_mut(), &mut ctx);
        let actions = ctx.into_actions();
        self.registry.put_back(id, agent);

        result.map_err(|source| SimError::Fault {
            agent: self
                .registry
                .directory
                .entry(id)
                .map(|e| e.name.clone())
                .unwrap_or_default(),
            id,
            phase,
            source,
        })?;
        Ok(actions)
    }

    /// Apply a callback's actions, in emission order, within `phase`.
    fn apply_actions<O: SimObserver>(
        &mut self,
        actions: Vec<Action>,
        phase: Phase,
        observer: &mut O,
        summary: &mut StepSummary,
    ) -> SimResult<()> {
        let now = self.clock.current_step;
        for action in actions {
            match action {
                Action::Send(msg) => {
                    self.channel.send(msg, now);
                    // Offers/requests and forwarded shipments deliver
                    // synchronously within this phase; a fresh shipment went
                    // to the inbox and settles next step.
                    self.deliver_pending(phase, observer, summary)?;
                }
                Action::BookOffer {
                    supplier,
                    commodity,
                    quantity,
                } => self.ledger.book_offer(commodity, supplier, quantity),
                Action::BookRequest {
                    requester,
                    commodity,
                    quantity,
                } => self.ledger.book_request(commodity, requester, quantity),
                Action::Build(request) => {
                    if request.build_step <= now {
                        self.build_now(request, observer, summary)?;
                    } else {
                        self.schedule_build(request)?;
                    }
                }
                Action::Retire { agent, at } => {
                    self.registry.directory.force_decommission_step(agent, at);
                }
            }
        }
        Ok(())
    }

    // ── Message delivery ──────────────────────────────────────────────────

    fn deliver_pending<O: SimObserver>(
        &mut self,
        phase: Phase,
        observer: &mut O,
        summary: &mut StepSummary,
    ) -> SimResult<()> {
        while let Some(msg) = self.channel.pop_pending() {
            self.deliver(msg, phase, observer, summary)?;
        }
        Ok(())
    }

    /// Hand `msg` to its current hop, or dead-letter it back to the sender.
    fn deliver<O: SimObserver>(
        &mut self,
        msg: Message,
        phase: Phase,
        observer: &mut O,
        summary: &mut StepSummary,
    ) -> SimResult<()> {
        let now = self.clock.current_step;
        let recipient = msg.recipient();

        let verdict = match self.registry.directory.entry(recipient) {
            None => Err(DeliveryError::UnknownRecipient(recipient)),
            Some(e) if e.state == LifecycleState::Unbuilt => {
                Err(DeliveryError::UnbuiltRecipient(recipient))
            }
            Some(e) if e.state == LifecycleState::Decommissioned => {
                Err(DeliveryError::DeadRecipient(recipient))
            }
            Some(_) => Ok(()),
        };

        match verdict {
            Err(reason) => {
                summary.dead_letters += 1;
                observer.on_dead_letter(now, &msg, &reason);
                // Failed delivery is the sender's problem, not a crash.
                let sender = msg.sender;
                if let Some(agent) = self.registry.get_mut(sender) {
                    agent.handle_undelivered(msg, &reason);
                }
                Ok(())
            }
            Ok(()) => {
                summary.messages_delivered += 1;
                let actions = self.invoke(recipient, phase, move |agent, ctx| {
                    agent.receive_message(msg, ctx)
                })?;
                // A hop may forward, rewrite, or respond: recurse until the
                // in-phase queue drains.
                self.apply_actions(actions, phase, observer, summary)
            }
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Clone `request.prototype` and register the clone live right now.
    fn build_now<O: SimObserver>(
        &mut self,
        request: BuildRequest,
        observer: &mut O,
        summary: &mut StepSummary,
    ) -> SimResult<AgentId> {
        let now = self.clock.current_step;
        let agent = self
            .prototypes
            .clone_prototype(&request.prototype)
            .map_err(|_| SimError::UnknownPrototype(request.prototype.clone()))?;

        let lifetime = request.lifetime.unwrap_or(agent.core().lifetime);
        let entry = AgentEntry {
            name: request.name,
            kind: agent.core().kind,
            institution: request.institution,
            build_step: now,
            decommission_step: lifetime.decommission_step(now),
            state: LifecycleState::Live,
        };
        let id = self.registry.register(agent, entry)?;

        if request.institution != AgentId::INVALID
            && let Some(inst) = self.registry.get_mut(request.institution)
        {
            inst.report_build(id, now);
        }
        observer.on_agent_built(id, now);
        summary.built += 1;
        Ok(id)
    }

    /// Tell both parties of a resolved match, before any end-phase callback.
    fn notify_transaction<O: SimObserver>(
        &mut self,
        txn: &Transaction,
        observer: &mut O,
        summary: &mut StepSummary,
    ) -> SimResult<()> {
        for party in [txn.supplier, txn.requester] {
            let now = self.clock.current_step;
            if !self.registry.directory.is_live(party, now) {
                continue;
            }
            let actions = self.invoke(party, Phase::Resolution, |agent, ctx| {
                agent.receive_transaction(txn, ctx)
            })?;
            self.apply_actions(actions, Phase::Resolution, observer, summary)?;
        }
        Ok(())
    }

    /// Decommission every live agent whose time has come and whose
    /// condition consents.  An agent answering `false` stays live and is
    /// asked again on every later sweep; teardown is offered, not forced.
    fn sweep<O: SimObserver>(&mut self, now: Step, observer: &mut O, summary: &mut StepSummary) {
        let candidates: Vec<AgentId> = self.registry.directory.ids().collect();
        for id in candidates {
            let Some(entry) = self.registry.directory.entry(id) else {
                continue;
            };
            if entry.state != LifecycleState::Live {
                continue;
            }
            let Some(due) = entry.decommission_step else {
                continue;
            };
            if due > now {
                continue;
            }
            let institution = entry.institution;

            let consents = self
                .registry
                .get(id)
                .is_some_and(|a| a.check_decommission_condition());
            if !consents {
                continue;
            }

            if let Some(agent) = self.registry.get_mut(id) {
                agent.teardown();
            }
            self.registry.directory.mark_decommissioned(id, now);
            if institution != AgentId::INVALID
                && let Some(inst) = self.registry.get_mut(institution)
            {
                inst.report_decommission(id, now);
            }
            observer.on_decommission(id, now);
            summary.decommissioned += 1;
        }
    }
}

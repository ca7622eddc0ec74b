//! Fluent builder for constructing a [`Scheduler`].

use rf_agent::{Agent, BuildRequest, PrototypeSet};
use rf_core::{AgentId, CommodityId, SimConfig, Step};

use crate::{Deployment, Scheduler, SimError, SimResult, ValidatedDeck};

/// Fluent builder for [`Scheduler`].
///
/// Registrations happen eagerly, so institution/market ids are available for
/// wiring later agents, and duplicate-identity errors surface at the call
/// that caused them.  [`build`][Self::build] resolves the deployment
/// schedule and validates that every commodity an agent trades has a market.
///
/// # Example
///
/// ```rust,ignore
/// let mut b = SimBuilder::new(SimConfig { total_steps: 120 });
/// let fuel = b.commodity("fuel");
/// b.prototypes(protos);
/// let usa = b.institution("USA", Box::new(Region::default()))?;
/// b.market("fuel_market", usa, fuel, Box::new(CommodityMarket::new(fuel)))?;
/// b.facility("mine", usa, Box::new(Source::new(fuel, 10.0)))?;
/// b.deployments(load_deployments_csv(path)?);
/// let mut sim = b.build()?;
/// ```
pub struct SimBuilder {
    scheduler: Scheduler,
    deployments: Vec<Deployment>,
}

impl SimBuilder {
    pub fn new(config: SimConfig) -> Self {
        Self {
            scheduler: Scheduler::new(config),
            deployments: Vec::new(),
        }
    }

    /// Assemble a builder straight from a validated input deck.
    pub fn from_deck(deck: ValidatedDeck, prototypes: PrototypeSet) -> Self {
        let mut builder = Self::new(deck.config);
        for name in &deck.commodities {
            builder.commodity(name);
        }
        builder.prototypes(prototypes);
        builder.deployments(deck.deployments);
        builder
    }

    /// Intern a commodity name, returning its id (idempotent).
    pub fn commodity(&mut self, name: &str) -> CommodityId {
        self.scheduler.commodities.intern(name)
    }

    /// Supply the prototype set the deployment schedule clones from.
    pub fn prototypes(&mut self, set: PrototypeSet) -> &mut Self {
        self.scheduler.prototypes = set;
        self
    }

    /// Register a root-scope institution.
    pub fn institution(&mut self, name: &str, agent: Box<dyn Agent>) -> SimResult<AgentId> {
        self.scheduler
            .register_agent(agent, name, AgentId::INVALID, Step::ZERO)
    }

    /// Register a market agent and bind it to `commodity`.
    pub fn market(
        &mut self,
        name: &str,
        institution: AgentId,
        commodity: CommodityId,
        agent: Box<dyn Agent>,
    ) -> SimResult<AgentId> {
        self.scheduler
            .register_market(agent, name, institution, commodity)
    }

    /// Register a facility live from step 0.
    pub fn facility(
        &mut self,
        name: &str,
        institution: AgentId,
        agent: Box<dyn Agent>,
    ) -> SimResult<AgentId> {
        self.scheduler
            .register_agent(agent, name, institution, Step::ZERO)
    }

    /// Append deployment-schedule rows (e.g. from the CSV loader).
    pub fn deployments(&mut self, rows: Vec<Deployment>) -> &mut Self {
        self.deployments.extend(rows);
        self
    }

    /// Resolve the deployment schedule, validate markets, and return a
    /// ready-to-run [`Scheduler`].
    pub fn build(mut self) -> SimResult<Scheduler> {
        // ── Resolve deployments against prototypes and institutions ───────
        for deployment in std::mem::take(&mut self.deployments) {
            if !self.scheduler.prototypes.contains(&deployment.prototype) {
                return Err(SimError::UnknownPrototype(deployment.prototype));
            }
            let institution = self
                .scheduler
                .registry
                .directory
                .lookup(AgentId::INVALID, &deployment.institution)
                .ok_or_else(|| SimError::UnknownInstitution(deployment.institution.clone()))?;

            self.scheduler.schedule_build(BuildRequest {
                prototype: deployment.prototype,
                name: deployment.name,
                institution,
                build_step: deployment.build_step,
                lifetime: deployment.lifetime,
            })?;
        }

        // ── Every traded commodity needs a market to resolve it ───────────
        let mut traded: Vec<CommodityId> = Vec::new();
        for (_, agent) in self.scheduler.registry.iter() {
            let core = agent.core();
            traded.extend(core.in_commods.iter().chain(&core.out_commods));
        }
        for commodity in traded {
            if self
                .scheduler
                .registry
                .directory
                .market_for(commodity)
                .is_none()
            {
                return Err(SimError::MissingMarket(commodity));
            }
        }

        Ok(self.scheduler)
    }
}

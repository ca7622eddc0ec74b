//! fuel-chain — smallest end-to-end scenario for the rust_rf kernel.
//!
//! A three-stage supply chain under one institution:
//!
//! ```text
//! mine ──natural_u──▶ enricher ──fuel──▶ reactors
//! ```
//!
//! The mine offers raw material every step and ships whatever gets matched.
//! The enricher converts received material one-to-one and offers its stock
//! as fuel.  Reactors arrive on a deployment schedule (unit_2 four steps
//! after unit_1), burn what they receive, and retire when their lifetime
//! runs out.

use std::any::Any;
use std::io::Cursor;

use anyhow::Result;

use rf_agent::{Agent, AgentCore, AgentKind, AgentResult, PrototypeSet, StepContext};
use rf_core::{AgentId, CommodityId, Resource, SimConfig, Step, Transaction};
use rf_message::{Message, MessageKind, Route};
use rf_sim::{SimBuilder, SimObserver, StepSummary, load_deployments_reader};

// ── Constants ─────────────────────────────────────────────────────────────────

const SIM_STEPS:           u64 = 12;
const MINE_CAPACITY:       f64 = 12.0;
const ENRICHER_THROUGHPUT: f64 = 10.0;
const REACTOR_DEMAND:      f64 = 4.0;

// ── Deployment schedule ───────────────────────────────────────────────────────

const SCHEDULE_CSV: &str = "\
prototype,name,institution,build_step,lifetime
reactor,unit_1,usa,0,8
reactor,unit_2,usa,4,8
";

// ── Agents ────────────────────────────────────────────────────────────────────

/// Terminal hop for one commodity: books every offer and request.
struct CommodityMarket {
    core: AgentCore,
}

impl CommodityMarket {
    fn new() -> Self {
        Self {
            core: AgentCore::new("commodity_market", AgentKind::Market),
        }
    }
}

impl Agent for CommodityMarket {
    fn core(&self) -> &AgentCore {
        &self.core
    }

    fn handle_begin_step(&mut self, _ctx: &mut StepContext<'_>) -> AgentResult<()> {
        Ok(())
    }

    fn handle_end_step(&mut self, _ctx: &mut StepContext<'_>) -> AgentResult<()> {
        Ok(())
    }

    fn receive_message(&mut self, msg: Message, ctx: &mut StepContext<'_>) -> AgentResult<()> {
        match msg.kind {
            MessageKind::Offer => ctx.book_offer(msg.sender, msg.commodity, msg.quantity),
            MessageKind::Request => ctx.book_request(msg.sender, msg.commodity, msg.quantity),
            MessageKind::Shipment => {}
        }
        Ok(())
    }

    fn clone_fresh(&self) -> Box<dyn Agent> {
        Box::new(Self {
            core: self.core.fresh_clone(),
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Root institution: forwards messages toward their next hop and keeps a
/// tally of fleet changes.
struct Region {
    core:    AgentCore,
    built:   usize,
    retired: usize,
}

impl Region {
    fn new() -> Self {
        Self {
            core:    AgentCore::new("region", AgentKind::Institution),
            built:   0,
            retired: 0,
        }
    }
}

impl Agent for Region {
    fn core(&self) -> &AgentCore {
        &self.core
    }

    fn handle_begin_step(&mut self, _ctx: &mut StepContext<'_>) -> AgentResult<()> {
        Ok(())
    }

    fn handle_end_step(&mut self, _ctx: &mut StepContext<'_>) -> AgentResult<()> {
        Ok(())
    }

    fn receive_message(&mut self, msg: Message, ctx: &mut StepContext<'_>) -> AgentResult<()> {
        ctx.forward(msg)?;
        Ok(())
    }

    fn report_build(&mut self, _child: AgentId, _now: Step) {
        self.built += 1;
    }

    fn report_decommission(&mut self, _child: AgentId, _now: Step) {
        self.retired += 1;
    }

    fn clone_fresh(&self) -> Box<dyn Agent> {
        Box::new(Self {
            core:    self.core.fresh_clone(),
            built:   0,
            retired: 0,
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Unlimited upstream supply: offers `capacity` of raw material per step and
/// ships every matched quantity straight to the requester.
struct Mine {
    core:      AgentCore,
    commodity: CommodityId,
    capacity:  f64,
    mined:     f64,
}

impl Mine {
    fn new(commodity: CommodityId, capacity: f64) -> Self {
        let mut core = AgentCore::new("mine", AgentKind::Facility);
        core.out_commods.push(commodity);
        Self {
            core,
            commodity,
            capacity,
            mined: 0.0,
        }
    }
}

impl Agent for Mine {
    fn core(&self) -> &AgentCore {
        &self.core
    }

    fn handle_begin_step(&mut self, ctx: &mut StepContext<'_>) -> AgentResult<()> {
        let market = ctx
            .directory
            .market_for(self.commodity)
            .ok_or_else(|| rf_agent::AgentError::Behavior("no raw-material market".into()))?;
        ctx.send(Message::offer(
            ctx.agent(),
            self.commodity,
            self.capacity,
            Route::direct(market),
        ));
        Ok(())
    }

    fn handle_end_step(&mut self, _ctx: &mut StepContext<'_>) -> AgentResult<()> {
        Ok(())
    }

    fn receive_message(&mut self, _msg: Message, _ctx: &mut StepContext<'_>) -> AgentResult<()> {
        Ok(())
    }

    fn receive_transaction(
        &mut self,
        txn: &Transaction,
        ctx: &mut StepContext<'_>,
    ) -> AgentResult<()> {
        self.mined += txn.quantity;
        let cargo = Resource::new(txn.commodity, txn.quantity)?;
        ctx.send(Message::shipment(
            ctx.agent(),
            cargo,
            Route::direct(txn.requester),
        ));
        Ok(())
    }

    fn clone_fresh(&self) -> Box<dyn Agent> {
        Box::new(Self {
            core:      self.core.fresh_clone(),
            commodity: self.commodity,
            capacity:  self.capacity,
            mined:     0.0,
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Middle of the chain: requests raw material, converts arrivals one-to-one,
/// and offers the converted stock downstream.
struct Enricher {
    core:       AgentCore,
    raw:        CommodityId,
    product:    CommodityId,
    throughput: f64,
    stock:      f64,
}

impl Enricher {
    fn new(raw: CommodityId, product: CommodityId, throughput: f64) -> Self {
        let mut core = AgentCore::new("enricher", AgentKind::Facility);
        core.in_commods.push(raw);
        core.out_commods.push(product);
        Self {
            core,
            raw,
            product,
            throughput,
            stock: 0.0,
        }
    }
}

impl Agent for Enricher {
    fn core(&self) -> &AgentCore {
        &self.core
    }

    fn handle_begin_step(&mut self, ctx: &mut StepContext<'_>) -> AgentResult<()> {
        let missing = |what: &str| rf_agent::AgentError::Behavior(format!("no {what} market"));
        let raw_market = ctx.directory.market_for(self.raw).ok_or_else(|| missing("raw"))?;
        ctx.send(Message::request(
            ctx.agent(),
            self.raw,
            self.throughput,
            Route::direct(raw_market),
        ));

        if self.stock > 0.0 {
            let product_market = ctx
                .directory
                .market_for(self.product)
                .ok_or_else(|| missing("product"))?;
            ctx.send(Message::offer(
                ctx.agent(),
                self.product,
                self.stock,
                Route::direct(product_market),
            ));
        }
        Ok(())
    }

    fn handle_end_step(&mut self, _ctx: &mut StepContext<'_>) -> AgentResult<()> {
        Ok(())
    }

    fn receive_message(&mut self, msg: Message, _ctx: &mut StepContext<'_>) -> AgentResult<()> {
        // Raw material arriving by shipment converts one-to-one into stock.
        if let Some(cargo) = msg.cargo {
            self.stock += cargo.quantity;
        }
        Ok(())
    }

    fn receive_transaction(
        &mut self,
        txn: &Transaction,
        ctx: &mut StepContext<'_>,
    ) -> AgentResult<()> {
        if txn.commodity != self.product {
            // Raw-side match; material arrives by shipment next step.
            return Ok(());
        }
        let quantity = txn.quantity.min(self.stock);
        if quantity <= 0.0 {
            return Ok(());
        }
        self.stock -= quantity;
        let cargo = Resource::new(txn.commodity, quantity)?;
        ctx.send(Message::shipment(
            ctx.agent(),
            cargo,
            Route::direct(txn.requester),
        ));
        Ok(())
    }

    fn clone_fresh(&self) -> Box<dyn Agent> {
        Box::new(Self {
            core:       self.core.fresh_clone(),
            raw:        self.raw,
            product:    self.product,
            throughput: self.throughput,
            stock:      0.0,
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Downstream consumer, stamped from a prototype by the deployment schedule.
struct Reactor {
    core:   AgentCore,
    fuel:   CommodityId,
    demand: f64,
    burned: f64,
}

impl Reactor {
    fn prototype(fuel: CommodityId, demand: f64) -> Self {
        let mut core = AgentCore::new("reactor", AgentKind::Facility);
        core.in_commods.push(fuel);
        Self {
            core,
            fuel,
            demand,
            burned: 0.0,
        }
    }
}

impl Agent for Reactor {
    fn core(&self) -> &AgentCore {
        &self.core
    }

    fn handle_begin_step(&mut self, ctx: &mut StepContext<'_>) -> AgentResult<()> {
        let market = ctx
            .directory
            .market_for(self.fuel)
            .ok_or_else(|| rf_agent::AgentError::Behavior("no fuel market".into()))?;
        ctx.send(Message::request(
            ctx.agent(),
            self.fuel,
            self.demand,
            Route::direct(market),
        ));
        Ok(())
    }

    fn handle_end_step(&mut self, _ctx: &mut StepContext<'_>) -> AgentResult<()> {
        Ok(())
    }

    fn receive_message(&mut self, msg: Message, _ctx: &mut StepContext<'_>) -> AgentResult<()> {
        if let Some(cargo) = msg.cargo {
            self.burned += cargo.quantity;
        }
        Ok(())
    }

    fn clone_fresh(&self) -> Box<dyn Agent> {
        Box::new(Self {
            core:   self.core.fresh_clone(),
            fuel:   self.fuel,
            demand: self.demand,
            burned: 0.0,
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ── Console observer ──────────────────────────────────────────────────────────

#[derive(Default)]
struct Console {
    reactors: Vec<AgentId>,
    total_traded: f64,
}

impl SimObserver for Console {
    fn on_agent_built(&mut self, agent: AgentId, step: Step) {
        println!("{step}  built       {agent}");
        self.reactors.push(agent);
    }

    fn on_transactions(&mut self, _step: Step, txns: &[Transaction]) {
        for t in txns {
            println!("{}  match       {t}", t.step);
            self.total_traded += t.quantity;
        }
    }

    fn on_decommission(&mut self, agent: AgentId, step: Step) {
        println!("{step}  retired     {agent}");
    }

    fn on_step_end(&mut self, step: Step, summary: &StepSummary) {
        println!(
            "{step}  summary     {} ticked, {} delivered, {} matched",
            summary.ticked, summary.messages_delivered, summary.transactions
        );
    }

    fn on_sim_end(&mut self, final_step: Step) {
        println!("done at {final_step}: {:.1} units traded in total", self.total_traded);
    }
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let mut b = SimBuilder::new(SimConfig { total_steps: SIM_STEPS });
    let natural_u = b.commodity("natural_u");
    let fuel = b.commodity("fuel");

    let usa = b.institution("usa", Box::new(Region::new()))?;
    b.market("natural_u_market", usa, natural_u, Box::new(CommodityMarket::new()))?;
    b.market("fuel_market", usa, fuel, Box::new(CommodityMarket::new()))?;

    b.facility("mine", usa, Box::new(Mine::new(natural_u, MINE_CAPACITY)))?;
    let enricher = b.facility(
        "enricher",
        usa,
        Box::new(Enricher::new(natural_u, fuel, ENRICHER_THROUGHPUT)),
    )?;

    let mut prototypes = PrototypeSet::new();
    prototypes.insert_prototype("reactor", Box::new(Reactor::prototype(fuel, REACTOR_DEMAND)))?;
    b.prototypes(prototypes);
    b.deployments(load_deployments_reader(Cursor::new(SCHEDULE_CSV))?);

    let mut sim = b.build()?;
    let mut console = Console::default();
    sim.run(&mut console)?;

    // Final material accounting from the surviving agent state.
    let stock = sim
        .registry
        .get(enricher)
        .and_then(|a| a.as_any().downcast_ref::<Enricher>())
        .map_or(0.0, |e| e.stock);
    println!("enricher stock at shutdown: {stock:.1}");
    for id in &console.reactors {
        if let Some(r) = sim.registry.get(*id).and_then(|a| a.as_any().downcast_ref::<Reactor>()) {
            println!("{id} burned {:.1}", r.burned);
        }
    }
    Ok(())
}

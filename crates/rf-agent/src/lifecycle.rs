//! Lifecycle bookkeeping: per-agent state, the name/market directory, and
//! registration.
//!
//! The directory is the single owner of every agent's lifecycle timestamps.
//! Agents never mutate their own window; callbacks only *request* changes
//! through `StepContext`, and the scheduler applies them here.

use std::fmt;

use rustc_hash::FxHashMap;
use thiserror::Error;

use rf_core::{AgentId, CommodityId, Step};

use crate::AgentKind;

// ── LifecycleState ────────────────────────────────────────────────────────────

/// `Unbuilt → Live → Decommissioned`, strictly forward.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LifecycleState {
    /// Registered with a future build step; not yet scheduled.
    Unbuilt,
    Live,
    /// Terminal.  Never re-registered; messages to it dead-letter.
    Decommissioned,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LifecycleState::Unbuilt => "unbuilt",
            LifecycleState::Live => "live",
            LifecycleState::Decommissioned => "decommissioned",
        };
        f.write_str(s)
    }
}

// ── RegistrationError ─────────────────────────────────────────────────────────

/// Duplicate identity at registration time.  Fatal to constructing that
/// agent; surfaced synchronously to whoever triggered construction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("an agent named {name:?} already exists in institution scope {institution}")]
    DuplicateName { institution: AgentId, name: String },

    #[error("commodity {commodity} already has market {existing}")]
    DuplicateMarket {
        commodity: CommodityId,
        existing: AgentId,
    },
}

// ── AgentEntry ────────────────────────────────────────────────────────────────

/// One agent's directory record.
#[derive(Clone, Debug)]
pub struct AgentEntry {
    pub name: String,
    pub kind: AgentKind,
    /// Owning institution — a back-reference, never ownership.
    /// `AgentId::INVALID` marks the root scope.
    pub institution: AgentId,
    pub build_step: Step,
    /// Scheduled teardown step; `None` for an unbounded lifetime with no
    /// forced date.
    pub decommission_step: Option<Step>,
    pub state: LifecycleState,
}

// ── AgentDirectory ────────────────────────────────────────────────────────────

/// Registry metadata for every agent ever registered, live or not.
///
/// `AgentId`s are vec indices handed out in registration order, so ascending
/// id iteration is the deterministic order every ordering-sensitive pass
/// uses.  Slots are never reused.
#[derive(Default, Debug)]
pub struct AgentDirectory {
    entries: Vec<AgentEntry>,
    by_name: FxHashMap<(AgentId, String), AgentId>,
    /// Commodity markets in registration order.
    markets: Vec<(CommodityId, AgentId)>,
    market_by_commodity: FxHashMap<CommodityId, AgentId>,
}

impl AgentDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new agent record; its id is the next index.
    pub fn register(&mut self, entry: AgentEntry) -> Result<AgentId, RegistrationError> {
        let key = (entry.institution, entry.name.clone());
        if self.by_name.contains_key(&key) {
            return Err(RegistrationError::DuplicateName {
                institution: entry.institution,
                name: entry.name,
            });
        }
        let id = AgentId(self.entries.len() as u32);
        self.by_name.insert(key, id);
        self.entries.push(entry);
        Ok(id)
    }

    /// Bind `market` as the resolver target for `commodity`.
    pub fn register_market(
        &mut self,
        commodity: CommodityId,
        market: AgentId,
    ) -> Result<(), RegistrationError> {
        if let Some(&existing) = self.market_by_commodity.get(&commodity) {
            return Err(RegistrationError::DuplicateMarket {
                commodity,
                existing,
            });
        }
        self.market_by_commodity.insert(commodity, market);
        self.markets.push((commodity, market));
        Ok(())
    }

    // ── Lookups ───────────────────────────────────────────────────────────

    pub fn entry(&self, id: AgentId) -> Option<&AgentEntry> {
        self.entries.get(id.index())
    }

    pub fn entry_mut(&mut self, id: AgentId) -> Option<&mut AgentEntry> {
        self.entries.get_mut(id.index())
    }

    /// Find an agent by name within an institution scope.
    pub fn lookup(&self, institution: AgentId, name: &str) -> Option<AgentId> {
        self.by_name.get(&(institution, name.to_owned())).copied()
    }

    /// The market responsible for `commodity`.
    pub fn market_for(&self, commodity: CommodityId) -> Option<AgentId> {
        self.market_by_commodity.get(&commodity).copied()
    }

    /// All `(commodity, market)` bindings in registration order — the order
    /// resolution visits them.
    pub fn markets(&self) -> &[(CommodityId, AgentId)] {
        &self.markets
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.entries.len() as u32).map(AgentId)
    }

    // ── Liveness ──────────────────────────────────────────────────────────

    /// The lifetime invariant: live iff state is `Live` and
    /// `build_step <= now < decommission_step` (no upper bound if unbounded).
    pub fn is_live(&self, id: AgentId, now: Step) -> bool {
        match self.entry(id) {
            None => false,
            Some(e) => {
                e.state == LifecycleState::Live
                    && e.build_step <= now
                    && e.decommission_step.is_none_or(|d| now < d)
            }
        }
    }

    /// Snapshot of all live agents at `now`, ascending id.
    pub fn live_at(&self, now: Step) -> Vec<AgentId> {
        self.ids().filter(|&id| self.is_live(id, now)).collect()
    }

    // ── Transitions (scheduler-only call sites) ───────────────────────────

    /// `Unbuilt → Live` at the agent's build step.
    pub fn make_live(&mut self, id: AgentId) {
        if let Some(e) = self.entry_mut(id) {
            debug_assert_eq!(e.state, LifecycleState::Unbuilt);
            e.state = LifecycleState::Live;
        }
    }

    /// `Live → Decommissioned` (terminal).
    pub fn mark_decommissioned(&mut self, id: AgentId, now: Step) {
        if let Some(e) = self.entry_mut(id) {
            e.state = LifecycleState::Decommissioned;
            // The window closes now even if the scheduled date was later.
            match e.decommission_step {
                Some(d) if d <= now => {}
                _ => e.decommission_step = Some(now),
            }
        }
    }

    /// Externally force a decommission date, keeping any earlier one.
    pub fn force_decommission_step(&mut self, id: AgentId, at: Step) {
        if let Some(e) = self.entry_mut(id) {
            e.decommission_step = Some(match e.decommission_step {
                Some(d) => d.min(at),
                None => at,
            });
        }
    }
}

//! The live-agent registry: boxed agents plus their directory records.
//!
//! The registry (via the scheduler) is the *only* owner of agent boxes and
//! lifecycle timestamps.  During a callback the running agent's box is taken
//! out of its slot, so no callback can ever alias the registry it is being
//! called from; the box goes back the moment the callback returns.

use rf_agent::{Agent, AgentDirectory, AgentEntry, RegistrationError};
use rf_core::AgentId;

/// Agent storage indexed by `AgentId`.
///
/// Slots are append-only and never reused; a decommissioned agent keeps its
/// slot (and name) so late messages can be recognized and dead-lettered.
#[derive(Default)]
pub struct AgentRegistry {
    slots: Vec<Option<Box<dyn Agent>>>,
    pub directory: AgentDirectory,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `agent` under `entry`; the new id is the next slot index.
    pub fn register(
        &mut self,
        agent: Box<dyn Agent>,
        entry: AgentEntry,
    ) -> Result<AgentId, RegistrationError> {
        debug_assert_eq!(self.slots.len(), self.directory.len());
        let id = self.directory.register(entry)?;
        self.slots.push(Some(agent));
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Shared access to one agent (condition checks, inspection).
    pub fn get(&self, id: AgentId) -> Option<&dyn Agent> {
        self.slots.get(id.index())?.as_deref()
    }

    /// Exclusive access to one agent (teardown, institution reports).
    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut dyn Agent> {
        match self.slots.get_mut(id.index())? {
            Some(agent) => Some(agent.as_mut()),
            None => None,
        }
    }

    /// All registered agents, ascending id.  Vacant slots (the one agent
    /// currently executing a callback) are skipped.
    pub fn iter(&self) -> impl Iterator<Item = (AgentId, &dyn Agent)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_deref().map(|a| (AgentId(i as u32), a)))
    }

    // ── Callback plumbing (scheduler only) ────────────────────────────────

    /// Take the agent out of its slot for the duration of a callback.
    pub(crate) fn take(&mut self, id: AgentId) -> Option<Box<dyn Agent>> {
        self.slots.get_mut(id.index())?.take()
    }

    /// Return a taken agent to its slot.
    pub(crate) fn put_back(&mut self, id: AgentId, agent: Box<dyn Agent>) {
        let slot = &mut self.slots[id.index()];
        debug_assert!(slot.is_none(), "slot {id} not vacant");
        *slot = Some(agent);
    }
}

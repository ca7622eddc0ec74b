//! Prototype construction and the registration-time type factory.
//!
//! There is no dynamic loading of agent implementations.  Third-party agent
//! types register a plain constructor function under a type identifier at
//! process startup; the input deck then names `(type, prototype)` pairs, the
//! factory builds one fully-initialized prototype per pair, and every
//! deployed agent is stamped from its prototype via the two-phase clone.

use rustc_hash::FxHashMap;

use crate::{Agent, AgentCore, AgentError, AgentResult};

// ── AgentConfig ───────────────────────────────────────────────────────────────

/// The opaque configuration handle handed to a type constructor.
///
/// The kernel fills `core` from deck scalars it understands (commodities,
/// lifetime) and passes `params` through untouched — interpreting them is
/// the constructor's business.
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// Registered agent-type identifier naming the constructor.
    pub agent_type: String,
    /// Core fields; `core.prototype` is the prototype's name.
    pub core: AgentCore,
    /// Type-specific key/value settings, uninterpreted by the kernel.
    pub params: FxHashMap<String, String>,
}

impl AgentConfig {
    pub fn new(agent_type: impl Into<String>, core: AgentCore) -> Self {
        Self {
            agent_type: agent_type.into(),
            core,
            params: FxHashMap::default(),
        }
    }
}

/// A registered agent-type constructor: configuration in, prototype out.
pub type PrototypeCtor = fn(&AgentConfig) -> AgentResult<Box<dyn Agent>>;

// ── PrototypeSet ──────────────────────────────────────────────────────────────

/// Type constructors plus the fully-initialized prototypes built from them.
///
/// Owned by the simulation context, not a global — one set per run.
#[derive(Default)]
pub struct PrototypeSet {
    ctors: FxHashMap<String, PrototypeCtor>,
    prototypes: FxHashMap<String, Box<dyn Agent>>,
}

impl PrototypeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor for `agent_type`.  Later registrations under
    /// the same identifier replace earlier ones.
    pub fn register_type(&mut self, agent_type: impl Into<String>, ctor: PrototypeCtor) {
        self.ctors.insert(agent_type.into(), ctor);
    }

    /// Build a prototype from `config` using its type's constructor and file
    /// it under `config.core.prototype`.
    pub fn build_prototype(&mut self, config: &AgentConfig) -> AgentResult<()> {
        let ctor = self
            .ctors
            .get(config.agent_type.as_str())
            .ok_or_else(|| AgentError::UnknownAgentType(config.agent_type.clone()))?;
        let proto = ctor(config)?;
        self.insert_prototype(config.core.prototype.clone(), proto)
    }

    /// File an already-constructed prototype directly (host code, tests).
    pub fn insert_prototype(
        &mut self,
        name: impl Into<String>,
        proto: Box<dyn Agent>,
    ) -> AgentResult<()> {
        let name = name.into();
        if self.prototypes.contains_key(&name) {
            return Err(AgentError::DuplicatePrototype(name));
        }
        self.prototypes.insert(name, proto);
        Ok(())
    }

    /// Stamp a fresh agent from the named prototype.
    ///
    /// The clone's configuration equals the prototype's; its runtime state is
    /// freshly initialized.  The prototype itself is untouched.
    pub fn clone_prototype(&self, name: &str) -> AgentResult<Box<dyn Agent>> {
        self.prototypes
            .get(name)
            .map(|p| p.clone_fresh())
            .ok_or_else(|| AgentError::UnknownPrototype(name.to_owned()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.prototypes.contains_key(name)
    }

    /// Read access to a filed prototype (inspection, tests).
    pub fn get(&self, name: &str) -> Option<&dyn Agent> {
        self.prototypes.get(name).map(Box::as_ref)
    }
}

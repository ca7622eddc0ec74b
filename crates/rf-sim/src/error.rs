use std::fmt;

use thiserror::Error;

use rf_agent::{AgentError, RegistrationError};
use rf_core::{AgentId, CommodityId};

/// Where in the step loop a fault surfaced.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Phase {
    Build,
    BeginStep,
    Resolution,
    EndStep,
    Sweep,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Build => "build",
            Phase::BeginStep => "begin-step",
            Phase::Resolution => "resolution",
            Phase::EndStep => "end-step",
            Phase::Sweep => "sweep",
        };
        f.write_str(s)
    }
}

/// Errors surfaced by construction and by `advance`.
#[derive(Debug, Error)]
pub enum SimError {
    /// The external validator rejected the input document; carries its
    /// human-readable reason.  Fatal to starting the run.
    #[error("configuration rejected: {0}")]
    Config(String),

    /// Duplicate agent identity at registration.  Fatal to constructing
    /// that agent, surfaced synchronously to the caller.
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error("unknown prototype {0:?}")]
    UnknownPrototype(String),

    #[error("unknown institution {0:?}")]
    UnknownInstitution(String),

    #[error("no market registered for commodity {0}")]
    MissingMarket(CommodityId),

    #[error("deployment parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An uncaught error from an agent callback.  The current step is
    /// abandoned; the kernel never retries — transactions committed in
    /// completed steps stay intact, and retry policy belongs to the host.
    #[error("agent {agent:?} ({id}) faulted during {phase}: {source}")]
    Fault {
        agent: String,
        id: AgentId,
        phase: Phase,
        #[source]
        source: AgentError,
    },
}

pub type SimResult<T> = Result<T, SimError>;

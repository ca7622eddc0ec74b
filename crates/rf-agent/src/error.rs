use thiserror::Error;

use rf_core::CoreError;
use rf_message::DeliveryError;

/// What an agent implementation may raise from a phase callback or the
/// factory may raise while constructing prototypes.  The scheduler wraps
/// callback failures into its fault type with agent and phase attached.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("unknown agent type {0:?}")]
    UnknownAgentType(String),

    #[error("unknown prototype {0:?}")]
    UnknownPrototype(String),

    #[error("prototype {0:?} already defined")]
    DuplicatePrototype(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    /// Model-specific failure with a human-readable description.
    #[error("{0}")]
    Behavior(String),
}

pub type AgentResult<T> = Result<T, AgentError>;

use rf_core::AgentId;
use thiserror::Error;

/// Delivery failures.  All of these are recoverable at the sender's
/// discretion; the scheduler reports them back to the sending agent instead
/// of crashing the step.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("recipient {0} is decommissioned")]
    DeadRecipient(AgentId),

    #[error("recipient {0} is not built yet")]
    UnbuiltRecipient(AgentId),

    #[error("recipient {0} is not registered")]
    UnknownRecipient(AgentId),

    #[error("route ended at {terminal} without the message being consumed")]
    ExhaustedRoute { terminal: AgentId },

    #[error("a route must have at least one hop")]
    EmptyRoute,
}

pub type DeliveryResult<T> = Result<T, DeliveryError>;

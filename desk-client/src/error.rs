//! Client error types

use shared::OrderStatus;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Named step of the accept-and-prepare pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStep {
    /// Read the active restaurant from the session
    ResolveRestaurant,
    /// Fetch the restaurant's pickup location
    LookupLocation,
    /// Tell the backend the order was accepted at that location
    NotifyAcceptance,
    /// Move the order to PREPARING
    SetPreparing,
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStep::ResolveRestaurant => write!(f, "resolve restaurant"),
            PipelineStep::LookupLocation => write!(f, "lookup location"),
            PipelineStep::NotifyAcceptance => write!(f, "notify acceptance"),
            PipelineStep::SetPreparing => write!(f, "set preparing"),
        }
    }
}

/// Client error type
#[derive(Debug, Error)]
pub enum DeskError {
    /// A required identifier is missing (no session, no active restaurant)
    #[error("Lookup failed: {0}")]
    Lookup(String),

    /// Transport failure or non-success backend response
    #[error("Network error: {0}")]
    Network(String),

    /// Referenced entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request exceeded the configured timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Response body did not match the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Requested status would move the order backward
    #[error("Order {order_id} cannot move from {from} to {to}")]
    InvalidTransition {
        order_id: String,
        from: OrderStatus,
        to: OrderStatus,
    },

    /// Accept-and-prepare failed at a named step
    #[error("Accept and prepare failed at {step}: {source}")]
    Pipeline {
        step: PipelineStep,
        #[source]
        source: Box<DeskError>,
    },

    /// Session persistence failure
    #[error("Session error: {0}")]
    Session(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DeskError {
    /// Tag this error with the pipeline step it came from
    pub fn at(self, step: PipelineStep) -> Self {
        DeskError::Pipeline {
            step,
            source: Box::new(self),
        }
    }

    /// The underlying error, looking through pipeline wrappers
    pub fn root(&self) -> &DeskError {
        match self {
            DeskError::Pipeline { source, .. } => source.root(),
            other => other,
        }
    }

    /// Pipeline step that failed, if any
    pub fn step(&self) -> Option<PipelineStep> {
        match self {
            DeskError::Pipeline { step, .. } => Some(*step),
            _ => None,
        }
    }

    pub fn is_lookup(&self) -> bool {
        matches!(self.root(), DeskError::Lookup(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), DeskError::NotFound(_))
    }
}

impl From<std::io::Error> for DeskError {
    fn from(e: std::io::Error) -> Self {
        DeskError::Session(e.to_string())
    }
}

/// Result type for client operations
pub type DeskResult<T> = Result<T, DeskError>;

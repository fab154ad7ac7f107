//! Error types for the frame/hybrid framework

use thiserror::Error;

/// Main error type for FEA operations
#[derive(Error, Debug)]
pub enum FEAError {
    #[error("Node {0} not found in model")]
    NodeNotFound(usize),

    #[error("Element {0} not found in model")]
    ElementNotFound(usize),

    #[error("Duplicate tag {0} already exists")]
    DuplicateTag(usize),

    #[error("Element has zero length between nodes {i_node} and {j_node}")]
    ZeroLength { i_node: usize, j_node: usize },

    #[error("Vector defining the local x-z plane is parallel to the local x axis")]
    DegenerateAxis,

    #[error("Degree-of-freedom mismatch: {0}")]
    DofMismatch(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Singular stiffness matrix - model may be unstable or have insufficient supports")]
    SingularMatrix,

    #[error("Convergence failed after {0} iterations")]
    ConvergenceFailed(usize),

    #[error("Size negotiation with remote peer failed: {0}")]
    Negotiation(String),

    #[error("Protocol violation: expected {expected}, received action code {received}")]
    Protocol { expected: &'static str, received: f64 },

    #[error("Negotiated buffer layout does not provide {0}")]
    LayoutMismatch(&'static str),

    #[error("Remote link is faulted and can no longer be used")]
    LinkFaulted,

    #[error("Remote peer terminated the simulation")]
    SimulationTerminated,

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Channel error: {0}")]
    Channel(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl FEAError {
    /// Errors after which the affected component must not be used again.
    ///
    /// A desynchronized remote actuator cannot be resynchronized, so every
    /// link-level failure lands here; the outermost driver decides how to stop.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            FEAError::Negotiation(_)
                | FEAError::Protocol { .. }
                | FEAError::LayoutMismatch(_)
                | FEAError::LinkFaulted
                | FEAError::Channel(_)
                | FEAError::IoError(_)
        )
    }

    /// Refusals that callers should log and carry on from.
    pub fn is_informational(&self) -> bool {
        matches!(self, FEAError::Unsupported(_))
    }
}

/// Result type for FEA operations
pub type FEAResult<T> = Result<T, FEAError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(FEAError::LinkFaulted.is_fatal());
        assert!(FEAError::Protocol { expected: "getForce", received: 7.0 }.is_fatal());
        assert!(!FEAError::SimulationTerminated.is_fatal());
        assert!(FEAError::Unsupported("revert".into()).is_informational());
        assert!(!FEAError::DegenerateAxis.is_informational());
    }
}

/// Errors from constructing or looking up shared value types.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TypesError {
    #[error("unknown tolerance profile '{name}'. Available: {available}")]
    UnknownProfile { name: String, available: String },

    #[error("invalid gear geometry: {reason}")]
    InvalidGeometry { reason: String },
}

/// Convenience result type used across chromaplane.
pub type ChromaplaneResult<T> = Result<T, ChromaplaneError>;

/// Top-level error taxonomy used by buffer, canvas, and conversion APIs.
#[derive(thiserror::Error, Debug)]
pub enum ChromaplaneError {
    /// The backing allocator rejected or could not satisfy the requested
    /// geometry/format.
    #[error("allocation error: {0}")]
    Allocation(String),

    /// A backing pool could not be constructed for the given descriptor.
    #[error("pool creation error: {0}")]
    PoolCreation(String),

    /// Buffer memory could not be locked for read/write access.
    #[error("lock error: {0}")]
    Lock(String),

    /// A drawing surface could not bind to the buffer's memory layout.
    #[error("context creation error: {0}")]
    ContextCreation(String),

    /// Invalid user-provided parameters.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ChromaplaneError {
    /// Build a [`ChromaplaneError::Allocation`] value.
    pub fn allocation(msg: impl Into<String>) -> Self {
        Self::Allocation(msg.into())
    }

    /// Build a [`ChromaplaneError::PoolCreation`] value.
    pub fn pool_creation(msg: impl Into<String>) -> Self {
        Self::PoolCreation(msg.into())
    }

    /// Build a [`ChromaplaneError::Lock`] value.
    pub fn lock(msg: impl Into<String>) -> Self {
        Self::Lock(msg.into())
    }

    /// Build a [`ChromaplaneError::ContextCreation`] value.
    pub fn context_creation(msg: impl Into<String>) -> Self {
        Self::ContextCreation(msg.into())
    }

    /// Build a [`ChromaplaneError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

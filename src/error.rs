//! error.rs
//! Defines configuration errors and the verbose consume error/result types.

use crate::types::Uint;

/// Rejected bucket configuration.
///
/// Returned when building a [`TokenBucket`](crate::TokenBucket) or when
/// reconfiguring one at runtime.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Capacity must hold at least one token.
    #[error("capacity must be greater than 0")]
    ZeroCapacity,
    /// Fill rate must be a finite number greater than zero.
    #[error("fill rate must be a finite number greater than 0, got {0}")]
    InvalidFillRate(f64),
    /// A bare `consume()` has to request at least one token.
    #[error("default consumption rate must be greater than 0")]
    ZeroConsumptionRate,
}

/// Reason a consume request was denied. Carries diagnostic information.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConsumeError {
    /// Not enough tokens have accrued yet.
    #[error("insufficient tokens: tried to consume {acquiring}, available {available}")]
    InsufficientTokens {
        acquiring: Uint,
        available: Uint,
    },
    /// Request permanently exceeds the configured capacity.
    #[error(
        "request exceeds maximum capacity: tried to consume {acquiring}, capacity {capacity}. This request cannot succeed"
    )]
    BeyondCapacity {
        acquiring: Uint,
        capacity: Uint,
    },
}

/// Result type for bucket construction and reconfiguration.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for verbose consumption.
pub type ConsumeResult = Result<(), ConsumeError>;

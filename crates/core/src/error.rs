//! Domain error taxonomy.
//!
//! Every failure a handler can surface maps to exactly one variant here so
//! the HTTP layer can render a distinct, actionable error code for each.
//! None of these are retried inside the core; [`CoreError::TransientStore`]
//! is the only variant a caller should consider retrying.

/// Domain-level error shared across all crates.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An entity addressed by id does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// Input failed domain validation (bad quantity, unknown rarity, ...).
    #[error("{0}")]
    Validation(String),

    /// A uniqueness constraint would be violated.
    #[error("{0}")]
    Conflict(String),

    /// A transfer requested more than the source line holds.
    #[error("insufficient quantity: requested {requested}, available {available}")]
    InsufficientQuantity { requested: i64, available: i64 },

    /// A buy-order response requires stock the responder does not hold.
    #[error("{0}")]
    InsufficientStock(String),

    /// A transfer addressed the source owner as the recipient.
    #[error("{0}")]
    InvalidRecipient(String),

    /// A buy order was already completed; no second credit is issued.
    #[error("{0}")]
    AlreadyCompleted(String),

    /// The request carried no valid identity.
    #[error("{0}")]
    Unauthorized(String),

    /// The identity is valid but lacks the required role.
    #[error("{0}")]
    Forbidden(String),

    /// The store timed out or dropped the connection; safe to retry.
    #[error("{0}")]
    TransientStore(String),

    /// An invariant was violated; details are logged, not exposed.
    #[error("{0}")]
    Internal(String),
}

impl CoreError {
    /// Convenience constructor for the common not-found case.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        CoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

//! Status value constants for state-machine columns.
//!
//! Stored as TEXT with CHECK constraints; these constants are the single
//! source of the legal spellings.

/// `guild_memberships.status` values.
pub mod membership_status {
    pub const PENDING: &str = "pending";
    pub const ACTIVE: &str = "active";
}

/// `characters.status` values.
pub mod character_status {
    pub const ACTIVE: &str = "active";
    pub const INACTIVE: &str = "inactive";
}

/// `buy_orders.status` values.
///
/// Legal transitions: open -> pending -> completed, with cancelled
/// reachable from open or pending.
pub mod order_status {
    pub const OPEN: &str = "open";
    pub const PENDING: &str = "pending";
    pub const COMPLETED: &str = "completed";
    pub const CANCELLED: &str = "cancelled";
}

/// `buy_order_responses.status` values.
pub mod response_status {
    pub const PENDING: &str = "pending";
    pub const ACCEPTED: &str = "accepted";
    pub const REJECTED: &str = "rejected";
}

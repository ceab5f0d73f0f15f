//! Well-known membership role name constants.
//!
//! These must match the CHECK constraint on `guild_memberships.role` in
//! `0001_schema.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MEMBER: &str = "member";

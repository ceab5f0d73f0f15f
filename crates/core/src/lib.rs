//! Domain logic for the guild management platform.
//!
//! This crate has zero I/O dependencies so the same rules (rarity ordering,
//! equipment slot handling, audit action rendering) can be used by the API
//! layer, tests, and any future CLI tooling.

pub mod audit;
pub mod classes;
pub mod equipment;
pub mod error;
pub mod rarity;
pub mod roles;
pub mod skills;
pub mod status;
pub mod types;

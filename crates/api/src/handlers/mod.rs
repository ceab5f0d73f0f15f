//! HTTP handlers, one module per resource. Handlers stay thin: extract,
//! delegate to a service or repository, wrap in the response envelope.

pub mod audit;
pub mod catalog;
pub mod characters;
pub mod guilds;
pub mod inventory;
pub mod orders;
pub mod points;

//! Repository layer: one unit struct per table with static query methods.
//!
//! Methods that participate in multi-step transactions take a
//! `&mut PgConnection` so callers can compose them under one `pool.begin()`.

pub mod audit_repo;
pub mod buy_order_repo;
pub mod catalog_repo;
pub mod character_repo;
pub mod guild_repo;
pub mod inventory_repo;
pub mod membership_repo;
pub mod points_repo;

pub use audit_repo::AuditLogRepo;
pub use buy_order_repo::{BuyOrderRepo, BuyOrderResponseRepo};
pub use catalog_repo::CatalogRepo;
pub use character_repo::CharacterRepo;
pub use guild_repo::GuildRepo;
pub use inventory_repo::InventoryRepo;
pub use membership_repo::MembershipRepo;
pub use points_repo::PointsRepo;

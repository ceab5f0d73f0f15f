//! Entity models and DTOs, one module per table.

pub mod audit;
pub mod buy_order;
pub mod catalog;
pub mod character;
pub mod guild;
pub mod inventory;
pub mod membership;
pub mod points;

//! Typed audit actions.
//!
//! Audit rows persist an `action_type` string plus opaque `old_data` /
//! `new_data` JSON snapshots. This module gives each action type its own
//! variant with a strongly-typed payload and a [`AuditAction::describe`]
//! renderer, replacing per-action-type string dispatch at the read side.
//!
//! Equipment changes deliberately have no action type here: loadout edits
//! are not part of the tracked audit surface.

use serde::{Deserialize, Serialize};

/// Action type spellings as stored in `audit_logs.action_type`.
pub mod action_types {
    pub const CHARACTER_UPDATE: &str = "CHARACTER_UPDATE";
    pub const CHARACTER_DELETE: &str = "CHARACTER_DELETE";
    pub const INVENTORY_ADD: &str = "INVENTORY_ADD";
    pub const INVENTORY_REMOVE: &str = "INVENTORY_REMOVE";
    pub const STATUS_UPDATE: &str = "STATUS_UPDATE";
    pub const ROLE_UPDATE: &str = "ROLE_UPDATE";
    pub const INVENTORY_TRANSFER: &str = "INVENTORY_TRANSFER";
    pub const ORDER_COMPLETED: &str = "ORDER_COMPLETED";
}

/// Every tracked action type, in filter display order.
pub const ALL_ACTION_TYPES: [&str; 8] = [
    action_types::CHARACTER_UPDATE,
    action_types::CHARACTER_DELETE,
    action_types::INVENTORY_ADD,
    action_types::INVENTORY_REMOVE,
    action_types::STATUS_UPDATE,
    action_types::ROLE_UPDATE,
    action_types::INVENTORY_TRANSFER,
    action_types::ORDER_COMPLETED,
];

// ---------------------------------------------------------------------------
// Snapshot payloads
// ---------------------------------------------------------------------------

/// Old/new payload for `CHARACTER_UPDATE` and old payload for
/// `CHARACTER_DELETE`. Carries the full persisted character JSON alongside
/// the name so the entry stays renderable after the row is gone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterSnapshot {
    pub character_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub membership_removed: Option<bool>,
    #[serde(flatten)]
    pub rest: serde_json::Map<String, serde_json::Value>,
}

/// Payload for `INVENTORY_ADD` / `INVENTORY_REMOVE`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryLine {
    pub item_name: String,
    pub rarity: String,
    pub quantity: i64,
}

/// Payload for `STATUS_UPDATE` (both sides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChange {
    pub character_name: String,
    pub status: String,
}

/// Payload for `ROLE_UPDATE` (both sides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleChange {
    pub character_name: String,
    pub role: String,
}

/// Old-side payload for `INVENTORY_TRANSFER`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferSource {
    pub item_name: String,
    pub rarity: String,
    pub quantity: i64,
    pub from_character_name: String,
}

/// New-side payload for `INVENTORY_TRANSFER`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRecipient {
    pub to_character_name: String,
    pub quantity: i64,
}

/// Old-side payload for `ORDER_COMPLETED`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderFill {
    pub item_name: String,
    pub rarity: String,
    pub quantity: i64,
    pub points_reward: i64,
    pub from_character_name: String,
}

/// New-side payload for `ORDER_COMPLETED`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecipient {
    pub to_character_name: String,
}

// ---------------------------------------------------------------------------
// The action variant
// ---------------------------------------------------------------------------

/// A fully-typed audit action, one variant per tracked action type.
#[derive(Debug, Clone)]
pub enum AuditAction {
    CharacterUpdate {
        old: CharacterSnapshot,
        new: CharacterSnapshot,
    },
    CharacterDelete {
        old: CharacterSnapshot,
    },
    InventoryAdd {
        new: InventoryLine,
    },
    InventoryRemove {
        old: InventoryLine,
    },
    StatusUpdate {
        old: StatusChange,
        new: StatusChange,
    },
    RoleUpdate {
        old: RoleChange,
        new: RoleChange,
    },
    InventoryTransfer {
        old: TransferSource,
        new: TransferRecipient,
    },
    OrderCompleted {
        old: OrderFill,
        new: OrderRecipient,
    },
}

impl AuditAction {
    /// The `action_type` column value for this variant.
    pub fn action_type(&self) -> &'static str {
        match self {
            AuditAction::CharacterUpdate { .. } => action_types::CHARACTER_UPDATE,
            AuditAction::CharacterDelete { .. } => action_types::CHARACTER_DELETE,
            AuditAction::InventoryAdd { .. } => action_types::INVENTORY_ADD,
            AuditAction::InventoryRemove { .. } => action_types::INVENTORY_REMOVE,
            AuditAction::StatusUpdate { .. } => action_types::STATUS_UPDATE,
            AuditAction::RoleUpdate { .. } => action_types::ROLE_UPDATE,
            AuditAction::InventoryTransfer { .. } => action_types::INVENTORY_TRANSFER,
            AuditAction::OrderCompleted { .. } => action_types::ORDER_COMPLETED,
        }
    }

    /// The `old_data` snapshot for this action, if the action has one.
    pub fn old_data(&self) -> Option<serde_json::Value> {
        match self {
            AuditAction::CharacterUpdate { old, .. } => serde_json::to_value(old).ok(),
            AuditAction::CharacterDelete { old } => serde_json::to_value(old).ok(),
            AuditAction::InventoryAdd { .. } => None,
            AuditAction::InventoryRemove { old } => serde_json::to_value(old).ok(),
            AuditAction::StatusUpdate { old, .. } => serde_json::to_value(old).ok(),
            AuditAction::RoleUpdate { old, .. } => serde_json::to_value(old).ok(),
            AuditAction::InventoryTransfer { old, .. } => serde_json::to_value(old).ok(),
            AuditAction::OrderCompleted { old, .. } => serde_json::to_value(old).ok(),
        }
    }

    /// The `new_data` snapshot for this action, if the action has one.
    pub fn new_data(&self) -> Option<serde_json::Value> {
        match self {
            AuditAction::CharacterUpdate { new, .. } => serde_json::to_value(new).ok(),
            AuditAction::CharacterDelete { .. } => None,
            AuditAction::InventoryAdd { new } => serde_json::to_value(new).ok(),
            AuditAction::InventoryRemove { .. } => None,
            AuditAction::StatusUpdate { new, .. } => serde_json::to_value(new).ok(),
            AuditAction::RoleUpdate { new, .. } => serde_json::to_value(new).ok(),
            AuditAction::InventoryTransfer { new, .. } => serde_json::to_value(new).ok(),
            AuditAction::OrderCompleted { new, .. } => serde_json::to_value(new).ok(),
        }
    }

    /// Rebuild the typed action from a persisted row.
    ///
    /// Returns `None` for unknown action types or snapshots that do not
    /// deserialize, so one malformed historical row cannot break a listing.
    pub fn from_row(
        action_type: &str,
        old_data: Option<&serde_json::Value>,
        new_data: Option<&serde_json::Value>,
    ) -> Option<Self> {
        fn parse<T: serde::de::DeserializeOwned>(value: Option<&serde_json::Value>) -> Option<T> {
            serde_json::from_value(value?.clone()).ok()
        }

        match action_type {
            action_types::CHARACTER_UPDATE => Some(AuditAction::CharacterUpdate {
                old: parse(old_data)?,
                new: parse(new_data)?,
            }),
            action_types::CHARACTER_DELETE => Some(AuditAction::CharacterDelete {
                old: parse(old_data)?,
            }),
            action_types::INVENTORY_ADD => Some(AuditAction::InventoryAdd {
                new: parse(new_data)?,
            }),
            action_types::INVENTORY_REMOVE => Some(AuditAction::InventoryRemove {
                old: parse(old_data)?,
            }),
            action_types::STATUS_UPDATE => Some(AuditAction::StatusUpdate {
                old: parse(old_data)?,
                new: parse(new_data)?,
            }),
            action_types::ROLE_UPDATE => Some(AuditAction::RoleUpdate {
                old: parse(old_data)?,
                new: parse(new_data)?,
            }),
            action_types::INVENTORY_TRANSFER => Some(AuditAction::InventoryTransfer {
                old: parse(old_data)?,
                new: parse(new_data)?,
            }),
            action_types::ORDER_COMPLETED => Some(AuditAction::OrderCompleted {
                old: parse(old_data)?,
                new: parse(new_data)?,
            }),
            _ => None,
        }
    }

    /// Human-readable one-line description for log listings.
    pub fn describe(&self) -> String {
        match self {
            AuditAction::CharacterUpdate { old, .. } => {
                format!("Updated {}'s details", old.character_name)
            }
            AuditAction::CharacterDelete { old } => {
                format!("Deleted character {}", old.character_name)
            }
            AuditAction::InventoryAdd { new } => {
                format!("Added {}x {} ({})", new.quantity, new.item_name, new.rarity)
            }
            AuditAction::InventoryRemove { old } => {
                format!("Removed {}x {} ({})", old.quantity, old.item_name, old.rarity)
            }
            AuditAction::StatusUpdate { old, new } => format!(
                "Changed {}'s status from {} to {}",
                old.character_name, old.status, new.status
            ),
            AuditAction::RoleUpdate { old, new } => format!(
                "Changed {}'s role from {} to {}",
                old.character_name, old.role, new.role
            ),
            AuditAction::InventoryTransfer { old, new } => format!(
                "Transferred {}x {} from {} to {}",
                old.quantity, old.item_name, old.from_character_name, new.to_character_name
            ),
            AuditAction::OrderCompleted { old, new } => format!(
                "Completed order: {}x {} from {} to {} for {} points",
                old.quantity,
                old.item_name,
                old.from_character_name,
                new.to_character_name,
                old.points_reward
            ),
        }
    }

    /// The character name affected by this action, when the snapshot
    /// carries one. Used by the name-substring audit filter alongside the
    /// acting user's own character name.
    pub fn affected_character_name(&self) -> Option<&str> {
        match self {
            AuditAction::CharacterUpdate { old, .. } => Some(&old.character_name),
            AuditAction::CharacterDelete { old } => Some(&old.character_name),
            AuditAction::StatusUpdate { old, .. } => Some(&old.character_name),
            AuditAction::RoleUpdate { old, .. } => Some(&old.character_name),
            AuditAction::InventoryTransfer { new, .. } => Some(&new.to_character_name),
            AuditAction::OrderCompleted { new, .. } => Some(&new.to_character_name),
            AuditAction::InventoryAdd { .. } | AuditAction::InventoryRemove { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(name: &str) -> CharacterSnapshot {
        CharacterSnapshot {
            character_name: name.to_string(),
            membership_removed: None,
            rest: serde_json::Map::new(),
        }
    }

    // -----------------------------------------------------------------------
    // describe() rendering
    // -----------------------------------------------------------------------

    #[test]
    fn describes_inventory_add() {
        let action = AuditAction::InventoryAdd {
            new: InventoryLine {
                item_name: "Iron Ore".to_string(),
                rarity: "Common".to_string(),
                quantity: 12,
            },
        };
        assert_eq!(action.describe(), "Added 12x Iron Ore (Common)");
    }

    #[test]
    fn describes_transfer_with_both_names() {
        let action = AuditAction::InventoryTransfer {
            old: TransferSource {
                item_name: "Oak Timber".to_string(),
                rarity: "Rare".to_string(),
                quantity: 3,
                from_character_name: "Aldis".to_string(),
            },
            new: TransferRecipient {
                to_character_name: "Brann".to_string(),
                quantity: 3,
            },
        };
        assert_eq!(
            action.describe(),
            "Transferred 3x Oak Timber from Aldis to Brann"
        );
    }

    #[test]
    fn describes_order_completion_with_reward() {
        let action = AuditAction::OrderCompleted {
            old: OrderFill {
                item_name: "Moonstone".to_string(),
                rarity: "Epic".to_string(),
                quantity: 2,
                points_reward: 100,
                from_character_name: "Cyra".to_string(),
            },
            new: OrderRecipient {
                to_character_name: "Dain".to_string(),
            },
        };
        assert_eq!(
            action.describe(),
            "Completed order: 2x Moonstone from Cyra to Dain for 100 points"
        );
    }

    #[test]
    fn describes_role_and_status_changes() {
        let role = AuditAction::RoleUpdate {
            old: RoleChange {
                character_name: "Aldis".to_string(),
                role: "member".to_string(),
            },
            new: RoleChange {
                character_name: "Aldis".to_string(),
                role: "admin".to_string(),
            },
        };
        assert_eq!(role.describe(), "Changed Aldis's role from member to admin");

        let status = AuditAction::StatusUpdate {
            old: StatusChange {
                character_name: "Brann".to_string(),
                status: "active".to_string(),
            },
            new: StatusChange {
                character_name: "Brann".to_string(),
                status: "inactive".to_string(),
            },
        };
        assert_eq!(
            status.describe(),
            "Changed Brann's status from active to inactive"
        );
    }

    // -----------------------------------------------------------------------
    // Row round-trips
    // -----------------------------------------------------------------------

    #[test]
    fn round_trips_through_snapshots() {
        let action = AuditAction::CharacterDelete {
            old: snapshot("Aldis"),
        };
        let old = action.old_data();
        let new = action.new_data();
        assert!(new.is_none());

        let rebuilt =
            AuditAction::from_row(action.action_type(), old.as_ref(), new.as_ref()).unwrap();
        assert_eq!(rebuilt.describe(), "Deleted character Aldis");
    }

    #[test]
    fn unknown_action_type_yields_none() {
        assert!(AuditAction::from_row("EQUIP_ITEM", None, None).is_none());
    }

    #[test]
    fn malformed_snapshot_yields_none() {
        let bad = serde_json::json!({"unexpected": true});
        assert!(
            AuditAction::from_row(action_types::INVENTORY_ADD, None, Some(&bad)).is_none()
        );
    }

    #[test]
    fn character_snapshot_preserves_extra_fields() {
        let json = serde_json::json!({
            "character_name": "Aldis",
            "type": "gathering",
            "primary_class": "Fighter"
        });
        let snap: CharacterSnapshot = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(snap.character_name, "Aldis");
        assert_eq!(snap.rest["type"], "gathering");
        assert_eq!(serde_json::to_value(&snap).unwrap(), json);
    }

    #[test]
    fn affected_name_follows_action_type() {
        let action = AuditAction::InventoryAdd {
            new: InventoryLine {
                item_name: "Iron Ore".to_string(),
                rarity: "Common".to_string(),
                quantity: 1,
            },
        };
        assert!(action.affected_character_name().is_none());

        let action = AuditAction::CharacterDelete {
            old: snapshot("Aldis"),
        };
        assert_eq!(action.affected_character_name(), Some("Aldis"));
    }
}

//! Equipment slots and the loadout map.
//!
//! The loadout is persisted in `characters.equipment` as a slot-keyed JSON
//! object. Slot keys use the client's camelCase spellings (`mainHand1`,
//! `offHand2`, ...) so existing stored payloads stay readable.
//!
//! The one rule enforced here is the two-handed exclusion: a two-handed
//! weapon equipped into a main-hand slot occupies both hand slots, so the
//! paired main-hand and the corresponding off-hand must be cleared.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Every equippable slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EquipmentSlot {
    Head,
    Chest,
    Forearms,
    Hands,
    Belt,
    Legs,
    Feet,
    Shoulders,
    Back,
    Earring1,
    Earring2,
    Necklace,
    Ring1,
    Ring2,
    MainHand1,
    MainHand2,
    OffHand1,
    OffHand2,
}

/// Snapshot of an equipped item. Denormalized on purpose: the loadout must
/// stay renderable even if the catalog entry changes later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquippedItem {
    pub item_guid: String,
    pub item_name: String,
    pub rarity: String,
    #[serde(default, rename = "isTwoHanded")]
    pub is_two_handed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<BTreeMap<String, f64>>,
}

/// A character's full loadout, keyed by slot.
pub type Equipment = BTreeMap<EquipmentSlot, EquippedItem>;

/// Equip `item` into `slot`, enforcing the two-handed exclusion.
///
/// Two-handed weapons may only occupy main-hand slots; equipping one clears
/// the paired main-hand and the matching off-hand. One-handed items simply
/// replace whatever was in the slot.
pub fn equip(equipment: &mut Equipment, slot: EquipmentSlot, item: EquippedItem) {
    if item.is_two_handed {
        match slot {
            EquipmentSlot::MainHand1 => {
                equipment.remove(&EquipmentSlot::MainHand2);
                equipment.remove(&EquipmentSlot::OffHand1);
            }
            EquipmentSlot::MainHand2 => {
                equipment.remove(&EquipmentSlot::MainHand1);
                equipment.remove(&EquipmentSlot::OffHand2);
            }
            _ => {}
        }
    }
    equipment.insert(slot, item);
}

/// Clear a slot, returning the previously equipped item if any.
pub fn unequip(equipment: &mut Equipment, slot: EquipmentSlot) -> Option<EquippedItem> {
    equipment.remove(&slot)
}

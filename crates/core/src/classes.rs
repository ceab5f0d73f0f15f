//! Character class pairings.
//!
//! Every character has a primary class and one of eight secondary classes
//! determined by that primary. The pairing table mirrors the game's class
//! augment matrix.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The eight primary archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimaryClass {
    Bard,
    Cleric,
    Fighter,
    Mage,
    Ranger,
    Rogue,
    Summoner,
    Tank,
}

pub const ALL_PRIMARY_CLASSES: [PrimaryClass; 8] = [
    PrimaryClass::Bard,
    PrimaryClass::Cleric,
    PrimaryClass::Fighter,
    PrimaryClass::Mage,
    PrimaryClass::Ranger,
    PrimaryClass::Rogue,
    PrimaryClass::Summoner,
    PrimaryClass::Tank,
];

impl PrimaryClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimaryClass::Bard => "Bard",
            PrimaryClass::Cleric => "Cleric",
            PrimaryClass::Fighter => "Fighter",
            PrimaryClass::Mage => "Mage",
            PrimaryClass::Ranger => "Ranger",
            PrimaryClass::Rogue => "Rogue",
            PrimaryClass::Summoner => "Summoner",
            PrimaryClass::Tank => "Tank",
        }
    }

    /// The secondary classes legal for this primary, in display order.
    pub fn secondary_classes(&self) -> &'static [&'static str] {
        match self {
            PrimaryClass::Bard => &[
                "Minstrel", "Scryer", "Bladedancer", "Sorcerer", "Bowsinger", "Charlatan",
                "Enchanter", "Argent",
            ],
            PrimaryClass::Cleric => &[
                "Soul Weaver", "High Priest", "Highsword", "Acolyte", "Soulbow", "Cultist",
                "Necromancer", "Paladin",
            ],
            PrimaryClass::Fighter => &[
                "Tellsword", "Templar", "Weapon Master", "Battle Mage", "Strider", "Duelist",
                "Wild Blade", "Knight",
            ],
            PrimaryClass::Mage => &[
                "Magician", "Oracle", "Spellsword", "Archwizard", "Scion", "Nightspell",
                "Spellmancer", "Spellshield",
            ],
            PrimaryClass::Ranger => &[
                "Song Warden", "Protector", "Hunter", "Spellhunter", "Hawkeye", "Predator",
                "Beastmaster", "Warden",
            ],
            PrimaryClass::Rogue => &[
                "Trickster", "Shadow Disciple", "Shadowblade", "Shadow Caster", "Scout",
                "Assassin", "Shadowmancer", "Nightshield",
            ],
            PrimaryClass::Summoner => &[
                "Songcaller", "Shaman", "Bladecaller", "Warlock", "Falconer", "Shadow Lord",
                "Conjurer", "Keeper",
            ],
            PrimaryClass::Tank => &[
                "Siren", "Apostle", "Dreadnought", "Spellstone", "Sentinel", "Shadow Guardian",
                "Brood Warden", "Guardian",
            ],
        }
    }

    /// Whether `secondary` is a legal pairing for this primary.
    pub fn is_valid_secondary(&self, secondary: &str) -> bool {
        self.secondary_classes().contains(&secondary)
    }
}

impl fmt::Display for PrimaryClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrimaryClass {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_PRIMARY_CLASSES
            .into_iter()
            .find(|class| class.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("unknown primary class: {s}")))
    }
}

/// Validate a primary/secondary pairing, returning the parsed primary.
pub fn validate_pairing(primary: &str, secondary: &str) -> Result<PrimaryClass, CoreError> {
    let primary: PrimaryClass = primary.parse()?;
    if !primary.is_valid_secondary(secondary) {
        return Err(CoreError::Validation(format!(
            "{secondary} is not a valid secondary class for {primary}"
        )));
    }
    Ok(primary)
}

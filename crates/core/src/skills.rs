//! Character skill catalogues and the zero-initialized skill map.
//!
//! Skills are grouped by character type (gathering, processing, crafting).
//! Levels run 0..=100; ranks are a five-tier ladder. A new character starts
//! with every skill at level 0, rank Novice.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum skill level.
pub const MAX_SKILL_LEVEL: u8 = 100;

/// The three character type categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterType {
    Gathering,
    Processing,
    Crafting,
}

pub const ALL_CHARACTER_TYPES: [CharacterType; 3] = [
    CharacterType::Gathering,
    CharacterType::Processing,
    CharacterType::Crafting,
];

impl CharacterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterType::Gathering => "gathering",
            CharacterType::Processing => "processing",
            CharacterType::Crafting => "crafting",
        }
    }

    /// Skill names for this category, in display order.
    pub fn skill_names(&self) -> &'static [&'static str] {
        match self {
            CharacterType::Gathering => {
                &["Fishing", "Herbalism", "Hunting", "Lumberjacking", "Mining"]
            }
            CharacterType::Processing => &[
                "Alchemy",
                "Animal Husbandry",
                "Cooking",
                "Farming",
                "Lumber Milling",
                "Metalworking",
                "Stonemasonry",
                "Tanning",
                "Weaving",
            ],
            CharacterType::Crafting => &[
                "Arcane Engineering",
                "Armor Smithing",
                "Carpentry",
                "Leatherworking",
                "Jeweler",
                "Scribe",
                "Tailoring",
                "Weapon Smithing",
            ],
        }
    }
}

impl fmt::Display for CharacterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CharacterType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gathering" => Ok(CharacterType::Gathering),
            "processing" => Ok(CharacterType::Processing),
            "crafting" => Ok(CharacterType::Crafting),
            other => Err(CoreError::Validation(format!(
                "unknown character type: {other}"
            ))),
        }
    }
}

/// The five-tier skill rank ladder, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SkillRank {
    Novice,
    Apprentice,
    Journeyman,
    Master,
    Grandmaster,
}

/// One skill's progression state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillData {
    pub level: u8,
    pub rank: SkillRank,
}

/// Skill map grouped by category, as persisted in `characters.skills`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillsByType {
    pub gathering: BTreeMap<String, SkillData>,
    pub processing: BTreeMap<String, SkillData>,
    pub crafting: BTreeMap<String, SkillData>,
}

impl SkillsByType {
    fn category_mut(&mut self, category: CharacterType) -> &mut BTreeMap<String, SkillData> {
        match category {
            CharacterType::Gathering => &mut self.gathering,
            CharacterType::Processing => &mut self.processing,
            CharacterType::Crafting => &mut self.crafting,
        }
    }

    /// Set a skill's level, clamped to 0..=100. The rank is left untouched.
    pub fn set_level(&mut self, category: CharacterType, skill: &str, level: u8) {
        let entry = self
            .category_mut(category)
            .entry(skill.to_string())
            .or_insert(SkillData {
                level: 0,
                rank: SkillRank::Novice,
            });
        entry.level = level.min(MAX_SKILL_LEVEL);
    }
}

/// Build the zero-initialized skill map for a freshly provisioned character.
pub fn initialize_skills() -> SkillsByType {
    let mut skills = SkillsByType::default();
    for category in ALL_CHARACTER_TYPES {
        let map = skills.category_mut(category);
        for name in category.skill_names() {
            map.insert(
                (*name).to_string(),
                SkillData {
                    level: 0,
                    rank: SkillRank::Novice,
                },
            );
        }
    }
    skills
}

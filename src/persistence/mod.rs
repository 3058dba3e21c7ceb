//! Save data
//!
//! Progress lives in one JSON file. Missing fields take their defaults, and a
//! file that cannot be read or parsed is replaced by a fresh save, so the
//! simulation only ever sees a valid `Loadout`.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::level::{BuildBlock, CustomLevel, LEVEL_COUNT};
use crate::sim::abilities::MAX_LEVEL;
use crate::sim::{AbilityKind, Loadout};

/// Errors reading or writing save files
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save file i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("save file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persistent player progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveData {
    pub coins: u32,
    pub gold: u32,
    pub current_level: u32,
    pub max_level_reached: u32,
    /// Purchased level per ability key
    pub ability_levels: BTreeMap<String, u8>,
    pub active_skin: String,
    pub owned_skins: Vec<String>,
    /// Best stars per level id
    pub level_stars: BTreeMap<u32, u8>,
    pub unlocked_blocks: Vec<BuildBlock>,
    pub custom_levels: Vec<CustomLevel>,
    pub extra_hearts: u32,
}

impl Default for SaveData {
    fn default() -> Self {
        Self {
            coins: 0,
            gold: 0,
            current_level: 1,
            max_level_reached: 1,
            ability_levels: BTreeMap::new(),
            active_skin: "default".to_string(),
            owned_skins: vec!["default".to_string()],
            level_stars: BTreeMap::new(),
            unlocked_blocks: BuildBlock::STARTER.to_vec(),
            custom_levels: Vec::new(),
            extra_hearts: 0,
        }
    }
}

/// Stars earned for a completion: one, plus one per five coins, at most three
pub fn stars_for(coins: u32) -> u8 {
    (coins / 5 + 1).min(3) as u8
}

impl SaveData {
    pub fn load(path: &Path) -> Result<Self, SaveError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Load, or start fresh when the file is missing or corrupt
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(save) => save,
            Err(SaveError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                log::warn!("Save file {} unusable, starting fresh: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), SaveError> {
        fs::write(path, serde_json::to_string(self)?)?;
        Ok(())
    }

    /// Level of an ability, capped at the highest purchasable level
    pub fn ability_level(&self, kind: AbilityKind) -> u8 {
        self.ability_levels
            .get(kind.key())
            .copied()
            .unwrap_or(0)
            .min(MAX_LEVEL)
    }

    pub fn set_ability_level(&mut self, kind: AbilityKind, level: u8) {
        self.ability_levels
            .insert(kind.key().to_string(), level.min(MAX_LEVEL));
    }

    /// Player setup handed to a level load
    pub fn loadout(&self) -> Loadout {
        let mut ability_levels = [0; 3];
        for kind in AbilityKind::ALL {
            ability_levels[kind.index()] = self.ability_level(kind);
        }
        Loadout {
            ability_levels,
            bonus_health: self.extra_hearts,
            skin: self.active_skin.clone(),
        }
    }

    /// Bank a completed level's currency and advance progress
    pub fn record_level_complete(&mut self, level_id: u32, coins: u32, gold: u32) {
        self.coins += coins;
        self.gold += gold;
        self.current_level = level_id;
        if level_id >= self.max_level_reached {
            self.max_level_reached = (level_id + 1).min(LEVEL_COUNT);
        }
        self.level_stars.insert(level_id, stars_for(coins));
        log::info!(
            "Progress: level {} cleared, {} coins / {} gold banked",
            level_id,
            self.coins,
            self.gold
        );
    }

    pub fn is_unlocked(&self, level_id: u32) -> bool {
        level_id >= 1 && level_id <= self.max_level_reached
    }
}

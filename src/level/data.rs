//! Level blueprint

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::{LevelError, WorldId};
use crate::sim::entity::{Checkpoint, Coin, Enemy, Platform};
use crate::sim::rect::Rect;

/// Immutable description of a level
///
/// The simulation clones these lists into live state at load and never writes
/// back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    pub id: u32,
    pub name: String,
    pub width: f32,
    pub height: f32,
    pub world: WorldId,
    /// Top-left of the player hitbox at spawn
    pub player_start: Vec2,
    pub platforms: Vec<Platform>,
    pub coins: Vec<Coin>,
    pub enemies: Vec<Enemy>,
    pub checkpoints: Vec<Checkpoint>,
    pub exit: Rect,
    #[serde(default)]
    pub boss_level: bool,
}

impl LevelData {
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let level: LevelData = serde_json::from_str(json)?;
        if level.width <= 0.0 || level.height <= 0.0 {
            return Err(LevelError::ZeroSize);
        }
        Ok(level)
    }

    pub fn to_json(&self) -> Result<String, LevelError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    pub fn total_coins(&self) -> usize {
        self.coins.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::get_level;

    #[test]
    fn test_json_round_trip_preserves_blueprint() {
        let level = get_level(5);
        let json = level.to_json().unwrap();
        let back = LevelData::from_json(&json).unwrap();
        assert_eq!(back, level);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(
            LevelData::from_json("{\"id\": 1"),
            Err(LevelError::Json(_))
        ));
    }

    #[test]
    fn test_zero_size_rejected() {
        let mut level = get_level(1);
        level.width = 0.0;
        let json = level.to_json().unwrap();
        assert!(matches!(LevelData::from_json(&json), Err(LevelError::ZeroSize)));
    }
}

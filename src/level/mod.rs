//! Level content
//!
//! `get_level` is the single entry point: handcrafted blueprints for a few
//! tutorial and boss ids, seeded procedural synthesis for everything else.

pub mod builder;
pub mod data;
pub mod generator;
pub mod handcrafted;
pub mod world;

pub use builder::{BuildBlock, CustomLevel, Placement};
pub use data::LevelData;
pub use world::{AmbientStyle, WorldId, WorldTheme};

use thiserror::Error;

/// Number of levels in the campaign
pub const LEVEL_COUNT: u32 = 100;

/// Errors from decoding or building level blueprints
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("level has no player start")]
    MissingStart,
    #[error("level has no exit")]
    MissingExit,
    #[error("placement at grid ({x}, {y}) lies outside the {width}x{height} level")]
    OutOfBounds { x: i32, y: i32, width: u32, height: u32 },
    #[error("level dimensions must be non-zero")]
    ZeroSize,
}

/// Blueprint for a level id
///
/// Pure and deterministic: the same id always yields the same level.
pub fn get_level(id: u32) -> LevelData {
    handcrafted::level(id).unwrap_or_else(|| generator::generate(id))
}

/// Display name for a level id
pub fn level_name(id: u32) -> String {
    get_level(id).name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handcrafted_takes_precedence() {
        assert_eq!(get_level(1).name, "Mystic Glade");
        assert_eq!(get_level(10).name, "Guardian of the Grove");
        assert_eq!(level_name(20), "The Forest King");
    }

    #[test]
    fn test_every_level_is_well_formed() {
        for id in 1..=LEVEL_COUNT {
            let level = get_level(id);
            assert_eq!(level.id, id);
            assert!(level.width > 0.0 && level.height > 0.0);
            assert!(!level.platforms.is_empty(), "level {id} has no platforms");
            assert!(!level.name.is_empty());
        }
    }
}

//! Player-built levels
//!
//! A custom level is a grid of single-tile placements. Converting it yields an
//! ordinary `LevelData`, so custom levels run through the same simulation as
//! campaign levels.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::handcrafted::{
    checkpoint, coin, exit, falling, flying, gold, ground, ice, moving, patrol, spike, trampoline,
};
use super::{LevelData, LevelError, WorldId};
use crate::consts::TILE;
use crate::sim::entity::Axis;

/// Block types available in the builder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildBlock {
    Solid,
    Ice,
    Trampoline,
    Spike,
    MovingH,
    MovingV,
    Falling,
    /// Drawn by the editor only
    Decoration,
    Coin,
    Gold,
    EnemyPatrol,
    EnemyFlying,
    Checkpoint,
    Exit,
    Start,
}

impl BuildBlock {
    pub const ALL: [BuildBlock; 15] = [
        BuildBlock::Solid,
        BuildBlock::Ice,
        BuildBlock::Trampoline,
        BuildBlock::Spike,
        BuildBlock::MovingH,
        BuildBlock::MovingV,
        BuildBlock::Falling,
        BuildBlock::Decoration,
        BuildBlock::Coin,
        BuildBlock::Gold,
        BuildBlock::EnemyPatrol,
        BuildBlock::EnemyFlying,
        BuildBlock::Checkpoint,
        BuildBlock::Exit,
        BuildBlock::Start,
    ];

    /// Blocks every save starts with
    pub const STARTER: [BuildBlock; 4] = [
        BuildBlock::Solid,
        BuildBlock::Coin,
        BuildBlock::Exit,
        BuildBlock::Start,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BuildBlock::Solid => "Stone Block",
            BuildBlock::Ice => "Ice Block",
            BuildBlock::Trampoline => "Trampoline",
            BuildBlock::Spike => "Spike Trap",
            BuildBlock::MovingH => "Moving (H)",
            BuildBlock::MovingV => "Moving (V)",
            BuildBlock::Falling => "Crumble Block",
            BuildBlock::Decoration => "Decoration",
            BuildBlock::Coin => "Coin",
            BuildBlock::Gold => "Gold Stone",
            BuildBlock::EnemyPatrol => "Patrol Enemy",
            BuildBlock::EnemyFlying => "Flying Enemy",
            BuildBlock::Checkpoint => "Checkpoint",
            BuildBlock::Exit => "Exit Portal",
            BuildBlock::Start => "Start Point",
        }
    }
}

/// One block on the builder grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub block: BuildBlock,
    pub grid_x: i32,
    pub grid_y: i32,
}

impl Placement {
    pub fn new(block: BuildBlock, grid_x: i32, grid_y: i32) -> Self {
        Self {
            block,
            grid_x,
            grid_y,
        }
    }
}

/// A level authored in the builder (dimensions in tiles)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomLevel {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub world: WorldId,
    pub placements: Vec<Placement>,
}

impl CustomLevel {
    /// Convert to a playable blueprint under the given id
    ///
    /// Requires non-zero dimensions, every placement on the grid, a start and
    /// an exit. When several starts or exits are placed the last one wins.
    pub fn to_level(&self, id: u32) -> Result<LevelData, LevelError> {
        if self.width == 0 || self.height == 0 {
            return Err(LevelError::ZeroSize);
        }

        let mut level = LevelData {
            id,
            name: self.name.clone(),
            width: self.width as f32 * TILE,
            height: self.height as f32 * TILE,
            world: self.world,
            player_start: Vec2::ZERO,
            platforms: Vec::new(),
            coins: Vec::new(),
            enemies: Vec::new(),
            checkpoints: Vec::new(),
            exit: Default::default(),
            boss_level: false,
        };
        let mut start = None;
        let mut exit_zone = None;

        for p in &self.placements {
            let (x, y) = (p.grid_x, p.grid_y);
            if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
                return Err(LevelError::OutOfBounds {
                    x,
                    y,
                    width: self.width,
                    height: self.height,
                });
            }
            match p.block {
                BuildBlock::Solid => level.platforms.push(ground(x, y, 1, 1)),
                BuildBlock::Ice => level.platforms.push(ice(x, y, 1)),
                BuildBlock::Trampoline => level.platforms.push(trampoline(x, y)),
                BuildBlock::Spike => level.platforms.push(spike(x, y, 1)),
                BuildBlock::MovingH => level.platforms.push(moving(x, y, 1, Axis::X, 2, 1.0)),
                BuildBlock::MovingV => level.platforms.push(moving(x, y, 1, Axis::Y, 2, 1.0)),
                BuildBlock::Falling => level.platforms.push(falling(x, y, 1)),
                BuildBlock::Decoration => {}
                BuildBlock::Coin => level.coins.push(coin(x, y)),
                BuildBlock::Gold => level.coins.push(gold(x, y)),
                BuildBlock::EnemyPatrol => level.enemies.push(patrol(x, y, 3)),
                BuildBlock::EnemyFlying => level.enemies.push(flying(x, y, 3)),
                BuildBlock::Checkpoint => level.checkpoints.push(checkpoint(x, y + 1)),
                BuildBlock::Exit => exit_zone = Some(exit(x, y + 1)),
                BuildBlock::Start => start = Some(Vec2::new(x as f32 * TILE, y as f32 * TILE)),
            }
        }

        level.player_start = start.ok_or(LevelError::MissingStart)?;
        level.exit = exit_zone.ok_or(LevelError::MissingExit)?;
        Ok(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::PlatformKind;
    use crate::sim::rect::Rect;

    fn floor_level() -> CustomLevel {
        let mut placements: Vec<_> =
            (0..10).map(|x| Placement::new(BuildBlock::Solid, x, 9)).collect();
        placements.push(Placement::new(BuildBlock::Start, 1, 8));
        placements.push(Placement::new(BuildBlock::Exit, 8, 7));
        placements.push(Placement::new(BuildBlock::Coin, 4, 7));
        placements.push(Placement::new(BuildBlock::Decoration, 5, 5));
        CustomLevel {
            name: "Test Run".into(),
            width: 10,
            height: 10,
            world: WorldId::CrystalCaverns,
            placements,
        }
    }

    #[test]
    fn test_conversion() {
        let level = floor_level().to_level(1001).unwrap();
        assert_eq!(level.id, 1001);
        assert_eq!(level.width, 400.0);
        assert_eq!(level.platforms.len(), 10);
        assert!(level.platforms.iter().all(|p| p.kind == PlatformKind::Solid));
        assert_eq!(level.coins.len(), 1);
        assert_eq!(level.player_start, Vec2::new(40.0, 320.0));
        assert_eq!(level.exit, Rect::new(320.0, 280.0, 80.0, 80.0));
    }

    #[test]
    fn test_missing_start_and_exit() {
        let mut custom = floor_level();
        custom.placements.retain(|p| p.block != BuildBlock::Start);
        assert!(matches!(custom.to_level(1), Err(LevelError::MissingStart)));

        let mut custom = floor_level();
        custom.placements.retain(|p| p.block != BuildBlock::Exit);
        assert!(matches!(custom.to_level(1), Err(LevelError::MissingExit)));
    }

    #[test]
    fn test_out_of_bounds_placement() {
        let mut custom = floor_level();
        custom.placements.push(Placement::new(BuildBlock::Spike, 10, 3));
        assert!(matches!(
            custom.to_level(1),
            Err(LevelError::OutOfBounds { x: 10, y: 3, .. })
        ));
    }

    #[test]
    fn test_zero_size() {
        let mut custom = floor_level();
        custom.width = 0;
        assert!(matches!(custom.to_level(1), Err(LevelError::ZeroSize)));
    }
}

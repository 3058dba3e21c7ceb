//! Handcrafted levels
//!
//! Tutorial levels 1-5 and the world one boss levels (10, 20). Coordinates are
//! in tiles; the helpers below convert to pixels and are shared with the
//! generator.

use glam::Vec2;

use super::{LevelData, WorldId};
use crate::consts::TILE as T;
use crate::sim::entity::{
    Axis, Checkpoint, Coin, CoinKind, Crumble, Enemy, Motion, Platform, PlatformKind,
};
use crate::sim::rect::Rect;

fn tile_rect(x: i32, y: i32, w: f32, h: f32) -> Rect {
    Rect::new(x as f32 * T, y as f32 * T, w * T, h * T)
}

pub(crate) fn ground(x: i32, y: i32, w: i32, h: i32) -> Platform {
    Platform::solid(tile_rect(x, y, w as f32, h as f32))
}

pub(crate) fn moving(x: i32, y: i32, w: i32, axis: Axis, range: i32, speed: f32) -> Platform {
    Platform::new(
        tile_rect(x, y, w as f32, 1.0),
        PlatformKind::Moving(Motion::new(axis, range as f32 * T, speed)),
    )
}

pub(crate) fn ice(x: i32, y: i32, w: i32) -> Platform {
    Platform::new(tile_rect(x, y, w as f32, 1.0), PlatformKind::Ice)
}

pub(crate) fn trampoline(x: i32, y: i32) -> Platform {
    Platform::new(tile_rect(x, y, 2.0, 0.6), PlatformKind::Trampoline)
}

pub(crate) fn spike(x: i32, y: i32, w: i32) -> Platform {
    Platform::new(tile_rect(x, y, w as f32, 0.5), PlatformKind::Spike)
}

pub(crate) fn falling(x: i32, y: i32, w: i32) -> Platform {
    Platform::new(
        tile_rect(x, y, w as f32, 1.0),
        PlatformKind::Falling(Crumble::default()),
    )
}

/// Coin centered in tile (x, y)
pub(crate) fn coin(x: i32, y: i32) -> Coin {
    Coin::new(tile_center(x, y), CoinKind::Coin)
}

pub(crate) fn gold(x: i32, y: i32) -> Coin {
    Coin::new(tile_center(x, y), CoinKind::Gold)
}

fn tile_center(x: i32, y: i32) -> Vec2 {
    Vec2::new(x as f32 * T + T / 2.0, y as f32 * T + T / 2.0)
}

fn tile_pos(x: i32, y: i32) -> Vec2 {
    Vec2::new(x as f32 * T, y as f32 * T)
}

pub(crate) fn patrol(x: i32, y: i32, range: i32) -> Enemy {
    Enemy::patrol(tile_pos(x, y), range as f32 * T)
}

pub(crate) fn flying(x: i32, y: i32, range: i32) -> Enemy {
    Enemy::flying(tile_pos(x, y), range as f32 * T)
}

pub(crate) fn boss(x: i32, y: i32, health: u32) -> Enemy {
    Enemy::boss(tile_pos(x, y), health)
}

/// Checkpoint centered on tile column x, standing on row y
pub(crate) fn checkpoint(x: i32, y: i32) -> Checkpoint {
    Checkpoint::new(Vec2::new(x as f32 * T + T / 2.0, y as f32 * T))
}

/// Two-tile exit zone whose bottom sits on row y
pub(crate) fn exit(x: i32, y: i32) -> Rect {
    tile_rect(x, y - 1, 2.0, 2.0)
}

/// Coins along a row, `from..=to`
fn coin_row(y: i32, from: i32, to: i32) -> impl Iterator<Item = Coin> {
    (from..=to).map(move |x| coin(x, y))
}

/// Handcrafted blueprint for an id, if one exists
pub fn level(id: u32) -> Option<LevelData> {
    match id {
        1 => Some(mystic_glade()),
        2 => Some(whispering_woods()),
        3 => Some(fungal_grotto()),
        4 => Some(ancient_roots()),
        5 => Some(thornvine_pass()),
        10 => Some(guardian_of_the_grove()),
        20 => Some(forest_king()),
        _ => None,
    }
}

pub fn ids() -> &'static [u32] {
    &[1, 2, 3, 4, 5, 10, 20]
}

fn forest(id: u32, name: &str, width: f32, height: f32, start: (i32, i32)) -> LevelData {
    LevelData {
        id,
        name: name.to_string(),
        width,
        height,
        world: WorldId::EnchantedForest,
        player_start: tile_pos(start.0, start.1),
        platforms: Vec::new(),
        coins: Vec::new(),
        enemies: Vec::new(),
        checkpoints: Vec::new(),
        exit: Rect::default(),
        boss_level: false,
    }
}

fn mystic_glade() -> LevelData {
    let mut l = forest(1, "Mystic Glade", 2800.0, 800.0, (2, 16));
    l.platforms = vec![
        ground(0, 18, 60, 3),
        // Terraces
        ground(5, 15, 5, 1),
        ground(12, 14, 4, 1),
        ground(18, 13, 6, 1),
        ground(26, 15, 3, 1),
        ground(31, 14, 4, 1),
        ground(37, 12, 5, 1),
        ground(44, 14, 3, 1),
        ground(49, 13, 5, 1),
        ground(56, 12, 6, 1),
        // Ledges
        ground(8, 16, 2, 1),
        ground(23, 16, 2, 1),
        ground(42, 16, 2, 1),
    ];
    l.coins = coin_row(14, 6, 9)
        .chain(coin_row(13, 13, 15))
        .chain(coin_row(12, 19, 22))
        .chain(coin_row(14, 27, 28))
        .chain(coin_row(13, 32, 34))
        .chain(coin_row(11, 38, 41))
        .chain(coin_row(12, 50, 52))
        .chain([coin(57, 11), gold(58, 11)])
        .collect();
    l.enemies = vec![patrol(18, 12, 4), patrol(37, 11, 4)];
    l.checkpoints = vec![checkpoint(26, 15), checkpoint(49, 13)];
    l.exit = exit(60, 12);
    l
}

fn whispering_woods() -> LevelData {
    let mut l = forest(2, "Whispering Woods", 3200.0, 900.0, (2, 18));
    l.platforms = vec![
        ground(0, 20, 10, 3),
        ground(13, 18, 4, 1),
        ground(19, 16, 3, 1),
        ground(24, 18, 3, 1),
        ground(29, 15, 5, 1),
        ground(36, 17, 3, 1),
        ground(41, 14, 4, 1),
        ground(47, 16, 5, 1),
        ground(54, 15, 4, 1),
        ground(60, 17, 3, 1),
        ground(65, 14, 4, 1),
        ground(71, 16, 5, 1),
    ];
    l.coins = coin_row(17, 14, 16)
        .chain(coin_row(15, 20, 21))
        .chain(coin_row(17, 25, 26))
        .chain(coin_row(14, 30, 33))
        .chain(coin_row(13, 42, 44))
        .chain(coin_row(15, 48, 50))
        .chain(coin_row(14, 55, 56))
        .chain([coin(66, 13), gold(67, 13), coin(68, 13)])
        .chain(coin_row(15, 72, 73))
        .collect();
    l.enemies = vec![patrol(29, 14, 4), patrol(47, 15, 4), flying(58, 12, 3)];
    l.checkpoints = vec![checkpoint(36, 17), checkpoint(60, 17)];
    l.exit = exit(74, 16);
    l
}

fn fungal_grotto() -> LevelData {
    let mut l = forest(3, "Fungal Grotto", 3000.0, 1000.0, (2, 20));
    l.platforms = vec![
        ground(0, 22, 8, 3),
        trampoline(10, 21),
        ground(15, 17, 3, 1),
        trampoline(20, 19),
        ground(25, 14, 4, 1),
        ground(31, 16, 3, 1),
        trampoline(36, 18),
        ground(41, 12, 5, 1),
        ground(48, 15, 4, 1),
        trampoline(54, 17),
        ground(59, 10, 4, 1),
        ground(65, 13, 5, 1),
    ];
    l.coins = vec![
        coin(11, 18),
        coin(12, 16),
        coin(16, 16),
        coin(17, 16),
        coin(21, 16),
        coin(22, 14),
        coin(26, 13),
        coin(27, 13),
        coin(28, 13),
        coin(32, 15),
        coin(33, 15),
        coin(37, 15),
        coin(38, 13),
    ];
    l.coins.extend(coin_row(11, 42, 45));
    l.coins.extend([
        coin(49, 14),
        coin(50, 14),
        coin(55, 14),
        coin(56, 12),
        coin(60, 9),
        gold(61, 9),
        coin(62, 9),
    ]);
    l.coins.extend(coin_row(12, 66, 68));
    l.enemies = vec![
        flying(18, 13, 3),
        patrol(25, 13, 3),
        flying(46, 9, 4),
        patrol(59, 9, 3),
    ];
    l.checkpoints = vec![checkpoint(25, 14), checkpoint(48, 15)];
    l.exit = exit(68, 13);
    l
}

fn ancient_roots() -> LevelData {
    let mut l = forest(4, "Ancient Roots", 2400.0, 1600.0, (3, 34));
    l.platforms = vec![
        ground(0, 36, 15, 3),
        // Shaft walls
        ground(0, 22, 2, 14),
        ground(13, 22, 2, 14),
        ground(4, 30, 5, 1),
        ground(3, 25, 6, 1),
        ground(5, 22, 4, 1),
        // Upper section
        ground(16, 20, 5, 1),
        ground(23, 18, 4, 1),
        ground(29, 16, 5, 1),
        ground(36, 18, 4, 1),
        ground(42, 20, 5, 1),
    ];
    l.coins = coin_row(33, 5, 8)
        .chain(coin_row(29, 5, 7))
        .chain(coin_row(24, 4, 7))
        .chain(coin_row(21, 6, 8))
        .chain(coin_row(19, 17, 19))
        .chain(coin_row(17, 24, 26))
        .chain([coin(30, 15), coin(31, 15), gold(32, 15), coin(33, 15)])
        .chain(coin_row(17, 37, 38))
        .chain(coin_row(19, 43, 45))
        .collect();
    l.enemies = vec![
        patrol(4, 29, 3),
        flying(8, 23, 3),
        patrol(16, 19, 4),
        flying(27, 14, 4),
    ];
    l.checkpoints = vec![checkpoint(5, 22), checkpoint(29, 16)];
    l.exit = exit(45, 20);
    l
}

fn thornvine_pass() -> LevelData {
    let mut l = forest(5, "Thornvine Pass", 3600.0, 900.0, (2, 18));
    l.platforms = vec![
        ground(0, 20, 8, 3),
        ground(10, 18, 4, 1),
        spike(14, 19, 2),
        ground(16, 18, 3, 1),
        ground(21, 16, 3, 1),
        spike(24, 17, 2),
        ground(26, 16, 4, 1),
        ground(32, 18, 3, 1),
        falling(37, 15, 3),
        ground(42, 14, 5, 1),
        spike(47, 15, 2),
        ground(49, 13, 4, 1),
        trampoline(55, 16),
        ground(60, 10, 5, 1),
        moving(67, 12, 3, Axis::X, 4, 1.2),
        ground(74, 14, 6, 1),
        ground(82, 16, 4, 1),
    ];
    l.coins = coin_row(17, 11, 13)
        .chain(coin_row(17, 17, 18))
        .chain(coin_row(15, 22, 23))
        .chain(coin_row(15, 27, 29))
        .chain(coin_row(17, 33, 34))
        .chain(coin_row(14, 38, 39))
        .chain(coin_row(13, 43, 46))
        .chain(coin_row(12, 50, 52))
        .chain([coin(56, 13), coin(57, 11)])
        .chain([coin(61, 9), gold(62, 9), coin(63, 9)])
        .chain(coin_row(11, 68, 69))
        .chain(coin_row(13, 75, 78))
        .chain(coin_row(15, 83, 84))
        .collect();
    l.enemies = vec![
        patrol(10, 17, 3),
        flying(30, 13, 4),
        patrol(42, 13, 4),
        flying(65, 8, 5),
        patrol(74, 13, 5),
    ];
    l.checkpoints = vec![checkpoint(32, 18), checkpoint(49, 13), checkpoint(74, 14)];
    l.exit = exit(84, 16);
    l
}

fn guardian_of_the_grove() -> LevelData {
    let mut l = forest(10, "Guardian of the Grove", 2000.0, 800.0, (3, 16));
    l.boss_level = true;
    l.platforms = vec![
        ground(0, 18, 50, 3),
        ground(5, 14, 4, 1),
        ground(15, 12, 4, 1),
        ground(25, 14, 4, 1),
        ground(35, 12, 4, 1),
        ground(45, 14, 4, 1),
        ground(10, 8, 6, 1),
        ground(30, 8, 6, 1),
        // Arena walls
        ground(0, 0, 1, 18),
        ground(49, 0, 1, 18),
    ];
    l.coins = coin_row(13, 6, 8)
        .chain(coin_row(11, 16, 18))
        .chain(coin_row(13, 26, 28))
        .chain(coin_row(11, 36, 38))
        .chain(coin_row(13, 46, 48))
        .chain([coin(11, 7), gold(12, 7), gold(13, 7), coin(14, 7)])
        .chain([coin(31, 7), gold(32, 7), gold(33, 7), coin(34, 7)])
        .collect();
    l.enemies = vec![boss(22, 14, 15)];
    l.checkpoints = vec![checkpoint(10, 18)];
    l.exit = exit(47, 18);
    l
}

fn forest_king() -> LevelData {
    let mut l = forest(20, "The Forest King", 2400.0, 800.0, (3, 16));
    l.boss_level = true;
    l.platforms = vec![
        ground(0, 18, 58, 3),
        ground(5, 14, 3, 1),
        ground(12, 11, 5, 1),
        ground(20, 14, 3, 1),
        ground(28, 11, 5, 1),
        ground(36, 14, 3, 1),
        ground(44, 11, 5, 1),
        ground(52, 14, 3, 1),
        ground(0, 0, 1, 18),
        ground(57, 0, 1, 18),
        trampoline(8, 17),
        trampoline(24, 17),
        trampoline(40, 17),
    ];
    // Gold coins deliberately overlap the middle coin of each high ledge
    l.coins = coin_row(13, 6, 7)
        .chain(coin_row(10, 13, 15))
        .chain(coin_row(13, 21, 22))
        .chain(coin_row(10, 29, 31))
        .chain(coin_row(13, 37, 38))
        .chain(coin_row(10, 45, 47))
        .chain(coin_row(13, 53, 54))
        .chain([gold(14, 10), gold(30, 10), gold(46, 10)])
        .collect();
    l.enemies = vec![boss(26, 14, 25)];
    l.checkpoints = vec![checkpoint(12, 18), checkpoint(36, 18)];
    l.exit = exit(55, 18);
    l
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_one_layout() {
        let l = level(1).unwrap();
        assert_eq!(l.world, WorldId::EnchantedForest);
        assert_eq!(l.enemies.len(), 2);
        assert_eq!(l.exit, Rect::new(2400.0, 440.0, 80.0, 80.0));
        assert_eq!(l.player_start, Vec2::new(80.0, 640.0));
        assert_eq!(l.coins.len(), 25);
        assert_eq!(
            l.coins.iter().filter(|c| c.kind == CoinKind::Gold).count(),
            1
        );
    }

    #[test]
    fn test_boss_levels_flagged() {
        for id in [10, 20] {
            let l = level(id).unwrap();
            assert!(l.boss_level);
            assert_eq!(l.enemies.iter().filter(|e| e.is_boss()).count(), 1);
        }
        assert!(!level(3).unwrap().boss_level);
    }

    #[test]
    fn test_helpers_convert_tiles() {
        let t = trampoline(10, 21).rect;
        assert_eq!((t.x, t.y, t.w), (400.0, 840.0, 80.0));
        assert!((t.h - 24.0).abs() < 1e-4);
        assert_eq!(spike(14, 19, 2).rect.h, 20.0);
        assert_eq!(coin(6, 14).pos, Vec2::new(260.0, 580.0));
        assert_eq!(checkpoint(26, 15).pos, Vec2::new(1060.0, 600.0));
    }

    #[test]
    fn test_only_listed_ids_are_handcrafted() {
        for id in 1..=100 {
            assert_eq!(level(id).is_some(), ids().contains(&id), "level {id}");
        }
    }
}

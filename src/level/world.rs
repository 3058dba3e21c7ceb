//! The five worlds
//!
//! Each world owns a contiguous band of 20 level ids, a palette, an ambient
//! particle style and the adjective/noun tables used to name generated levels.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// World identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorldId {
    EnchantedForest,
    CrystalCaverns,
    CelestialPeaks,
    ShadowCitadel,
    EternalAbyss,
}

impl WorldId {
    pub const ALL: [WorldId; 5] = [
        WorldId::EnchantedForest,
        WorldId::CrystalCaverns,
        WorldId::CelestialPeaks,
        WorldId::ShadowCitadel,
        WorldId::EternalAbyss,
    ];

    /// World owning a level id; ids outside 1..=100 fall back to the first world
    pub fn for_level(id: u32) -> WorldId {
        Self::ALL
            .into_iter()
            .find(|w| {
                let (start, end) = w.theme().levels;
                (start..=end).contains(&id)
            })
            .unwrap_or(WorldId::EnchantedForest)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WorldId::EnchantedForest => "enchanted_forest",
            WorldId::CrystalCaverns => "crystal_caverns",
            WorldId::CelestialPeaks => "celestial_peaks",
            WorldId::ShadowCitadel => "shadow_citadel",
            WorldId::EternalAbyss => "eternal_abyss",
        }
    }

    pub fn theme(&self) -> &'static WorldTheme {
        match self {
            WorldId::EnchantedForest => &ENCHANTED_FOREST,
            WorldId::CrystalCaverns => &CRYSTAL_CAVERNS,
            WorldId::CelestialPeaks => &CELESTIAL_PEAKS,
            WorldId::ShadowCitadel => &SHADOW_CITADEL,
            WorldId::EternalAbyss => &ETERNAL_ABYSS,
        }
    }

    /// Adjective and noun tables for generated level names
    pub fn name_parts(&self) -> (&'static [&'static str], &'static [&'static str]) {
        match self {
            WorldId::EnchantedForest => (
                &[
                    "Mystic", "Ancient", "Whispering", "Moonlit", "Verdant", "Twilight", "Sacred",
                    "Enchanted",
                ],
                &[
                    "Glade", "Woods", "Thicket", "Grove", "Hollow", "Canopy", "Roots", "Dell",
                    "Clearing",
                ],
            ),
            WorldId::CrystalCaverns => (
                &[
                    "Crystal", "Glittering", "Deep", "Amethyst", "Shimmering", "Prismatic",
                    "Frozen", "Echo",
                ],
                &["Cavern", "Depths", "Grotto", "Mines", "Chamber", "Tunnels", "Vault", "Chasm"],
            ),
            WorldId::CelestialPeaks => (
                &[
                    "Celestial", "Floating", "Divine", "Starlit", "Golden", "Radiant", "Eternal",
                    "Ascended",
                ],
                &[
                    "Peak", "Summit", "Temple", "Spire", "Bridge", "Island", "Sanctuary",
                    "Observatory",
                ],
            ),
            WorldId::ShadowCitadel => (
                &[
                    "Shadow", "Dark", "Cursed", "Burning", "Obsidian", "Crimson", "Ruined",
                    "Haunted",
                ],
                &["Citadel", "Fortress", "Throne", "Dungeon", "Gates", "Tower", "Arena", "Keep"],
            ),
            WorldId::EternalAbyss => (
                &["Eternal", "Void", "Astral", "Quantum", "Infinite", "Null", "Beyond", "Fracture"],
                &["Abyss", "Rift", "Nexus", "Expanse", "Singularity", "Edge", "Threshold", "Maw"],
            ),
        }
    }
}

/// Ambient particle styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmbientStyle {
    Firefly,
    Crystal,
    Snow,
    Ember,
    Void,
}

impl AmbientStyle {
    /// Drift velocity for a new ambient particle from two uniform rolls in [0, 1)
    pub fn drift(&self, a: f32, b: f32) -> Vec2 {
        match self {
            AmbientStyle::Firefly => Vec2::new((a - 0.5) * 0.8, -0.3 - b * 0.5),
            AmbientStyle::Crystal => Vec2::new(0.0, -0.2 - b * 0.3),
            AmbientStyle::Snow => Vec2::new((a - 0.5) * 0.5, 0.5 + b * 0.5),
            AmbientStyle::Ember => Vec2::new((a - 0.5) * 1.2, -0.8 - b * 0.8),
            AmbientStyle::Void => Vec2::new((a - 0.5) * 1.5, (b - 0.5) * 1.5),
        }
    }
}

/// Cosmetic descriptor handed to the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct WorldTheme {
    pub id: WorldId,
    pub name: &'static str,
    pub subtitle: &'static str,
    /// Inclusive level id band
    pub levels: (u32, u32),
    /// Top, middle, bottom (0xRRGGBB)
    pub background: [u32; 3],
    pub platform_color: u32,
    pub platform_top: u32,
    pub platform_accent: u32,
    pub ground_color: u32,
    pub ambient: AmbientStyle,
    pub ambient_color: u32,
}

static ENCHANTED_FOREST: WorldTheme = WorldTheme {
    id: WorldId::EnchantedForest,
    name: "Enchanted Forest",
    subtitle: "Ancient woods full of magic",
    levels: (1, 20),
    background: [0x051210, 0x0A2A1A, 0x061A12],
    platform_color: 0x3D2B1F,
    platform_top: 0x5E8B3C,
    platform_accent: 0x2E6B2E,
    ground_color: 0x2A1B0E,
    ambient: AmbientStyle::Firefly,
    ambient_color: 0x7CFC00,
};

static CRYSTAL_CAVERNS: WorldTheme = WorldTheme {
    id: WorldId::CrystalCaverns,
    name: "Crystal Caverns",
    subtitle: "Glittering underground depths",
    levels: (21, 40),
    background: [0x05050F, 0x0A0A2A, 0x10081E],
    platform_color: 0x2A2A40,
    platform_top: 0x6A5ACD,
    platform_accent: 0x483D8B,
    ground_color: 0x1A1A30,
    ambient: AmbientStyle::Crystal,
    ambient_color: 0x9370DB,
};

static CELESTIAL_PEAKS: WorldTheme = WorldTheme {
    id: WorldId::CelestialPeaks,
    name: "Celestial Peaks",
    subtitle: "Floating islands in the sky",
    levels: (41, 60),
    background: [0x0A0A20, 0x151540, 0x0A1530],
    platform_color: 0xD4C5A0,
    platform_top: 0xF0E68C,
    platform_accent: 0xBDB76B,
    ground_color: 0xC4B587,
    ambient: AmbientStyle::Snow,
    ambient_color: 0xFFD700,
};

static SHADOW_CITADEL: WorldTheme = WorldTheme {
    id: WorldId::ShadowCitadel,
    name: "Shadow Citadel",
    subtitle: "Dark fortress of the cursed",
    levels: (61, 80),
    background: [0x0F0505, 0x200A0A, 0x150808],
    platform_color: 0x3A2020,
    platform_top: 0x8B0000,
    platform_accent: 0x600000,
    ground_color: 0x2A1515,
    ambient: AmbientStyle::Ember,
    ambient_color: 0xFF4500,
};

static ETERNAL_ABYSS: WorldTheme = WorldTheme {
    id: WorldId::EternalAbyss,
    name: "Eternal Abyss",
    subtitle: "Beyond reality itself",
    levels: (81, 100),
    background: [0x050008, 0x0A0020, 0x08001A],
    platform_color: 0x1A1A3A,
    platform_top: 0x00CED1,
    platform_accent: 0x008B8B,
    ground_color: 0x0A0A25,
    ambient: AmbientStyle::Void,
    ambient_color: 0x00FFFF,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_bands() {
        assert_eq!(WorldId::for_level(1), WorldId::EnchantedForest);
        assert_eq!(WorldId::for_level(20), WorldId::EnchantedForest);
        assert_eq!(WorldId::for_level(21), WorldId::CrystalCaverns);
        assert_eq!(WorldId::for_level(55), WorldId::CelestialPeaks);
        assert_eq!(WorldId::for_level(61), WorldId::ShadowCitadel);
        assert_eq!(WorldId::for_level(100), WorldId::EternalAbyss);
        // Out of range falls back
        assert_eq!(WorldId::for_level(250), WorldId::EnchantedForest);
    }

    #[test]
    fn test_bands_partition_ids() {
        for id in 1..=100 {
            let owners = WorldId::ALL
                .iter()
                .filter(|w| {
                    let (s, e) = w.theme().levels;
                    (s..=e).contains(&id)
                })
                .count();
            assert_eq!(owners, 1, "level {id}");
        }
    }

    #[test]
    fn test_serde_name_matches_as_str() {
        for w in WorldId::ALL {
            let json = serde_json::to_string(&w).unwrap();
            assert_eq!(json, format!("\"{}\"", w.as_str()));
        }
    }
}

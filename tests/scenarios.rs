//! End-to-end play scenarios through the public API

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use mystic_worlds::consts::TILE;
use mystic_worlds::input::Key;
use mystic_worlds::level::{LEVEL_COUNT, handcrafted};
use mystic_worlds::persistence::SaveData;
use mystic_worlds::sim::enemy::{boss_state, update_enemies};
use mystic_worlds::sim::{
    Coin, CoinKind, Enemy, GamePhase, GameState, Loadout, Platform, Rect, TickInput, tick,
};
use mystic_worlds::{Engine, EngineListener, LevelData, Settings, WorldId, get_level};

fn test_level(enemies: Vec<Enemy>) -> LevelData {
    LevelData {
        id: 900,
        name: "Proving Ground".into(),
        width: 3000.0,
        height: 1000.0,
        world: WorldId::ShadowCitadel,
        player_start: Vec2::new(100.0, 680.0),
        platforms: vec![Platform::solid(Rect::new(0.0, 720.0, 3000.0, 120.0))],
        coins: Vec::new(),
        enemies,
        checkpoints: Vec::new(),
        exit: Rect::new(2900.0, 640.0, 80.0, 80.0),
        boss_level: false,
    }
}

#[test]
fn first_level_layout() {
    let level = get_level(1);
    assert_eq!(level.world, WorldId::EnchantedForest);
    assert_eq!(level.enemies.len(), 2);
    assert_eq!(level.exit.pos(), Vec2::new(60.0 * TILE, 11.0 * TILE));
    assert_eq!(level.exit.pos(), Vec2::new(2400.0, 440.0));
}

#[test]
fn every_level_is_reproducible() {
    for id in 1..=LEVEL_COUNT {
        assert_eq!(get_level(id), get_level(id), "level {id} differs between calls");
    }
}

#[test]
fn generated_levels_stay_in_bounds() {
    for id in (1..=LEVEL_COUNT).filter(|id| !handcrafted::ids().contains(id)) {
        let level = get_level(id);
        for p in &level.platforms {
            assert!(p.rect.x >= 0.0 && p.rect.x <= level.width, "level {id}");
            assert!(p.rect.y >= 0.0 && p.rect.y <= level.height, "level {id}");
        }
        let exit = level.exit;
        assert!(exit.x > 0.0 && exit.right() < level.width, "level {id} exit");
        assert!(exit.y > 0.0 && exit.bottom() < level.height, "level {id} exit");
    }
}

#[test]
fn projectile_kills_one_hit_enemy() {
    let mut enemy = Enemy::patrol(Vec2::new(260.0, 688.0), 0.0);
    enemy.health = 1;
    enemy.max_health = 1;
    let loadout = Loadout {
        ability_levels: [1, 0, 0],
        ..Default::default()
    };
    let mut state = GameState::load(&test_level(vec![enemy]), &loadout);

    let cast = TickInput {
        projectile: true,
        ..Default::default()
    };
    tick(&mut state, &cast, 1.0);
    assert_eq!(state.projectiles.len(), 1);

    for _ in 0..30 {
        if !state.enemies[0].alive {
            break;
        }
        tick(&mut state, &TickInput::default(), 1.0);
    }
    assert_eq!(state.enemies[0].health, 0);
    assert!(!state.enemies[0].alive);
    assert!(state.projectiles.is_empty());
}

#[test]
fn wounded_boss_enters_final_phase() {
    let mut boss = Enemy::boss(Vec2::new(1500.0, 664.0), 20);
    boss.health = 5;
    let mut state = GameState::load(&test_level(vec![boss]), &Loadout::default());
    // Load restores full health; wound it in the live state
    state.enemies[0].health = 5;
    update_enemies(&mut state, 1.0);
    assert_eq!(boss_state(&state, 0).map(|b| b.phase), Some(2));
}

#[derive(Default)]
struct Outcome {
    game_overs: u32,
    health: Vec<u32>,
    completions: Vec<(u32, u32, u32)>,
}

struct Watch(Rc<RefCell<Outcome>>);

impl EngineListener for Watch {
    fn health_changed(&mut self, health: u32) {
        self.0.borrow_mut().health.push(health);
    }

    fn game_over(&mut self, _level_id: u32) {
        self.0.borrow_mut().game_overs += 1;
    }

    fn level_complete(&mut self, level_id: u32, coins: u32, gold: u32) {
        self.0.borrow_mut().completions.push((level_id, coins, gold));
    }
}

fn watched_engine() -> (Engine, Rc<RefCell<Outcome>>) {
    let outcome = Rc::new(RefCell::new(Outcome::default()));
    let mut engine = Engine::new(Settings::default());
    engine.set_listener(Box::new(Watch(outcome.clone())));
    (engine, outcome)
}

#[test]
fn last_hit_without_checkpoint_ends_the_run_once() {
    let (mut engine, outcome) = watched_engine();
    engine.load(test_level(vec![Enemy::patrol(Vec2::new(110.0, 688.0), 0.0)]));
    engine.start(0.0);
    {
        let state = engine.state_mut().unwrap();
        assert_eq!(state.player.max_health, 3);
        state.player.health = 1;
    }
    for frame in 1..120 {
        engine.frame(frame as f64 * 16.667);
    }

    let outcome = outcome.borrow();
    assert_eq!(engine.phase(), Some(GamePhase::GameOver));
    assert_eq!(outcome.game_overs, 1);
    assert_eq!(outcome.health.last(), Some(&0));
    assert_eq!(engine.state().unwrap().player.health, 0);
}

#[test]
fn boss_levels_have_one_boss_in_a_walled_arena() {
    for id in [10, 20] {
        let level = get_level(id);
        let bosses: Vec<_> = level.enemies.iter().filter(|e| e.is_boss()).collect();
        assert_eq!(bosses.len(), 1, "level {id}");
        let boss_x = bosses[0].rect.center().x;

        let walls: Vec<_> = level
            .platforms
            .iter()
            .filter(|p| p.rect.h >= 4.0 * TILE && p.rect.w <= TILE)
            .collect();
        assert!(walls.iter().any(|w| w.rect.x < boss_x), "level {id} has no left wall");
        assert!(walls.iter().any(|w| w.rect.x > boss_x), "level {id} has no right wall");
    }
}

#[test]
fn finishing_a_level_banks_progress() {
    let (mut engine, outcome) = watched_engine();
    let mut save = SaveData::default();
    engine.set_loadout(save.loadout());

    let mut level = test_level(Vec::new());
    level.width = 800.0;
    level.exit = Rect::new(600.0, 640.0, 80.0, 80.0);
    level.coins = vec![Coin::new(Vec2::new(300.0, 700.0), CoinKind::Gold)];
    engine.load(level);
    engine.start(0.0);
    engine.input_mut().key_down(Key::Right);
    for frame in 1..400 {
        engine.frame(frame as f64 * 16.667);
        if engine.phase() == Some(GamePhase::LevelComplete) {
            break;
        }
    }
    assert_eq!(engine.phase(), Some(GamePhase::LevelComplete));

    let outcome = outcome.borrow();
    assert_eq!(outcome.completions, vec![(900, 0, 1)]);
    let (id, coins, gold) = outcome.completions[0];
    save.record_level_complete(id.min(LEVEL_COUNT), coins, gold);
    assert_eq!(save.gold, 1);
    assert_eq!(save.max_level_reached, LEVEL_COUNT);
}

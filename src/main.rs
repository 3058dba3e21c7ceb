//! Mystic Worlds headless driver
//!
//! Loads a level, plays it with a scripted run-and-jump input pattern and logs
//! what happens. Usage: `mystic-worlds [level-id] [frames] [save-file] [settings-file]`.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use mystic_worlds::audio::LogAudio;
use mystic_worlds::consts::REFERENCE_FRAME_MS;
use mystic_worlds::input::Key;
use mystic_worlds::level::level_name;
use mystic_worlds::persistence::SaveData;
use mystic_worlds::renderer::DrawList;
use mystic_worlds::sim::{Abilities, GamePhase};
use mystic_worlds::{Engine, EngineListener, Settings};

/// Logs notifications and banks completed levels into the save
struct Progress {
    save: Rc<RefCell<SaveData>>,
}

impl EngineListener for Progress {
    fn coins_changed(&mut self, coins: u32, gold: u32) {
        log::debug!("coins {} gold {}", coins, gold);
    }

    fn health_changed(&mut self, health: u32) {
        log::info!("health {}", health);
    }

    fn abilities_changed(&mut self, abilities: &Abilities) {
        for a in abilities.iter().filter(|a| a.is_owned()) {
            log::debug!("{} active={} cooldown={:.0}", a.kind.key(), a.active, a.cooldown);
        }
    }

    fn level_complete(&mut self, level_id: u32, coins: u32, gold: u32) {
        self.save.borrow_mut().record_level_complete(level_id, coins, gold);
    }

    fn game_over(&mut self, level_id: u32) {
        log::info!("Game over on level {}", level_id);
    }
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let level_id: u32 = args.next().and_then(|a| a.parse().ok()).unwrap_or(1).max(1);
    let frames: u32 = args.next().and_then(|a| a.parse().ok()).unwrap_or(1800);
    let save_path = args.next().map(PathBuf::from);
    let settings = match args.next().map(PathBuf::from) {
        Some(path) => Settings::load(&path),
        None => Settings::default(),
    };

    let save = match &save_path {
        Some(path) => SaveData::load_or_default(path),
        None => SaveData::default(),
    };
    let loadout = save.loadout();
    let save = Rc::new(RefCell::new(save));

    log::info!("Mystic Worlds (headless) starting level {}: {}", level_id, level_name(level_id));
    log::info!(
        "Quality {}, particles {}, shake {}",
        settings.quality.as_str(),
        settings.max_particles(),
        settings.effective_screen_shake()
    );

    let mut engine = Engine::new(settings);
    engine.set_audio(Box::new(LogAudio::new()));
    engine.set_renderer(Box::new(DrawList::new()));
    engine.set_listener(Box::new(Progress { save: save.clone() }));
    engine.set_loadout(loadout);
    engine.load_level(level_id);
    engine.start(0.0);

    engine.input_mut().key_down(Key::Right);
    for frame in 1..=frames {
        let input = engine.input_mut();
        // Tap jump twice every 40 frames (jump, then double jump)
        match frame % 40 {
            0 | 12 => input.key_down(Key::Jump),
            1 | 13 => input.key_up(Key::Jump),
            _ => {}
        }
        if frame % 150 == 0 {
            input.key_down(Key::Projectile);
        } else if frame % 150 == 1 {
            input.key_up(Key::Projectile);
        }

        engine.frame(frame as f64 * REFERENCE_FRAME_MS);

        if matches!(
            engine.phase(),
            Some(GamePhase::LevelComplete | GamePhase::GameOver)
        ) {
            break;
        }
    }
    engine.stop();

    if let Some(state) = engine.state() {
        log::info!(
            "Finished in {:?} after {:.0} frames at ({:.0}, {:.0}), {} coins, {} gold",
            state.phase,
            state.time,
            state.player.pos.x,
            state.player.pos.y,
            state.coins_collected,
            state.gold_collected
        );
    }

    if let Some(path) = save_path {
        match save.borrow().save(&path) {
            Ok(()) => log::info!("Progress written to {}", path.display()),
            Err(e) => log::warn!("Could not write {}: {}", path.display(), e),
        }
    }
}

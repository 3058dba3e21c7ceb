//! Sound cues
//!
//! The simulation names the moment a sound should play; the host decides how
//! (or whether) to synthesize it. A host without audio passes `SilentAudio`
//! and the game keeps running.

use crate::settings::Settings;

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCue {
    Jump,
    DoubleJump,
    WallJump,
    Coin,
    GoldCoin,
    /// Player took damage
    Hit,
    EnemyHit,
    EnemyDeath,
    ProjectileCast,
    BurstCast,
    DashCast,
    Checkpoint,
    LevelComplete,
    GameOver,
    /// Fired by the shop layer, never by the simulation
    Purchase,
    Trampoline,
}

impl AudioCue {
    pub fn name(&self) -> &'static str {
        match self {
            AudioCue::Jump => "jump",
            AudioCue::DoubleJump => "double_jump",
            AudioCue::WallJump => "wall_jump",
            AudioCue::Coin => "coin",
            AudioCue::GoldCoin => "gold_coin",
            AudioCue::Hit => "hit",
            AudioCue::EnemyHit => "enemy_hit",
            AudioCue::EnemyDeath => "enemy_death",
            AudioCue::ProjectileCast => "projectile_cast",
            AudioCue::BurstCast => "burst_cast",
            AudioCue::DashCast => "dash_cast",
            AudioCue::Checkpoint => "checkpoint",
            AudioCue::LevelComplete => "level_complete",
            AudioCue::GameOver => "game_over",
            AudioCue::Purchase => "purchase",
            AudioCue::Trampoline => "trampoline",
        }
    }
}

/// Receives cues as they happen; nothing flows back into the simulation
pub trait AudioSink {
    fn play(&mut self, cue: AudioCue);

    /// Pick up volume and mute preferences
    fn apply_settings(&mut self, _settings: &Settings) {}
}

/// Drops every cue
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&mut self, _cue: AudioCue) {}
}

/// Logs cues at debug level, honoring volume and mute
#[derive(Debug, Clone)]
pub struct LogAudio {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    played: u64,
}

impl Default for LogAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl LogAudio {
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            played: 0,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Cues that were audible
    pub fn played(&self) -> u64 {
        self.played
    }
}

impl AudioSink for LogAudio {
    fn play(&mut self, cue: AudioCue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.played += 1;
        log::debug!("sfx {} (vol {:.2})", cue.name(), vol);
    }

    fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_muted(settings.muted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_muted_sink_plays_nothing() {
        let mut audio = LogAudio::new();
        audio.play(AudioCue::Coin);
        audio.set_muted(true);
        audio.play(AudioCue::Coin);
        assert_eq!(audio.played(), 1);
    }

    #[test]
    fn test_volume_is_clamped() {
        let mut audio = LogAudio::new();
        audio.set_master_volume(4.0);
        audio.set_sfx_volume(-1.0);
        audio.play(AudioCue::Jump);
        assert_eq!(audio.played(), 0);
    }

    #[test]
    fn test_settings_mute() {
        let mut audio = LogAudio::new();
        let settings = Settings {
            muted: true,
            ..Default::default()
        };
        audio.apply_settings(&settings);
        audio.play(AudioCue::Coin);
        assert_eq!(audio.played(), 0);
    }
}

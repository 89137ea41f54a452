//! Audio dispatch
//!
//! The simulation only raises named sound triggers; this layer mixes them
//! against master/sfx volume and hands them to whatever can make noise.

use crate::Settings;
use crate::sim::{GameEvent, Sound, SoundEvent};

/// Something that can play a named sound
pub trait SoundBackend {
    /// `gain` is the final mixed volume, `rate` the playback rate multiplier
    fn play(&mut self, sound: Sound, gain: f32, rate: f32);
}

/// Backend for headless runs: logs every trigger
#[derive(Debug, Default)]
pub struct LogBackend;

impl SoundBackend for LogBackend {
    fn play(&mut self, sound: Sound, gain: f32, rate: f32) {
        log::debug!("sound {} gain {:.2} rate {:.2}", sound.name(), gain, rate);
    }
}

/// Audio manager for the game
pub struct AudioManager<B> {
    backend: B,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<B: SoundBackend> AudioManager<B> {
    pub fn new(backend: B, settings: &Settings) -> Self {
        let mut manager = Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: settings.muted,
        };
        manager.set_master_volume(settings.master_volume);
        manager.set_sfx_volume(settings.sfx_volume);
        manager
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play one sound trigger
    pub fn play(&mut self, event: &SoundEvent) {
        let gain = self.effective_volume() * event.volume.clamp(0.0, 1.0);
        if gain <= 0.0 {
            return;
        }
        self.backend.play(event.sound, gain, event.pitch);
    }

    /// Play the sound carried by a game event, if any
    pub fn handle(&mut self, event: &GameEvent) {
        if let GameEvent::Sound(sound) = event {
            self.play(sound);
        }
    }

    #[cfg(test)]
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        played: Vec<(Sound, f32, f32)>,
    }

    impl SoundBackend for Recorder {
        fn play(&mut self, sound: Sound, gain: f32, rate: f32) {
            self.played.push((sound, gain, rate));
        }
    }

    fn trigger(sound: Sound, volume: f32, pitch: f32) -> SoundEvent {
        SoundEvent {
            sound,
            volume,
            pitch,
        }
    }

    #[test]
    fn test_volume_mixing() {
        let settings = Settings {
            master_volume: 0.5,
            sfx_volume: 0.5,
            ..Default::default()
        };
        let mut audio = AudioManager::new(Recorder::default(), &settings);
        audio.play(&trigger(Sound::RailHit, 0.8, 0.6));

        let (sound, gain, rate) = audio.backend().played[0];
        assert_eq!(sound, Sound::RailHit);
        assert!((gain - 0.2).abs() < 1e-6);
        assert_eq!(rate, 0.6);
    }

    #[test]
    fn test_mute_silences() {
        let mut audio = AudioManager::new(Recorder::default(), &Settings::default());
        audio.set_muted(true);
        audio.play(&trigger(Sound::BallHit, 1.0, 1.0));
        assert_eq!(audio.effective_volume(), 0.0);
        assert!(audio.backend().played.is_empty());

        audio.set_muted(false);
        audio.play(&trigger(Sound::BallHit, 1.0, 1.0));
        assert_eq!(audio.backend().played.len(), 1);
    }

    #[test]
    fn test_volume_clamped() {
        let mut audio = AudioManager::new(Recorder::default(), &Settings::default());
        audio.set_master_volume(3.0);
        audio.set_sfx_volume(-1.0);
        assert_eq!(audio.effective_volume(), 0.0);
        audio.set_sfx_volume(1.0);
        assert_eq!(audio.effective_volume(), 1.0);
    }

    #[test]
    fn test_handle_ignores_non_sound_events() {
        let mut audio = AudioManager::new(Recorder::default(), &Settings::default());
        audio.handle(&GameEvent::RackReset);
        audio.handle(&GameEvent::Sound(trigger(Sound::PocketDrop, 0.7, 1.0)));
        assert_eq!(audio.backend().played.len(), 1);
        assert_eq!(audio.backend().played[0].0, Sound::PocketDrop);
    }
}

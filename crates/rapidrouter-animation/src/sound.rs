//! Sound cues and the character-aware sound board
//!
//! Sounds are fire-and-forget: a failing backend is logged and ignored so a
//! missing audio device never stalls playback.

use rapidrouter_common::AppConfig;

use crate::event::{AnimationEvent, Callable};
use crate::stage::Audio;

/// A sample the audio backend knows how to play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Starting,
    Engine,
    Delivery,
    Win,
    Failure,
    Crash,
    Tension,
}

impl SoundCue {
    pub const ALL: [SoundCue; 7] = [
        SoundCue::Starting,
        SoundCue::Engine,
        SoundCue::Delivery,
        SoundCue::Win,
        SoundCue::Failure,
        SoundCue::Crash,
        SoundCue::Tension,
    ];

    /// Base file name of the sample
    pub fn file_stem(&self) -> &'static str {
        match self {
            SoundCue::Starting => "starting",
            SoundCue::Engine => "moving",
            SoundCue::Delivery => "delivery",
            SoundCue::Win => "win",
            SoundCue::Failure => "failure",
            SoundCue::Crash => "crash",
            SoundCue::Tension => "tension",
        }
    }

    /// The engine hum loops until stopped
    pub fn looping(&self) -> bool {
        matches!(self, SoundCue::Engine)
    }
}

/// What a producer asks for; the board turns it into cues for the current character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    Starting,
    StartEngine,
    StopEngine,
    Delivery,
    Win,
    Failure,
    Crash,
    Tension,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 8] = [
        SoundEffect::Starting,
        SoundEffect::StartEngine,
        SoundEffect::StopEngine,
        SoundEffect::Delivery,
        SoundEffect::Win,
        SoundEffect::Failure,
        SoundEffect::Crash,
        SoundEffect::Tension,
    ];

    /// Name carried by exported sound callables
    pub fn function_type(&self) -> &'static str {
        match self {
            SoundEffect::Starting => "sound.starting",
            SoundEffect::StartEngine => "sound.start_engine",
            SoundEffect::StopEngine => "sound.stop_engine",
            SoundEffect::Delivery => "sound.delivery",
            SoundEffect::Win => "sound.win",
            SoundEffect::Failure => "sound.failure",
            SoundEffect::Crash => "sound.crash",
            SoundEffect::Tension => "sound.tension",
        }
    }

    pub fn from_function_type(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|e| e.function_type() == name)
    }
}

/// Play a cue, dropping any backend error
pub fn safe_play<A: Audio + ?Sized>(audio: &mut A, cue: SoundCue) {
    if let Err(e) = audio.play(cue) {
        tracing::debug!("Sound '{}' skipped: {}", cue.file_stem(), e);
    }
}

/// Stop a cue, dropping any backend error
pub fn safe_stop<A: Audio + ?Sized>(audio: &mut A, cue: SoundCue) {
    if let Err(e) = audio.stop(cue) {
        tracing::debug!("Stopping '{}' failed: {}", cue.file_stem(), e);
    }
}

/// Maps sound effects to cues for the character on screen.
/// Only the van has a starting jingle and an engine; other characters
/// use the failure sound when they crash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundBoard {
    van: bool,
}

impl SoundBoard {
    pub fn new(van: bool) -> Self {
        Self { van }
    }

    /// Board for the character named in the configuration
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.is_van())
    }

    pub fn is_van(&self) -> bool {
        self.van
    }

    /// Perform an effect on an audio backend
    pub fn perform<A: Audio + ?Sized>(&self, audio: &mut A, effect: SoundEffect) {
        match effect {
            SoundEffect::Starting if self.van => safe_play(audio, SoundCue::Starting),
            SoundEffect::StartEngine if self.van => safe_play(audio, SoundCue::Engine),
            SoundEffect::StopEngine if self.van => safe_stop(audio, SoundCue::Engine),
            SoundEffect::Starting | SoundEffect::StartEngine | SoundEffect::StopEngine => {}
            SoundEffect::Delivery => safe_play(audio, SoundCue::Delivery),
            SoundEffect::Win => safe_play(audio, SoundCue::Win),
            SoundEffect::Failure => safe_play(audio, SoundCue::Failure),
            SoundEffect::Crash if self.van => safe_play(audio, SoundCue::Crash),
            SoundEffect::Crash => safe_play(audio, SoundCue::Failure),
            SoundEffect::Tension => safe_play(audio, SoundCue::Tension),
        }
    }

    /// A zero-length event that performs the effect when its bucket plays
    pub fn event(self, effect: SoundEffect) -> AnimationEvent {
        AnimationEvent::callable(Callable::named(effect.function_type(), move |stage| {
            self.perform(stage, effect)
        }))
    }

    pub fn mute<A: Audio + ?Sized>(&self, audio: &mut A) {
        audio.set_muted(true);
    }

    pub fn unmute<A: Audio + ?Sized>(&self, audio: &mut A) {
        audio.set_muted(false);
    }
}

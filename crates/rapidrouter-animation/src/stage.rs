//! Collaborators the dispatcher drives
//!
//! The playback core never draws, plays or shows anything itself. It talks to
//! a `Stage`: anything that can render the board, turn the fuel needle, open
//! modals, append transcript text and play sound cues.

use crate::error::AudioError;
use crate::event::{CrashContext, TurnDirection};
use crate::map::{Decor, Destination, LightColour, RoadMap, StartPosition, TrafficLight};
use crate::popup::Modal;
use crate::sound::SoundCue;

/// Board rendering. Durations are how long the visual transition should take.
pub trait Renderer {
    fn clear_all(&mut self);
    fn render_map(&mut self, map: &RoadMap);
    fn render_decor(&mut self, decor: &[Decor]);
    fn render_vehicles(&mut self, start: &StartPosition, count: usize);
    fn render_origin(&mut self, start: &StartPosition);
    fn render_destinations(&mut self, destinations: &[Destination]);
    fn render_traffic_lights(&mut self, lights: &[TrafficLight]);

    fn transition_traffic_light(&mut self, id: usize, colour: LightColour, duration_ms: u32);
    fn transition_destination(&mut self, id: usize, delivered: bool, duration_ms: u32);

    fn set_vehicle_position(&mut self, position: &StartPosition, id: usize);
    /// Jump every running animation of a vehicle to its end state
    fn skip_outstanding_animations(&mut self, id: usize);
    fn scroll_to_show(&mut self, id: usize);

    fn move_forward(&mut self, id: usize, duration_ms: u32);
    fn move_left(&mut self, id: usize, duration_ms: u32);
    fn move_right(&mut self, id: usize, duration_ms: u32);
    fn turn_around(&mut self, id: usize, direction: TurnDirection, duration_ms: u32);
    fn wait(&mut self, id: usize, duration_ms: u32);
    fn crash(&mut self, id: usize, duration_ms: u32, context: &CrashContext);
    fn deliver(&mut self, destination: usize, duration_ms: u32);
    fn remove_wreckage(&mut self);
}

/// Fuel gauge needle
pub trait FuelGauge {
    fn rotate_needle(&mut self, degrees: f32);
}

/// Modal popups
pub trait Presenter {
    fn open_modal(&mut self, modal: &Modal);
}

/// Console / transcript view
pub trait Transcript {
    fn append_text(&mut self, text: &str);
}

/// Sound output. Errors are reported, never fatal; see `sound::SoundBoard`.
pub trait Audio {
    fn play(&mut self, cue: SoundCue) -> Result<(), AudioError>;
    fn stop(&mut self, cue: SoundCue) -> Result<(), AudioError>;
    fn set_muted(&mut self, muted: bool);
}

/// Everything playback needs from its host
pub trait Stage: Renderer + FuelGauge + Presenter + Transcript + Audio {}

impl<T: Renderer + FuelGauge + Presenter + Transcript + Audio + ?Sized> Stage for T {}

//! Recording stage used by the unit tests

use crate::error::AudioError;
use crate::event::{CrashContext, TurnDirection};
use crate::map::{Decor, Destination, LightColour, RoadMap, StartPosition, TrafficLight};
use crate::popup::Modal;
use crate::sound::SoundCue;
use crate::stage::{Audio, FuelGauge, Presenter, Renderer, Transcript};

/// Logs every collaborator call as a short line, e.g. `"forward 0 500"`
#[derive(Debug, Default)]
pub struct Recorder {
    pub calls: Vec<String>,
    pub modals: Vec<Modal>,
    /// Make every audio call fail
    pub mute_device: bool,
}

impl Recorder {
    pub fn clear(&mut self) {
        self.calls.clear();
        self.modals.clear();
    }

    fn log(&mut self, line: String) {
        self.calls.push(line);
    }
}

impl Renderer for Recorder {
    fn clear_all(&mut self) {
        self.log("clear".into());
    }

    fn render_map(&mut self, map: &RoadMap) {
        self.log(format!("map {}", map.nodes.len()));
    }

    fn render_decor(&mut self, decor: &[Decor]) {
        self.log(format!("decor {}", decor.len()));
    }

    fn render_vehicles(&mut self, _start: &StartPosition, count: usize) {
        self.log(format!("vehicles {}", count));
    }

    fn render_origin(&mut self, start: &StartPosition) {
        self.log(format!("origin {}", start.current_node.0));
    }

    fn render_destinations(&mut self, destinations: &[Destination]) {
        self.log(format!("destinations {}", destinations.len()));
    }

    fn render_traffic_lights(&mut self, lights: &[TrafficLight]) {
        self.log(format!("lights {}", lights.len()));
    }

    fn transition_traffic_light(&mut self, id: usize, colour: LightColour, duration_ms: u32) {
        self.log(format!("light {} {} {}", id, colour.as_str(), duration_ms));
    }

    fn transition_destination(&mut self, id: usize, delivered: bool, duration_ms: u32) {
        self.log(format!("destination {} {} {}", id, delivered, duration_ms));
    }

    fn set_vehicle_position(&mut self, position: &StartPosition, id: usize) {
        self.log(format!("position {} {}", id, position.current_node.0));
    }

    fn skip_outstanding_animations(&mut self, id: usize) {
        self.log(format!("skip {}", id));
    }

    fn scroll_to_show(&mut self, id: usize) {
        self.log(format!("scroll {}", id));
    }

    fn move_forward(&mut self, id: usize, duration_ms: u32) {
        self.log(format!("forward {} {}", id, duration_ms));
    }

    fn move_left(&mut self, id: usize, duration_ms: u32) {
        self.log(format!("left {} {}", id, duration_ms));
    }

    fn move_right(&mut self, id: usize, duration_ms: u32) {
        self.log(format!("right {} {}", id, duration_ms));
    }

    fn turn_around(&mut self, id: usize, direction: TurnDirection, duration_ms: u32) {
        self.log(format!("turn_around {} {} {}", id, direction.as_str(), duration_ms));
    }

    fn wait(&mut self, id: usize, duration_ms: u32) {
        self.log(format!("wait {} {}", id, duration_ms));
    }

    fn crash(&mut self, id: usize, duration_ms: u32, context: &CrashContext) {
        self.log(format!(
            "crash {} {} {}",
            id,
            duration_ms,
            context.attempted_action.as_str()
        ));
    }

    fn deliver(&mut self, destination: usize, duration_ms: u32) {
        self.log(format!("deliver {} {}", destination, duration_ms));
    }

    fn remove_wreckage(&mut self) {
        self.log("wreckage".into());
    }
}

impl FuelGauge for Recorder {
    fn rotate_needle(&mut self, degrees: f32) {
        self.log(format!("needle {}", degrees));
    }
}

impl Presenter for Recorder {
    fn open_modal(&mut self, modal: &Modal) {
        self.log(format!("modal {}", modal.title));
        self.modals.push(modal.clone());
    }
}

impl Transcript for Recorder {
    fn append_text(&mut self, text: &str) {
        self.log(format!("text {}", text));
    }
}

impl Audio for Recorder {
    fn play(&mut self, cue: SoundCue) -> Result<(), AudioError> {
        if self.mute_device {
            return Err(AudioError::NoDevice);
        }
        self.log(format!("play {}", cue.file_stem()));
        Ok(())
    }

    fn stop(&mut self, cue: SoundCue) -> Result<(), AudioError> {
        if self.mute_device {
            return Err(AudioError::NoDevice);
        }
        self.log(format!("stop {}", cue.file_stem()));
        Ok(())
    }

    fn set_muted(&mut self, muted: bool) {
        self.log(format!("muted {}", muted));
    }
}

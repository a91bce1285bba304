//! A stage that narrates playback through `tracing`

use rapidrouter_animation::event::{CrashContext, TurnDirection};
use rapidrouter_animation::map::{Decor, Destination, LightColour, StartPosition, TrafficLight};
use rapidrouter_animation::popup::ModalLine;
use rapidrouter_animation::{
    Audio, AudioError, FuelGauge, Modal, Presenter, Renderer, RoadMap, SoundCue, Transcript,
};

pub struct LogStage<A> {
    audio: A,
    /// Title of every modal opened, in order
    pub modals: Vec<String>,
    pub transcript: Vec<String>,
    /// Van manoeuvres drawn (crashes included)
    pub moves: usize,
    pub needle: f32,
}

impl<A: Audio> LogStage<A> {
    pub fn new(audio: A) -> Self {
        Self {
            audio,
            modals: Vec::new(),
            transcript: Vec::new(),
            moves: 0,
            needle: 0.0,
        }
    }

    #[cfg(test)]
    pub fn audio(&self) -> &A {
        &self.audio
    }

    fn manoeuvre(&mut self, id: usize, what: &str, duration_ms: u32) {
        self.moves += 1;
        tracing::info!("Van {} {} ({}ms)", id, what, duration_ms);
    }
}

fn describe(line: &ModalLine) -> String {
    match line {
        ModalLine::Score {
            label, score, max, ..
        } => format!("{}{}/{}", label, score, max),
        ModalLine::Text(text) => text.clone(),
    }
}

impl<A: Audio> Renderer for LogStage<A> {
    fn clear_all(&mut self) {
        tracing::debug!("Clear board");
    }

    fn render_map(&mut self, map: &RoadMap) {
        tracing::debug!("Map with {} nodes", map.nodes.len());
    }

    fn render_decor(&mut self, decor: &[Decor]) {
        tracing::debug!("{} decor items", decor.len());
    }

    fn render_vehicles(&mut self, start: &StartPosition, count: usize) {
        tracing::debug!("{} vehicles at node {}", count, start.current_node.0);
    }

    fn render_origin(&mut self, start: &StartPosition) {
        tracing::debug!("Origin at node {}", start.current_node.0);
    }

    fn render_destinations(&mut self, destinations: &[Destination]) {
        tracing::debug!("{} destinations", destinations.len());
    }

    fn render_traffic_lights(&mut self, lights: &[TrafficLight]) {
        tracing::debug!("{} traffic lights", lights.len());
    }

    fn transition_traffic_light(&mut self, id: usize, colour: LightColour, duration_ms: u32) {
        tracing::info!("Light {} -> {} ({}ms)", id, colour.as_str(), duration_ms);
    }

    fn transition_destination(&mut self, id: usize, delivered: bool, _duration_ms: u32) {
        tracing::debug!("Destination {} delivered={}", id, delivered);
    }

    fn set_vehicle_position(&mut self, position: &StartPosition, id: usize) {
        tracing::debug!("Van {} placed on node {}", id, position.current_node.0);
    }

    fn skip_outstanding_animations(&mut self, _id: usize) {}

    fn scroll_to_show(&mut self, _id: usize) {}

    fn move_forward(&mut self, id: usize, duration_ms: u32) {
        self.manoeuvre(id, "forward", duration_ms);
    }

    fn move_left(&mut self, id: usize, duration_ms: u32) {
        self.manoeuvre(id, "left", duration_ms);
    }

    fn move_right(&mut self, id: usize, duration_ms: u32) {
        self.manoeuvre(id, "right", duration_ms);
    }

    fn turn_around(&mut self, id: usize, direction: TurnDirection, duration_ms: u32) {
        let what = format!("turns around {}", direction.as_str().to_lowercase());
        self.manoeuvre(id, &what, duration_ms);
    }

    fn wait(&mut self, id: usize, duration_ms: u32) {
        self.manoeuvre(id, "waits", duration_ms);
    }

    fn crash(&mut self, id: usize, duration_ms: u32, context: &CrashContext) {
        self.moves += 1;
        tracing::warn!(
            "Van {} crashed trying {} between nodes {} and {} ({}ms)",
            id,
            context.attempted_action.as_str(),
            context.previous_node.0,
            context.current_node.0,
            duration_ms
        );
    }

    fn deliver(&mut self, destination: usize, duration_ms: u32) {
        tracing::info!("Delivered to destination {} ({}ms)", destination, duration_ms);
    }

    fn remove_wreckage(&mut self) {
        tracing::debug!("Wreckage cleared");
    }
}

impl<A: Audio> FuelGauge for LogStage<A> {
    fn rotate_needle(&mut self, degrees: f32) {
        self.needle = degrees;
        tracing::debug!("Fuel needle at {}°", degrees);
    }
}

impl<A: Audio> Presenter for LogStage<A> {
    fn open_modal(&mut self, modal: &Modal) {
        let body: Vec<String> = modal.body.iter().map(describe).collect();
        tracing::info!("[{}] {}", modal.title, body.join(" | "));
        let buttons: Vec<&str> = modal.buttons.iter().map(|b| b.label()).collect();
        tracing::debug!("Buttons: {}", buttons.join(", "));
        self.modals.push(modal.title.clone());
    }
}

impl<A: Audio> Transcript for LogStage<A> {
    fn append_text(&mut self, text: &str) {
        tracing::info!("> {}", text);
        self.transcript.push(text.to_string());
    }
}

impl<A: Audio> Audio for LogStage<A> {
    fn play(&mut self, cue: SoundCue) -> Result<(), AudioError> {
        self.audio.play(cue)
    }

    fn stop(&mut self, cue: SoundCue) -> Result<(), AudioError> {
        self.audio.stop(cue)
    }

    fn set_muted(&mut self, muted: bool) {
        self.audio.set_muted(muted)
    }
}

//! Event dispatcher: forwards one event to the stage and reports how long it occupies the timeline

use rapidrouter_common::PlaybackConfig;

use crate::event::{AnimationEvent, EventKind, VanAction, VanMove};
use crate::gauge::update_fuel_gauge;
use crate::popup::PopupComposer;
use crate::stage::Stage;

#[derive(Debug, Clone, Default)]
pub struct EventDispatcher {
    playback: PlaybackConfig,
    popups: PopupComposer,
}

impl EventDispatcher {
    pub fn new(playback: PlaybackConfig, popups: PopupComposer) -> Self {
        Self { playback, popups }
    }

    pub fn playback(&self) -> &PlaybackConfig {
        &self.playback
    }

    pub fn popups_mut(&mut self) -> &mut PopupComposer {
        &mut self.popups
    }

    /// Perform one event. Returns its duration in milliseconds.
    pub fn dispatch(&self, event: AnimationEvent, stage: &mut dyn Stage) -> u32 {
        let AnimationEvent {
            kind,
            animation_length,
            description,
        } = event;
        if let Some(text) = &description {
            tracing::trace!("{}: {}", kind.tag(), text);
        }

        // a zero override counts as unset for everything but callables
        let length = animation_length
            .filter(|&ms| ms != 0)
            .unwrap_or(self.playback.default_animation_ms);
        match kind {
            EventKind::Callable(callable) => {
                tracing::debug!("Callable {:?}", callable.function_type());
                callable.invoke(stage);
                animation_length.unwrap_or(0)
            }
            EventKind::Van(van) => self.perform_van(van, length, stage),
            EventKind::Popup(popup) => {
                tracing::debug!("Popup {}", popup.kind.as_str());
                let modal = self.popups.compose(&popup);
                stage.open_modal(&modal);
                length
            }
            EventKind::TrafficLight { id, colour } => {
                // the light finishes changing halfway through its slot
                stage.transition_traffic_light(id, colour, length / 2);
                length
            }
            EventKind::Console { text } => {
                stage.append_text(&text);
                length
            }
        }
    }

    fn perform_van(&self, van: VanMove, mut length: u32, stage: &mut dyn Stage) -> u32 {
        let id = van.id;
        tracing::debug!("Van {} {}", id, van.action.kind().as_str());

        // Keep earlier animations of this van from drifting out of sync
        stage.skip_outstanding_animations(id);
        stage.scroll_to_show(id);

        match van.action {
            VanAction::Forward => stage.move_forward(id, length),
            VanAction::TurnLeft => stage.move_left(id, length),
            VanAction::TurnRight => stage.move_right(id, length),
            VanAction::TurnAround(direction) => {
                length = length.saturating_mul(self.playback.turn_around_factor);
                stage.turn_around(id, direction, length);
            }
            VanAction::Wait => stage.wait(id, length),
            VanAction::Crash(context) => {
                stage.crash(id, length, &context);
                length = length.saturating_add(self.playback.crash_hold_ms);
            }
            // A delivery is also an observation; observing draws nothing
            VanAction::Deliver { destination } => stage.deliver(destination, length),
            VanAction::Observe => {}
        }

        if let Some(fuel) = van.fuel {
            update_fuel_gauge(stage, fuel);
        }
        length
    }
}

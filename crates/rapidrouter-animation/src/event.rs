//! Animation events
//!
//! One `AnimationEvent` is one thing that happens on the board at a logical
//! timestamp: a van manoeuvre, a traffic light change, a popup, a console
//! line, or an arbitrary callable (sound cues, UI toggles).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::map::{LightColour, NodeId};
use crate::stage::Stage;

/// Flat name of a van action, as it appears in exported queues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VanActionKind {
    Forward,
    TurnLeft,
    TurnRight,
    TurnAroundForward,
    TurnAroundRight,
    TurnAroundLeft,
    Wait,
    Crash,
    Deliver,
    Observe,
}

impl VanActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VanActionKind::Forward => "FORWARD",
            VanActionKind::TurnLeft => "TURN_LEFT",
            VanActionKind::TurnRight => "TURN_RIGHT",
            VanActionKind::TurnAroundForward => "TURN_AROUND_FORWARD",
            VanActionKind::TurnAroundRight => "TURN_AROUND_RIGHT",
            VanActionKind::TurnAroundLeft => "TURN_AROUND_LEFT",
            VanActionKind::Wait => "WAIT",
            VanActionKind::Crash => "CRASH",
            VanActionKind::Deliver => "DELIVER",
            VanActionKind::Observe => "OBSERVE",
        }
    }
}

/// Which way a turn-around manoeuvre arcs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnDirection {
    Forward,
    Right,
    Left,
}

impl TurnDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnDirection::Forward => "FORWARD",
            TurnDirection::Right => "RIGHT",
            TurnDirection::Left => "LEFT",
        }
    }
}

/// Where a van was and what it tried to do when it crashed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrashContext {
    pub previous_node: NodeId,
    pub current_node: NodeId,
    pub start_node: NodeId,
    pub attempted_action: VanActionKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VanAction {
    Forward,
    TurnLeft,
    TurnRight,
    TurnAround(TurnDirection),
    Wait,
    Crash(CrashContext),
    Deliver { destination: usize },
    Observe,
}

impl VanAction {
    pub fn kind(&self) -> VanActionKind {
        match self {
            VanAction::Forward => VanActionKind::Forward,
            VanAction::TurnLeft => VanActionKind::TurnLeft,
            VanAction::TurnRight => VanActionKind::TurnRight,
            VanAction::TurnAround(TurnDirection::Forward) => VanActionKind::TurnAroundForward,
            VanAction::TurnAround(TurnDirection::Right) => VanActionKind::TurnAroundRight,
            VanAction::TurnAround(TurnDirection::Left) => VanActionKind::TurnAroundLeft,
            VanAction::Wait => VanActionKind::Wait,
            VanAction::Crash(_) => VanActionKind::Crash,
            VanAction::Deliver { .. } => VanActionKind::Deliver,
            VanAction::Observe => VanActionKind::Observe,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VanMove {
    /// Vehicle lane, `0..vans`
    pub id: usize,
    pub action: VanAction,
    /// Fuel left after the move, in percent
    pub fuel: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PopupKind {
    Win,
    Fail,
    Warning,
}

impl PopupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PopupKind::Win => "WIN",
            PopupKind::Fail => "FAIL",
            PopupKind::Warning => "WARNING",
        }
    }
}

/// Coin row shown next to a score line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coins {
    pub whole: u32,
    pub half: u32,
    pub zero: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Performance {
    ScorePerfect,
    ScoreGood,
    ScoreBad,
}

/// Score breakdown carried by a WIN popup
#[derive(Debug, Clone, PartialEq)]
pub struct WinScore {
    pub route_coins: Coins,
    pub path_length_score: f32,
    pub max_score_for_path_length: f32,
    pub instr_coins: Coins,
    pub instr_score: f32,
    /// Zero when the level does not score the instruction count
    pub max_score_for_number_of_instructions: f32,
    pub total_score: f32,
    pub max_score: f32,
    pub performance: Performance,
    pub path_score_disabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub kind: PopupKind,
    pub message: String,
    /// Offer the level hint behind a button
    pub hint: bool,
    pub score: Option<WinScore>,
}

/// Deferred action run when its bucket is dispatched
pub type Action = Box<dyn FnOnce(&mut dyn Stage)>;

pub struct Callable {
    function_type: Option<String>,
    action: Action,
}

impl Callable {
    pub fn new(action: impl FnOnce(&mut dyn Stage) + 'static) -> Self {
        Self {
            function_type: None,
            action: Box::new(action),
        }
    }

    /// A callable with a name a host without live functions can switch on
    pub fn named(function_type: &str, action: impl FnOnce(&mut dyn Stage) + 'static) -> Self {
        Self {
            function_type: Some(function_type.to_string()),
            action: Box::new(action),
        }
    }

    pub fn function_type(&self) -> Option<&str> {
        self.function_type.as_deref()
    }

    pub fn invoke(self, stage: &mut dyn Stage) {
        (self.action)(stage)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("function_type", &self.function_type)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub enum EventKind {
    Callable(Callable),
    Van(VanMove),
    Popup(Popup),
    TrafficLight { id: usize, colour: LightColour },
    Console { text: String },
}

impl EventKind {
    /// Event tag used in exported queues
    pub fn tag(&self) -> &'static str {
        match self {
            EventKind::Callable(_) => "callable",
            EventKind::Van(_) => "van",
            EventKind::Popup(_) => "popup",
            EventKind::TrafficLight { .. } => "trafficlight",
            EventKind::Console { .. } => "console",
        }
    }
}

#[derive(Debug)]
pub struct AnimationEvent {
    pub kind: EventKind,
    /// Explicit duration in milliseconds, replacing the kind's default
    pub animation_length: Option<u32>,
    pub description: Option<String>,
}

impl AnimationEvent {
    fn of(kind: EventKind) -> Self {
        Self {
            kind,
            animation_length: None,
            description: None,
        }
    }

    pub fn van(id: usize, action: VanAction) -> Self {
        Self::of(EventKind::Van(VanMove { id, action, fuel: None }))
    }

    pub fn forward(id: usize) -> Self {
        Self::van(id, VanAction::Forward)
    }

    pub fn turn_around(id: usize, direction: TurnDirection) -> Self {
        Self::van(id, VanAction::TurnAround(direction))
    }

    pub fn crash(id: usize, context: CrashContext) -> Self {
        Self::van(id, VanAction::Crash(context))
    }

    pub fn deliver(id: usize, destination: usize) -> Self {
        Self::van(id, VanAction::Deliver { destination })
    }

    pub fn popup(kind: PopupKind, message: &str) -> Self {
        Self::of(EventKind::Popup(Popup {
            kind,
            message: message.to_string(),
            hint: false,
            score: None,
        }))
    }

    pub fn win(message: &str, score: WinScore) -> Self {
        Self::of(EventKind::Popup(Popup {
            kind: PopupKind::Win,
            message: message.to_string(),
            hint: false,
            score: Some(score),
        }))
    }

    pub fn traffic_light(id: usize, colour: LightColour) -> Self {
        Self::of(EventKind::TrafficLight { id, colour })
    }

    pub fn console(text: &str) -> Self {
        Self::of(EventKind::Console { text: text.to_string() })
    }

    pub fn callable(callable: Callable) -> Self {
        Self::of(EventKind::Callable(callable))
    }

    /// Builder: override the duration
    pub fn with_length(mut self, ms: u32) -> Self {
        self.animation_length = Some(ms);
        self
    }

    /// Builder: attach a description
    pub fn with_description(mut self, text: &str) -> Self {
        self.description = Some(text.to_string());
        self
    }

    /// Builder: attach a fuel reading. Only van events carry fuel; others ignore it.
    pub fn with_fuel(mut self, percent: f32) -> Self {
        if let EventKind::Van(van) = &mut self.kind {
            van.fuel = Some(percent);
        }
        self
    }

    /// Builder: offer the hint on a popup. Ignored on other events.
    pub fn with_hint(mut self) -> Self {
        if let EventKind::Popup(popup) = &mut self.kind {
            popup.hint = true;
        }
        self
    }
}

//! Rapid Router playback
//!
//! A program run produces an `AnimationQueue`: events grouped by logical
//! timestamp. The `Scheduler` replays it bucket by bucket against a `Stage`,
//! waiting out the longest event of each bucket before moving on.

pub mod dispatch;
pub mod error;
pub mod event;
pub mod export;
pub mod gauge;
pub mod map;
pub mod popup;
pub mod queue;
pub mod scheduler;
pub mod sound;
pub mod stage;
pub mod ticks;

#[cfg(test)]
mod testing;

pub use dispatch::EventDispatcher;
pub use error::{AudioError, ExportError, SchedulerError};
pub use event::{AnimationEvent, Callable, EventKind, PopupKind, VanAction, VanActionKind};
pub use export::{export_program, import_queue, serialize_queue, Producer};
pub use map::{Coordinate, Level, NodeId, RoadMap};
pub use popup::{Modal, PopupComposer};
pub use queue::AnimationQueue;
pub use scheduler::{PlaybackState, Scheduler, StepCallback};
pub use sound::{SoundBoard, SoundCue, SoundEffect};
pub use stage::{Audio, FuelGauge, Presenter, Renderer, Stage, Transcript};
pub use ticks::{ManualTicks, SystemTicks, TickSource};

pub use rapidrouter_common::{AppConfig, EditorTab, LevelFlags, PlaybackConfig};

use thiserror::Error;

use crate::map::{Coordinate, NodeId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("Animation queue used before reset")]
    NotReset,
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Invalid animation JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No road node at ({}, {})", .0.x, .0.y)]
    UnknownNode(Coordinate),

    #[error("Node {} is not part of the road map", .0.0)]
    DanglingNode(NodeId),

    #[error("Event of type '{kind}' is missing field '{field}'")]
    MissingField { kind: String, field: &'static str },

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error("Producer failed: {0}")]
    Producer(String),
}

/// Failure reported by an audio backend. Callers log and drop it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    #[error("No audio output available")]
    NoDevice,

    #[error("Sound '{0}' could not be loaded: {1}")]
    Load(&'static str, String),
}

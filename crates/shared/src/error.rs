use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Soft-failure taxonomy of the map screen. None of these is fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    NetworkFailure,
    PermissionDenied,
    MalformedEvent,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedFeature {
    #[error("event {id}: unparseable start timestamp '{value}'")]
    InvalidTimestamp { id: i64, value: String },
    #[error("event {id}: coordinates out of range ({lng}, {lat})")]
    InvalidCoordinates { id: i64, lng: f64, lat: f64 },
}

impl MalformedFeature {
    pub fn kind(&self) -> FailureKind {
        FailureKind::MalformedEvent
    }
}

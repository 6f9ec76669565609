//! Backend-to-UI events and error modeling for the screen controller.

use client_core::{EventSnapshot, FetchError};
use shared::{
    domain::{DateKey, UserPosition},
    error::FailureKind,
};

/// Tags one events request issued by the screen. Generations grow across all
/// dates, so only the most recent ticket is ever displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestTicket {
    pub key: DateKey,
    pub generation: u64,
}

pub enum UiEvent {
    EventsLoaded {
        ticket: RequestTicket,
        events: EventSnapshot,
    },
    EventsFailed {
        ticket: RequestTicket,
        error: UiError,
    },
    LocationChanged(UserPosition),
    /// Permission was denied; nothing more will arrive for this session.
    LocationUnavailable,
}

pub fn classify_fetch_failure(err: &FetchError) -> String {
    match err {
        FetchError::Transport(source) if source.is_timeout() => {
            "Events request timed out; pick the date again to retry.".to_string()
        }
        FetchError::Transport(source) if source.is_connect() => {
            "Events server unreachable; check your connection.".to_string()
        }
        FetchError::Transport(source) if source.is_decode() => {
            "Events server sent a response we could not read.".to_string()
        }
        FetchError::Status { status } if *status >= 500 => {
            format!("Events server is having trouble (HTTP {status}); try again shortly.")
        }
        other => format!("Could not load events: {other}"),
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    kind: FailureKind,
    message: String,
}

impl UiError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// `None` for a discarded stale response, which is not worth reporting.
    pub fn from_fetch_error(err: &FetchError) -> Option<Self> {
        let kind = err.kind()?;
        Some(Self::new(kind, classify_fetch_failure(err)))
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
#[path = "tests/events_tests.rs"]
mod tests;

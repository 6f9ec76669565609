//! Glue toward the map rendering surface: marker derivation, camera
//! commands, and a surface that only logs what it is asked to draw.

use std::{sync::Arc, time::Duration};

use client_core::EventSnapshot;
use shared::domain::{Event, EventId, GeoPoint, UserPosition};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: EventId,
    pub coordinate: GeoPoint,
    /// Venue logo drawn inside the marker.
    pub logo_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraCommand {
    pub center: GeoPoint,
    /// Latitude/longitude span of the visible region; smaller is closer.
    pub zoom_span: f64,
    pub animated: bool,
    pub duration: Duration,
}

impl CameraCommand {
    pub fn jump_to(center: GeoPoint, zoom_span: f64) -> Self {
        Self {
            center,
            zoom_span,
            animated: false,
            duration: Duration::ZERO,
        }
    }
}

/// Taps reported by the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapTap {
    Marker(EventId),
    Background,
}

pub trait MapSurface {
    fn set_markers(&mut self, markers: &[Marker]);
    fn move_camera(&mut self, command: CameraCommand);
    fn set_user_position(&mut self, position: Option<UserPosition>);
}

pub fn derive_markers(events: &[Event]) -> Vec<Marker> {
    events
        .iter()
        .map(|event| Marker {
            id: event.id,
            coordinate: event.location,
            logo_url: event.venue.logo.clone(),
        })
        .collect()
}

/// Marker list memoized on snapshot identity: a new list is derived only
/// when a different snapshot comes in.
pub struct MarkerCache {
    source: Option<EventSnapshot>,
    markers: Arc<[Marker]>,
    derivations: usize,
}

impl MarkerCache {
    pub fn markers_for(&mut self, snapshot: &EventSnapshot) -> Arc<[Marker]> {
        let reuse = self
            .source
            .as_ref()
            .is_some_and(|source| source.ptr_eq(snapshot));
        if !reuse {
            self.markers = derive_markers(snapshot).into();
            self.source = Some(snapshot.clone());
            self.derivations += 1;
        }
        self.markers.clone()
    }

    pub fn derivations(&self) -> usize {
        self.derivations
    }
}

impl Default for MarkerCache {
    fn default() -> Self {
        Self {
            source: None,
            markers: Vec::new().into(),
            derivations: 0,
        }
    }
}

/// Surface for headless runs: keeps the last state and traces every call.
#[derive(Debug, Default)]
pub struct TracingMapSurface {
    markers: Vec<Marker>,
    camera: Option<CameraCommand>,
    user_position: Option<UserPosition>,
}

impl TracingMapSurface {
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn camera(&self) -> Option<CameraCommand> {
        self.camera
    }

    pub fn user_position(&self) -> Option<UserPosition> {
        self.user_position
    }
}

impl MapSurface for TracingMapSurface {
    fn set_markers(&mut self, markers: &[Marker]) {
        debug!(count = markers.len(), "map markers replaced");
        self.markers = markers.to_vec();
    }

    fn move_camera(&mut self, command: CameraCommand) {
        info!(
            lat = command.center.lat,
            lng = command.center.lng,
            span = command.zoom_span,
            animated = command.animated,
            duration_ms = command.duration.as_millis() as u64,
            "map camera moved"
        );
        self.camera = Some(command);
    }

    fn set_user_position(&mut self, position: Option<UserPosition>) {
        debug!(?position, "user marker updated");
        self.user_position = position;
    }
}

#[cfg(test)]
#[path = "tests/map_tests.rs"]
mod tests;

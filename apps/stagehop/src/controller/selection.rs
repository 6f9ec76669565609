//! Selected event, its same-venue same-day group, and the carousel over it.

use std::time::Duration;

use shared::domain::{Event, GeoPoint};
use tracing::debug;

use crate::{
    controller::gesture::{DragThresholds, DragRelease, SwipeDirection, CAROUSEL_SWIPE},
    map::CameraCommand,
};

/// The camera centres this far south of the venue so the detail popup does
/// not cover the marker.
pub const SELECTION_LATITUDE_OFFSET: f64 = 0.004;
pub const SELECTION_ZOOM_SPAN: f64 = 0.02;
pub const SELECTION_CAMERA_DURATION: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    event: Event,
    group: Vec<Event>,
    index: usize,
}

impl Selection {
    pub fn event(&self) -> &Event {
        &self.event
    }

    /// Co-located events in fetch order; always contains [`Selection::event`].
    pub fn group(&self) -> &[Event] {
        &self.group
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

/// Events sharing `event`'s venue and calendar day, in the order of `events`.
pub fn co_located_group(events: &[Event], event: &Event) -> Vec<Event> {
    events
        .iter()
        .filter(|candidate| candidate.is_co_located_with(event))
        .cloned()
        .collect()
}

pub fn selection_camera(event: &Event) -> CameraCommand {
    CameraCommand {
        center: GeoPoint::new(
            event.location.lat - SELECTION_LATITUDE_OFFSET,
            event.location.lng,
        ),
        zoom_span: SELECTION_ZOOM_SPAN,
        animated: true,
        duration: SELECTION_CAMERA_DURATION,
    }
}

#[derive(Debug, Clone)]
pub struct SelectionController {
    selection: Option<Selection>,
    swipe: DragThresholds,
}

impl SelectionController {
    pub fn new() -> Self {
        Self {
            selection: None,
            swipe: CAROUSEL_SWIPE,
        }
    }

    /// Selects `event` out of `events` and returns the camera move that
    /// brings its venue into view. A later call simply replaces the earlier
    /// selection.
    pub fn select(&mut self, events: &[Event], event: &Event) -> CameraCommand {
        let mut group = co_located_group(events, event);
        let index = match group.iter().position(|candidate| candidate.id == event.id) {
            Some(index) => index,
            None => {
                group = vec![event.clone()];
                0
            }
        };
        debug!(
            event_id = event.id.0,
            venue_id = event.venue.id.0,
            group = group.len(),
            index,
            "event selected"
        );
        self.selection = Some(Selection {
            event: event.clone(),
            group,
            index,
        });
        selection_camera(event)
    }

    /// Carousel step for a horizontal release on the popup. Needs at least
    /// two events in the group and a swipe past the thresholds; returns the
    /// newly shown event. The camera stays put since the venue is the same.
    pub fn swipe_horizontal(&mut self, release: DragRelease) -> Option<&Event> {
        let selection = self.selection.as_mut()?;
        let len = selection.group.len();
        if len < 2 {
            return None;
        }

        selection.index = match SwipeDirection::classify(release, self.swipe)? {
            SwipeDirection::Next => (selection.index + 1) % len,
            SwipeDirection::Previous => (selection.index + len - 1) % len,
        };
        selection.event = selection.group[selection.index].clone();
        Some(&selection.event)
    }

    /// Drops the selection. The sheet is the caller's business.
    pub fn clear(&mut self) {
        self.selection = None;
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn selected(&self) -> Option<&Event> {
        self.selection.as_ref().map(Selection::event)
    }

    pub fn has_selection(&self) -> bool {
        self.selection.is_some()
    }
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/selection_tests.rs"]
mod tests;

//! Bottom-sheet position state machine.
//!
//! The transition table is a pure function of the incoming event. Playback
//! belongs to whatever drives the animation: the controller hands out a
//! [`SheetAnimation`] and only records the new position when the driver
//! reports that exact animation as finished. A gesture that lands while an
//! animation is running therefore still sees the previous position.

use std::time::Duration;

use crate::controller::gesture::{DragThresholds, DragRelease, HANDLEBAR_DISMISS, POPUP_DISMISS};

pub const SHEET_TRANSITION: Duration = Duration::from_millis(300);
pub const SHEET_INTRO: Duration = Duration::from_millis(500);
/// Fraction of the viewport the sheet covers when open.
pub const SHEET_HEIGHT_RATIO: f32 = 0.4;
/// Extra travel past the sheet height so the closed sheet is fully hidden.
pub const SHEET_CLOSED_MARGIN: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetPosition {
    Open,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SheetEvent {
    BackgroundTap { has_selection: bool },
    EventSelected,
    HandlebarReleased(DragRelease),
    PopupReleased(DragRelease),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetThresholds {
    pub handlebar: DragThresholds,
    pub popup: DragThresholds,
}

impl Default for SheetThresholds {
    fn default() -> Self {
        Self {
            handlebar: HANDLEBAR_DISMISS,
            popup: POPUP_DISMISS,
        }
    }
}

/// Transition table. `None` leaves the sheet where it is.
pub fn next_position(event: SheetEvent, thresholds: &SheetThresholds) -> Option<SheetPosition> {
    match event {
        SheetEvent::BackgroundTap {
            has_selection: true,
        } => Some(SheetPosition::Open),
        SheetEvent::BackgroundTap {
            has_selection: false,
        } => None,
        SheetEvent::EventSelected => Some(SheetPosition::Closed),
        SheetEvent::HandlebarReleased(release) => {
            if thresholds.handlebar.is_dismiss(release) {
                Some(SheetPosition::Closed)
            } else {
                Some(SheetPosition::Open)
            }
        }
        SheetEvent::PopupReleased(release) => thresholds
            .popup
            .is_dismiss(release)
            .then_some(SheetPosition::Open),
    }
}

pub fn closed_offset_for_viewport(viewport_height: f32) -> f32 {
    viewport_height * SHEET_HEIGHT_RATIO + SHEET_CLOSED_MARGIN
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetAnimation {
    pub id: AnimationId,
    pub from: f32,
    pub to: f32,
    pub target: SheetPosition,
    pub duration: Duration,
}

impl SheetAnimation {
    /// Offset `elapsed` into the tween, eased in and out. Never leaves the
    /// `[from, to]` segment.
    pub fn sample(&self, elapsed: Duration) -> f32 {
        if self.duration.is_zero() {
            return self.to;
        }
        let t = (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0);
        let eased = t * t * (3.0 - 2.0 * t);
        self.from + (self.to - self.from) * eased
    }
}

#[derive(Debug, Clone)]
pub struct SheetController {
    closed_offset: f32,
    thresholds: SheetThresholds,
    position: SheetPosition,
    offset: f32,
    in_flight: Option<SheetAnimation>,
    next_id: u64,
}

impl SheetController {
    /// Starts hidden at the closed offset and returns the intro animation
    /// that brings the sheet up. A negative or NaN offset collapses to 0.
    pub fn mount(closed_offset: f32, thresholds: SheetThresholds) -> (Self, SheetAnimation) {
        let closed_offset = closed_offset.max(0.0);
        let mut sheet = Self {
            closed_offset,
            thresholds,
            position: SheetPosition::Closed,
            offset: closed_offset,
            in_flight: None,
            next_id: 0,
        };
        let intro = sheet.animate_to(SheetPosition::Open, SHEET_INTRO);
        (sheet, intro)
    }

    /// Applies the transition table; a resulting transition replaces any
    /// animation still in flight.
    pub fn handle(&mut self, event: SheetEvent) -> Option<SheetAnimation> {
        let target = next_position(event, &self.thresholds)?;
        Some(self.animate_to(target, SHEET_TRANSITION))
    }

    pub fn animate_to(&mut self, target: SheetPosition, duration: Duration) -> SheetAnimation {
        self.next_id += 1;
        let animation = SheetAnimation {
            id: AnimationId(self.next_id),
            from: self.offset,
            to: self.offset_of(target),
            target,
            duration,
        };
        self.in_flight = Some(animation);
        animation
    }

    /// Intermediate offset reported by the driver while a tween plays.
    pub fn set_offset(&mut self, offset: f32) {
        self.offset = offset.clamp(0.0, self.closed_offset);
    }

    /// Completion callback. Returns `false` for an animation that was
    /// already superseded; only the current one settles the sheet.
    pub fn complete(&mut self, id: AnimationId) -> bool {
        match self.in_flight {
            Some(animation) if animation.id == id => {
                self.position = animation.target;
                self.offset = animation.to;
                self.in_flight = None;
                true
            }
            _ => false,
        }
    }

    /// Settled position. Not updated until the running animation completes.
    pub fn position(&self) -> SheetPosition {
        self.position
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn in_flight(&self) -> Option<&SheetAnimation> {
        self.in_flight.as_ref()
    }

    pub fn is_animating(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn offset_of(&self, position: SheetPosition) -> f32 {
        match position {
            SheetPosition::Open => 0.0,
            SheetPosition::Closed => self.closed_offset,
        }
    }
}

#[cfg(test)]
#[path = "tests/sheet_tests.rs"]
mod tests;

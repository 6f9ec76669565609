//! Drag release classification and single-axis arbitration for pan gestures.

/// Translation and velocity of a released drag along one axis. Positive
/// values point down (vertical) or right (horizontal).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragRelease {
    pub translation: f32,
    pub velocity: f32,
}

impl DragRelease {
    pub fn new(translation: f32, velocity: f32) -> Self {
        Self {
            translation,
            velocity,
        }
    }
}

/// Distance and velocity a release has to exceed to count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragThresholds {
    pub distance: f32,
    pub velocity: f32,
}

pub const HANDLEBAR_DISMISS: DragThresholds = DragThresholds {
    distance: 100.0,
    velocity: 200.0,
};

pub const POPUP_DISMISS: DragThresholds = DragThresholds {
    distance: 50.0,
    velocity: 200.0,
};

pub const CAROUSEL_SWIPE: DragThresholds = DragThresholds {
    distance: 50.0,
    velocity: 200.0,
};

impl DragThresholds {
    /// Downward release past both the distance and the velocity threshold.
    /// Either one alone is not enough.
    pub fn is_dismiss(&self, release: DragRelease) -> bool {
        release.translation > self.distance && release.velocity > self.velocity
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    /// Leftward swipe, advances the carousel.
    Next,
    /// Rightward swipe, goes back.
    Previous,
}

impl SwipeDirection {
    /// Distance and velocity must both clear the thresholds and point the same way.
    pub fn classify(release: DragRelease, thresholds: DragThresholds) -> Option<Self> {
        if release.translation < -thresholds.distance && release.velocity < -thresholds.velocity {
            Some(SwipeDirection::Next)
        } else if release.translation > thresholds.distance
            && release.velocity > thresholds.velocity
        {
            Some(SwipeDirection::Previous)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

pub const AXIS_LOCK_SLOP: f32 = 10.0;

/// Routes one drag to exactly one axis. The dominant axis is fixed once the
/// drag has moved `slop` units from its origin and holds until release.
#[derive(Debug, Clone)]
pub struct DragArbiter {
    slop: f32,
    locked: Option<Axis>,
}

impl DragArbiter {
    pub fn new(slop: f32) -> Self {
        Self { slop, locked: None }
    }

    pub fn locked_axis(&self) -> Option<Axis> {
        self.locked
    }

    /// Feeds the cumulative translation since the drag started.
    pub fn on_move(&mut self, dx: f32, dy: f32) -> Option<Axis> {
        if self.locked.is_none() && dx.hypot(dy) >= self.slop {
            self.locked = Some(dominant_axis(dx, dy));
        }
        self.locked
    }

    /// Ends the drag and returns the release along the locked axis. A drag
    /// that never left the slop radius belongs to no axis.
    pub fn on_release(&mut self, dx: f32, dy: f32, vx: f32, vy: f32) -> Option<(Axis, DragRelease)> {
        let axis = self.on_move(dx, dy);
        self.locked = None;
        axis.map(|axis| match axis {
            Axis::Horizontal => (axis, DragRelease::new(dx, vx)),
            Axis::Vertical => (axis, DragRelease::new(dy, vy)),
        })
    }

    pub fn cancel(&mut self) {
        self.locked = None;
    }
}

impl Default for DragArbiter {
    fn default() -> Self {
        Self::new(AXIS_LOCK_SLOP)
    }
}

fn dominant_axis(dx: f32, dy: f32) -> Axis {
    if dx.abs() > dy.abs() {
        Axis::Horizontal
    } else {
        Axis::Vertical
    }
}

#[cfg(test)]
#[path = "tests/gesture_tests.rs"]
mod tests;

use super::*;

#[test]
fn dismiss_needs_both_distance_and_velocity() {
    assert!(HANDLEBAR_DISMISS.is_dismiss(DragRelease::new(101.0, 201.0)));
    assert!(!HANDLEBAR_DISMISS.is_dismiss(DragRelease::new(101.0, 150.0)));
    assert!(!HANDLEBAR_DISMISS.is_dismiss(DragRelease::new(80.0, 900.0)));
    assert!(!HANDLEBAR_DISMISS.is_dismiss(DragRelease::new(100.0, 200.0)));
}

#[test]
fn popup_threshold_is_shorter_than_handlebar() {
    let release = DragRelease::new(60.0, 250.0);
    assert!(POPUP_DISMISS.is_dismiss(release));
    assert!(!HANDLEBAR_DISMISS.is_dismiss(release));
}

#[test]
fn upward_drags_never_dismiss() {
    assert!(!POPUP_DISMISS.is_dismiss(DragRelease::new(-300.0, -900.0)));
}

#[test]
fn swipe_direction_requires_agreeing_signs() {
    assert_eq!(
        SwipeDirection::classify(DragRelease::new(-80.0, -400.0), CAROUSEL_SWIPE),
        Some(SwipeDirection::Next)
    );
    assert_eq!(
        SwipeDirection::classify(DragRelease::new(80.0, 400.0), CAROUSEL_SWIPE),
        Some(SwipeDirection::Previous)
    );
    assert_eq!(SwipeDirection::classify(DragRelease::new(-80.0, 400.0), CAROUSEL_SWIPE), None);
    assert_eq!(SwipeDirection::classify(DragRelease::new(-40.0, -400.0), CAROUSEL_SWIPE), None);
    assert_eq!(SwipeDirection::classify(DragRelease::new(-80.0, -100.0), CAROUSEL_SWIPE), None);
}

#[test]
fn arbiter_locks_dominant_axis_after_slop() {
    let mut arbiter = DragArbiter::default();
    assert_eq!(arbiter.on_move(3.0, 2.0), None);
    assert_eq!(arbiter.on_move(12.0, 4.0), Some(Axis::Horizontal));
    // Later vertical motion does not steal the drag.
    assert_eq!(arbiter.on_move(12.0, 90.0), Some(Axis::Horizontal));
    assert_eq!(arbiter.locked_axis(), Some(Axis::Horizontal));
}

#[test]
fn release_reports_only_the_locked_axis_and_resets() {
    let mut arbiter = DragArbiter::default();
    arbiter.on_move(2.0, 15.0);
    let (axis, release) = arbiter
        .on_release(30.0, 80.0, 500.0, 300.0)
        .expect("locked drag");
    assert_eq!(axis, Axis::Vertical);
    assert_eq!(release, DragRelease::new(80.0, 300.0));
    assert_eq!(arbiter.locked_axis(), None);
}

#[test]
fn release_inside_slop_belongs_to_no_axis() {
    let mut arbiter = DragArbiter::default();
    assert_eq!(arbiter.on_release(3.0, 4.0, 900.0, 900.0), None);
}

#[test]
fn release_without_moves_locks_on_final_translation() {
    let mut arbiter = DragArbiter::default();
    let (axis, release) = arbiter
        .on_release(-70.0, 5.0, -300.0, 0.0)
        .expect("past slop");
    assert_eq!(axis, Axis::Horizontal);
    assert_eq!(release, DragRelease::new(-70.0, -300.0));
}

#[test]
fn cancel_unlocks() {
    let mut arbiter = DragArbiter::new(5.0);
    arbiter.on_move(0.0, 20.0);
    arbiter.cancel();
    assert_eq!(arbiter.locked_axis(), None);
    assert_eq!(arbiter.on_move(20.0, 0.0), Some(Axis::Horizontal));
}

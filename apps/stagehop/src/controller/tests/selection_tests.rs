use shared::domain::{parse_event_timestamp, EventId, Venue, VenueId};

use super::*;

fn event(id: i64, venue: i64, starts_at: &str) -> Event {
    Event {
        id: EventId(id),
        location: GeoPoint::new(32.0700 + venue as f64 * 0.01, 34.7800),
        show_name: format!("show {id}"),
        starts_at: parse_event_timestamp(starts_at).expect("timestamp"),
        link: format!("https://tickets.example/{id}"),
        image_url: None,
        venue: Venue {
            id: VenueId(venue),
            name: format!("venue {venue}"),
            logo: String::new(),
        },
    }
}

fn evening() -> Vec<Event> {
    vec![
        event(1, 7, "2024-06-01T19:00:00+03:00"),
        event(9, 8, "2024-06-01T19:30:00+03:00"),
        event(2, 7, "2024-06-01T21:00:00+03:00"),
        event(3, 7, "2024-06-01T23:00:00+03:00"),
        event(4, 7, "2024-06-02T20:00:00+03:00"),
    ]
}

fn left() -> DragRelease {
    DragRelease::new(-120.0, -600.0)
}

fn right() -> DragRelease {
    DragRelease::new(120.0, 600.0)
}

fn ids(events: &[Event]) -> Vec<i64> {
    events.iter().map(|event| event.id.0).collect()
}

#[test]
fn group_is_same_venue_same_day_in_fetch_order() {
    let events = evening();
    let mut controller = SelectionController::new();
    controller.select(&events, &events[2]);

    let selection = controller.selection().expect("selected");
    assert_eq!(ids(selection.group()), vec![1, 2, 3]);
    assert_eq!(selection.index(), 1);
    assert_eq!(selection.event().id, EventId(2));

    assert_eq!(controller.swipe_horizontal(left()).map(|e| e.id), Some(EventId(3)));
    assert_eq!(controller.selection().expect("selected").index(), 2);
}

#[test]
fn every_member_sees_the_same_group() {
    let events = evening();
    for member in [0, 2, 3] {
        let mut controller = SelectionController::new();
        controller.select(&events, &events[member]);
        assert_eq!(ids(controller.selection().expect("selected").group()), vec![1, 2, 3]);
    }
}

#[test]
fn carousel_wraps_both_ways() {
    let events = evening();
    let mut controller = SelectionController::new();
    controller.select(&events, &events[3]);

    assert_eq!(controller.swipe_horizontal(left()).map(|e| e.id), Some(EventId(1)));
    assert_eq!(controller.swipe_horizontal(right()).map(|e| e.id), Some(EventId(3)));

    // n steps in one direction come back to the start.
    for _ in 0..3 {
        controller.swipe_horizontal(right());
    }
    assert_eq!(controller.selected().map(|e| e.id), Some(EventId(3)));
}

#[test]
fn singleton_group_ignores_swipes() {
    let events = evening();
    let mut controller = SelectionController::new();
    controller.select(&events, &events[1]);
    assert_eq!(controller.selection().expect("selected").group().len(), 1);
    assert!(controller.swipe_horizontal(left()).is_none());
    assert_eq!(controller.selected().map(|e| e.id), Some(EventId(9)));
}

#[test]
fn weak_swipe_does_not_move() {
    let events = evening();
    let mut controller = SelectionController::new();
    controller.select(&events, &events[0]);
    assert!(controller.swipe_horizontal(DragRelease::new(-30.0, -600.0)).is_none());
    assert!(controller.swipe_horizontal(DragRelease::new(-120.0, -50.0)).is_none());
    assert_eq!(controller.selection().expect("selected").index(), 0);
}

#[test]
fn camera_centres_south_of_the_venue() {
    let events = evening();
    let mut controller = SelectionController::new();
    let camera = controller.select(&events, &events[0]);
    assert!((camera.center.lat - (events[0].location.lat - SELECTION_LATITUDE_OFFSET)).abs() < 1e-9);
    assert_eq!(camera.center.lng, events[0].location.lng);
    assert_eq!(camera.zoom_span, SELECTION_ZOOM_SPAN);
    assert!(camera.animated);
    assert_eq!(camera.duration, SELECTION_CAMERA_DURATION);
}

#[test]
fn event_outside_the_list_forms_its_own_group() {
    let events = evening();
    let stray = event(99, 7, "2024-06-01T18:00:00+03:00");
    let mut controller = SelectionController::new();
    controller.select(&events, &stray);
    let selection = controller.selection().expect("selected");
    assert_eq!(ids(selection.group()), vec![99]);
    assert_eq!(selection.index(), 0);
}

#[test]
fn later_selection_replaces_and_clear_drops() {
    let events = evening();
    let mut controller = SelectionController::default();
    controller.select(&events, &events[0]);
    controller.select(&events, &events[1]);
    assert_eq!(controller.selected().map(|e| e.id), Some(EventId(9)));

    controller.clear();
    assert!(!controller.has_selection());
    assert!(controller.swipe_horizontal(left()).is_none());
}

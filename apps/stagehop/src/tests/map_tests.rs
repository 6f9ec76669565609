use shared::domain::{parse_event_timestamp, Venue, VenueId};

use super::*;

fn event(id: i64, logo: &str) -> Event {
    Event {
        id: EventId(id),
        location: GeoPoint::new(32.0 + id as f64 * 0.001, 34.78),
        show_name: format!("show {id}"),
        starts_at: parse_event_timestamp("2024-06-01T21:00:00+03:00").expect("timestamp"),
        link: String::new(),
        image_url: None,
        venue: Venue {
            id: VenueId(1),
            name: "Zappa".into(),
            logo: logo.into(),
        },
    }
}

#[test]
fn markers_carry_position_and_logo() {
    let events = vec![event(1, "https://cdn.example/a.png"), event(2, "")];
    let markers = derive_markers(&events);
    assert_eq!(markers.len(), 2);
    assert_eq!(markers[0].id, EventId(1));
    assert_eq!(markers[0].coordinate, events[0].location);
    assert_eq!(markers[0].logo_url, "https://cdn.example/a.png");
    assert_eq!(markers[1].logo_url, "");
}

#[test]
fn marker_list_is_reused_for_the_same_snapshot() {
    let snapshot = EventSnapshot::new(vec![event(1, "logo")]);
    let mut cache = MarkerCache::default();

    let first = cache.markers_for(&snapshot);
    let again = cache.markers_for(&snapshot.clone());
    assert!(Arc::ptr_eq(&first, &again));
    assert_eq!(cache.derivations(), 1);

    let equal_but_new = EventSnapshot::new(vec![event(1, "logo")]);
    let rebuilt = cache.markers_for(&equal_but_new);
    assert!(!Arc::ptr_eq(&first, &rebuilt));
    assert_eq!(first, rebuilt);
    assert_eq!(cache.derivations(), 2);
}

#[test]
fn tracing_surface_keeps_last_state() {
    let mut surface = TracingMapSurface::default();
    surface.set_markers(&derive_markers(&[event(3, "logo")]));
    surface.move_camera(CameraCommand::jump_to(GeoPoint::new(32.0853, 34.7818), 0.1));
    surface.set_user_position(Some(UserPosition {
        lat: 32.1,
        lng: 34.8,
        heading: 0.0,
    }));

    assert_eq!(surface.markers().len(), 1);
    let camera = surface.camera().expect("camera");
    assert!(!camera.animated);
    assert_eq!(camera.duration, Duration::ZERO);
    assert!(surface.user_position().is_some());

    surface.set_user_position(None);
    assert!(surface.user_position().is_none());
}

use std::time::Duration as StdDuration;

use async_trait::async_trait;
use client_core::{
    EventSource, FetchError, LocationTracker, PositionFix, StaticLocationProvider, SystemClock,
};
use crossbeam_channel::{bounded, unbounded};
use shared::{
    domain::{parse_event_timestamp, DateKey, Event, EventId, GeoPoint, Venue, VenueId},
    error::FailureKind,
};

use super::*;

const WAIT: StdDuration = StdDuration::from_secs(5);

struct FixedSource(Result<Vec<Event>, u16>);

#[async_trait]
impl EventSource for FixedSource {
    async fn fetch_events(&self, _key: DateKey) -> Result<Vec<Event>, FetchError> {
        match &self.0 {
            Ok(events) => Ok(events.clone()),
            Err(status) => Err(FetchError::Status { status: *status }),
        }
    }
}

fn show() -> Event {
    Event {
        id: EventId(11),
        location: GeoPoint::new(32.06, 34.77),
        show_name: "Late set".into(),
        starts_at: parse_event_timestamp("2024-06-01T22:00:00+03:00").expect("timestamp"),
        link: String::new(),
        image_url: None,
        venue: Venue {
            id: VenueId(3),
            name: "Levontin 7".into(),
            logo: String::new(),
        },
    }
}

fn services(source: FixedSource, fix: Option<PositionFix>) -> BackendServices {
    BackendServices {
        repository: Arc::new(EventRepository::new(
            Arc::new(source),
            Arc::new(SystemClock),
            chrono::Duration::seconds(60),
        )),
        tracker: Arc::new(LocationTracker::default()),
        location: Arc::new(StaticLocationProvider::new(fix)),
    }
}

fn ticket() -> RequestTicket {
    RequestTicket {
        key: DateKey::parse("2024-06-01").expect("date"),
        generation: 1,
    }
}

#[test]
fn fetch_command_reports_loaded_events() {
    let (cmd_tx, cmd_rx) = bounded(4);
    let (ui_tx, ui_rx) = unbounded();
    let worker = launch(cmd_rx, ui_tx, services(FixedSource(Ok(vec![show()])), None)).expect("launch");

    cmd_tx
        .send(BackendCommand::FetchEvents { ticket: ticket() })
        .expect("send");
    match ui_rx.recv_timeout(WAIT).expect("ui event") {
        UiEvent::EventsLoaded { ticket: got, events } => {
            assert_eq!(got, ticket());
            assert_eq!(events.len(), 1);
            assert_eq!(events[0].id, EventId(11));
        }
        _ => panic!("expected loaded events"),
    }

    cmd_tx.send(BackendCommand::Shutdown).expect("send");
    worker.join().expect("worker exits");
}

#[test]
fn failed_fetch_is_reported_as_network_failure() {
    let (cmd_tx, cmd_rx) = bounded(4);
    let (ui_tx, ui_rx) = unbounded();
    let worker = launch(cmd_rx, ui_tx, services(FixedSource(Err(503)), None)).expect("launch");

    cmd_tx
        .send(BackendCommand::FetchEvents { ticket: ticket() })
        .expect("send");
    match ui_rx.recv_timeout(WAIT).expect("ui event") {
        UiEvent::EventsFailed { ticket: got, error } => {
            assert_eq!(got, ticket());
            assert_eq!(error.kind(), FailureKind::NetworkFailure);
        }
        _ => panic!("expected a failure"),
    }

    cmd_tx.send(BackendCommand::Shutdown).expect("send");
    worker.join().expect("worker exits");
}

#[test]
fn denied_location_is_reported_once() {
    let (cmd_tx, cmd_rx) = bounded(4);
    let (ui_tx, ui_rx) = unbounded();
    let worker = launch(cmd_rx, ui_tx, services(FixedSource(Ok(Vec::new())), None)).expect("launch");

    cmd_tx.send(BackendCommand::StartLocation).expect("send");
    assert!(matches!(
        ui_rx.recv_timeout(WAIT),
        Ok(UiEvent::LocationUnavailable)
    ));

    cmd_tx.send(BackendCommand::Shutdown).expect("send");
    worker.join().expect("worker exits");
}

#[test]
fn granted_location_forwards_positions() {
    let (cmd_tx, cmd_rx) = bounded(4);
    let (ui_tx, ui_rx) = unbounded();
    let fix = PositionFix {
        lat: 32.08,
        lng: 34.78,
        heading: Some(45.0),
    };
    let worker = launch(cmd_rx, ui_tx, services(FixedSource(Ok(Vec::new())), Some(fix))).expect("launch");

    cmd_tx.send(BackendCommand::StartLocation).expect("send");
    match ui_rx.recv_timeout(WAIT).expect("ui event") {
        UiEvent::LocationChanged(position) => {
            assert_eq!(position.lat, 32.08);
            assert_eq!(position.heading, 45.0);
        }
        _ => panic!("expected a position"),
    }

    cmd_tx.send(BackendCommand::Shutdown).expect("send");
    worker.join().expect("worker exits");
}

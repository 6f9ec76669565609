//! The map screen: owns selection and sheet state for its lifetime, turns
//! taps and drags into state transitions, and keeps the map surface in step.

use client_core::{DirectionsLinker, EventSnapshot};
use crossbeam_channel::Sender;
use shared::domain::{DateKey, DateOption, Event, EventId, UserPosition};
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::{
        events::{RequestTicket, UiEvent},
        gesture::{Axis, DragArbiter, DragRelease},
        orchestration::dispatch_backend_command,
        selection::{Selection, SelectionController},
        sheet::{AnimationId, SheetAnimation, SheetController, SheetEvent, SheetPosition, SheetThresholds},
    },
    map::{CameraCommand, MapSurface, MapTap, MarkerCache},
};

pub struct ScreenConfig {
    pub dates: Vec<DateOption>,
    /// Day loaded on mount; normally the first entry of `dates`.
    pub initial_date: DateKey,
    pub initial_camera: CameraCommand,
    pub closed_offset: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationState {
    Pending,
    Known(UserPosition),
    Unavailable,
}

pub struct MapScreen<M: MapSurface> {
    map: M,
    cmd_tx: Sender<BackendCommand>,
    linker: DirectionsLinker,
    dates: Vec<DateOption>,
    selected_date: DateKey,
    next_generation: u64,
    latest_ticket: Option<RequestTicket>,
    awaiting: bool,
    events: EventSnapshot,
    markers: MarkerCache,
    selection: SelectionController,
    sheet: SheetController,
    popup_drag: DragArbiter,
    location: LocationState,
    pending_animations: Vec<SheetAnimation>,
    status: String,
}

impl<M: MapSurface> MapScreen<M> {
    /// Fresh screen: nothing selected, the sheet on its way up, the camera on
    /// the initial region, location requested and the first date loading.
    pub fn mount(
        mut map: M,
        cmd_tx: Sender<BackendCommand>,
        linker: DirectionsLinker,
        config: ScreenConfig,
    ) -> Self {
        let (sheet, intro) = SheetController::mount(config.closed_offset, SheetThresholds::default());
        let selected_date = config.initial_date;

        map.move_camera(config.initial_camera);
        map.set_markers(&[]);

        let mut screen = Self {
            map,
            cmd_tx,
            linker,
            dates: config.dates,
            selected_date,
            next_generation: 0,
            latest_ticket: None,
            awaiting: false,
            events: EventSnapshot::empty(),
            markers: MarkerCache::default(),
            selection: SelectionController::new(),
            sheet,
            popup_drag: DragArbiter::default(),
            location: LocationState::Pending,
            pending_animations: vec![intro],
            status: String::new(),
        };

        if !dispatch_backend_command(&screen.cmd_tx, BackendCommand::StartLocation, &mut screen.status) {
            screen.location = LocationState::Unavailable;
        }
        screen.request_events(selected_date);
        screen
    }

    /// Switches the date filter. Whatever is still in flight for an earlier
    /// pick will be ignored when it lands.
    pub fn select_date(&mut self, key: DateKey) {
        self.selected_date = key;
        self.request_events(key);
    }

    fn request_events(&mut self, key: DateKey) {
        self.next_generation += 1;
        let ticket = RequestTicket {
            key,
            generation: self.next_generation,
        };
        self.latest_ticket = Some(ticket);
        self.awaiting = dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::FetchEvents { ticket },
            &mut self.status,
        );
    }

    pub fn handle_ui_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::EventsLoaded { ticket, events } => {
                if !self.is_latest(ticket) {
                    debug!(date = %ticket.key, generation = ticket.generation, "ignoring events for an older request");
                    return;
                }
                self.awaiting = false;
                self.status.clear();
                self.events = events;
                let markers = self.markers.markers_for(&self.events);
                self.map.set_markers(&markers);
                info!(date = %ticket.key, count = self.events.len(), "showing events");
            }
            UiEvent::EventsFailed { ticket, error } => {
                if !self.is_latest(ticket) {
                    return;
                }
                self.awaiting = false;
                warn!(date = %ticket.key, kind = ?error.kind(), "{}", error.message());
                self.status = error.message().to_string();
            }
            UiEvent::LocationChanged(position) => {
                if self.location == LocationState::Unavailable {
                    return;
                }
                self.location = LocationState::Known(position);
                self.map.set_user_position(Some(position));
            }
            UiEvent::LocationUnavailable => {
                self.location = LocationState::Unavailable;
                self.map.set_user_position(None);
            }
        }
    }

    fn is_latest(&self, ticket: RequestTicket) -> bool {
        self.latest_ticket == Some(ticket)
    }

    pub fn handle_map_tap(&mut self, tap: MapTap) -> bool {
        match tap {
            MapTap::Marker(id) => self.select_event(id),
            MapTap::Background => self.tap_background(),
        }
    }

    /// Marker or list row pressed. Returns `false` for an id not on screen.
    pub fn select_event(&mut self, id: EventId) -> bool {
        let Some(event) = self.events.iter().find(|event| event.id == id).cloned() else {
            debug!(event_id = id.0, "selection ignored; event not in current list");
            return false;
        };
        let camera = self.selection.select(&self.events, &event);
        self.map.move_camera(camera);
        self.popup_drag.cancel();
        self.transition(SheetEvent::EventSelected);
        true
    }

    /// Background tap: with something selected, deselect and bring the list back.
    pub fn tap_background(&mut self) -> bool {
        if !self.selection.has_selection() {
            return false;
        }
        self.selection.clear();
        self.transition(SheetEvent::BackgroundTap {
            has_selection: true,
        });
        true
    }

    pub fn release_handlebar(&mut self, release: DragRelease) {
        self.transition(SheetEvent::HandlebarReleased(release));
    }

    pub fn popup_drag_moved(&mut self, dx: f32, dy: f32) -> Option<Axis> {
        if !self.selection.has_selection() {
            return None;
        }
        self.popup_drag.on_move(dx, dy)
    }

    /// Ends a drag on the detail popup. Vertical drags may dismiss the popup,
    /// horizontal ones page through the venue's other shows.
    pub fn popup_drag_released(&mut self, dx: f32, dy: f32, vx: f32, vy: f32) {
        if !self.selection.has_selection() {
            self.popup_drag.cancel();
            return;
        }
        match self.popup_drag.on_release(dx, dy, vx, vy) {
            Some((Axis::Vertical, release)) => {
                if self.transition(SheetEvent::PopupReleased(release)) {
                    self.selection.clear();
                }
            }
            Some((Axis::Horizontal, release)) => {
                if let Some(event) = self.selection.swipe_horizontal(release) {
                    debug!(event_id = event.id.0, "carousel moved");
                }
            }
            None => {}
        }
    }

    fn transition(&mut self, event: SheetEvent) -> bool {
        match self.sheet.handle(event) {
            Some(animation) => {
                self.pending_animations.push(animation);
                true
            }
            None => false,
        }
    }

    /// Animations for the driver to play, oldest first. A later one always
    /// supersedes the ones before it.
    pub fn take_sheet_animations(&mut self) -> Vec<SheetAnimation> {
        std::mem::take(&mut self.pending_animations)
    }

    pub fn sheet_frame(&mut self, offset: f32) {
        self.sheet.set_offset(offset);
    }

    pub fn sheet_animation_finished(&mut self, id: AnimationId) -> bool {
        self.sheet.complete(id)
    }

    /// External link of the selected show, for the host to open.
    pub fn press_card(&self) -> Option<&str> {
        self.selection
            .selected()
            .map(|event| event.link.as_str())
            .filter(|link| !link.trim().is_empty())
    }

    /// Walking directions to the selected venue, when both a selection and a
    /// user position exist.
    pub fn walking_directions(&self) -> Option<Url> {
        let destination = self.selection.selected()?.location;
        self.linker
            .build_walking_directions_url(self.user_position().as_ref(), destination)
    }

    pub fn user_position(&self) -> Option<UserPosition> {
        match self.location {
            LocationState::Known(position) => Some(position),
            _ => None,
        }
    }

    pub fn location(&self) -> LocationState {
        self.location
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.selection()
    }

    pub fn selected(&self) -> Option<&Event> {
        self.selection.selected()
    }

    pub fn sheet_position(&self) -> SheetPosition {
        self.sheet.position()
    }

    pub fn dates(&self) -> &[DateOption] {
        &self.dates
    }

    pub fn selected_date(&self) -> DateKey {
        self.selected_date
    }

    pub fn latest_ticket(&self) -> Option<RequestTicket> {
        self.latest_ticket
    }

    pub fn is_loading(&self) -> bool {
        self.awaiting
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn map(&self) -> &M {
        &self.map
    }
}

#[cfg(test)]
#[path = "tests/screen_tests.rs"]
mod tests;

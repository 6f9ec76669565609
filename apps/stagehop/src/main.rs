use std::{
    path::PathBuf,
    sync::Arc,
    thread,
    time::{Duration, Instant},
};

mod backend_bridge;
mod config;
mod controller;
mod map;

use anyhow::{anyhow, bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use client_core::{
    DirectionsLinker, EventRepository, HttpEventSource, LocationProvider, LocationTracker,
    PositionFix, StaticLocationProvider, SystemClock,
};
use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender};
use shared::domain::{upcoming_dates, DateKey, EventId, GeoPoint};
use tracing_subscriber::EnvFilter;

use crate::{
    backend_bridge::{
        commands::BackendCommand,
        runtime::{self, BackendServices},
    },
    config::{load_settings, Settings},
    controller::{
        events::UiEvent,
        gesture::{DragRelease, CAROUSEL_SWIPE, POPUP_DISMISS},
        screen::{LocationState, MapScreen, ScreenConfig},
        sheet::closed_offset_for_viewport,
    },
    map::{CameraCommand, MapTap, TracingMapSurface},
};

const BACKEND_TIMEOUT: Duration = Duration::from_secs(15);
const COMMAND_QUEUE_CAPACITY: usize = 64;

#[derive(Parser, Debug)]
#[command(name = "stagehop", about = "Browse upcoming shows around the map")]
struct Args {
    /// Settings file; `./stagehop.toml` is used when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the selectable days.
    Dates,
    /// Fetch and list the events of one day.
    Events {
        /// `YYYY-MM-DD`; defaults to today.
        #[arg(long)]
        date: Option<String>,
    },
    /// Select an event, page through its venue's shows and build directions.
    Browse {
        #[arg(long)]
        date: Option<String>,
        /// Event id to select.
        #[arg(long)]
        select: i64,
        /// Carousel swipes applied in order.
        #[arg(long = "swipe", value_enum)]
        swipes: Vec<Swipe>,
        /// Current position as `lat,lng`. Without it, location is treated as denied.
        #[arg(long)]
        from: Option<String>,
        /// Swipe the detail popup away at the end.
        #[arg(long)]
        dismiss: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Swipe {
    Left,
    Right,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();
    let settings = load_settings(args.config.as_deref())?;
    let today = DateKey::new(Local::now().date_naive());

    match args.command {
        Command::Dates => {
            for option in upcoming_dates(today.date(), settings.upcoming_days) {
                println!("{:<6} {}", option.label, option.key);
            }
            Ok(())
        }
        Command::Events { date } => {
            let mut session = Session::start(&settings, today, date.as_deref(), None)?;
            session.pump(|screen| !screen.is_loading())?;
            print_events(&session.screen);
            Ok(())
        }
        Command::Browse {
            date,
            select,
            swipes,
            from,
            dismiss,
        } => {
            let fix = from.as_deref().map(parse_position).transpose()?;
            let mut session = Session::start(&settings, today, date.as_deref(), fix)?;
            session.pump(|screen| {
                !screen.is_loading() && screen.location() != LocationState::Pending
            })?;
            browse(&mut session, EventId(select), &swipes, dismiss)
        }
    }
}

struct Session {
    screen: MapScreen<TracingMapSurface>,
    ui_rx: Receiver<UiEvent>,
    cmd_tx: Sender<BackendCommand>,
    worker: Option<thread::JoinHandle<()>>,
}

impl Session {
    fn start(
        settings: &Settings,
        today: DateKey,
        date: Option<&str>,
        fix: Option<PositionFix>,
    ) -> Result<Self> {
        let initial_date = match date {
            Some(raw) => DateKey::parse(raw)
                .with_context(|| format!("invalid date '{raw}', expected YYYY-MM-DD"))?,
            None => today,
        };

        let source = Arc::new(HttpEventSource::new(
            settings.api_base_url.clone(),
            settings.page_size,
            settings.page_offset,
        ));
        let repository = Arc::new(EventRepository::new(
            source,
            Arc::new(SystemClock),
            chrono::Duration::seconds(settings.cache_ttl_seconds),
        ));
        let location: Arc<dyn LocationProvider> = Arc::new(StaticLocationProvider::new(fix));
        let services = BackendServices {
            repository,
            tracker: Arc::new(LocationTracker::new(settings.watch_options())),
            location,
        };

        let (cmd_tx, cmd_rx) = bounded(COMMAND_QUEUE_CAPACITY);
        let (ui_tx, ui_rx) = unbounded();
        let worker = runtime::launch(cmd_rx, ui_tx, services)
            .context("backend worker startup failure")?;

        let linker = DirectionsLinker::parse(&settings.maps_base_url)
            .with_context(|| format!("invalid maps url '{}'", settings.maps_base_url))?;
        let config = ScreenConfig {
            dates: upcoming_dates(today.date(), settings.upcoming_days),
            initial_date,
            initial_camera: CameraCommand::jump_to(
                GeoPoint::new(settings.initial_latitude, settings.initial_longitude),
                settings.initial_zoom_span,
            ),
            closed_offset: closed_offset_for_viewport(settings.viewport_height),
        };
        let screen = MapScreen::mount(TracingMapSurface::default(), cmd_tx.clone(), linker, config);

        Ok(Self {
            screen,
            ui_rx,
            cmd_tx,
            worker: Some(worker),
        })
    }

    /// Feeds backend events into the screen until `done` holds.
    fn pump(&mut self, done: impl Fn(&MapScreen<TracingMapSurface>) -> bool) -> Result<()> {
        let deadline = Instant::now() + BACKEND_TIMEOUT;
        loop {
            self.settle_sheet();
            if done(&self.screen) {
                return Ok(());
            }
            let remaining = deadline
                .checked_duration_since(Instant::now())
                .ok_or_else(|| anyhow!("timed out waiting for the backend"))?;
            match self.ui_rx.recv_timeout(remaining) {
                Ok(event) => self.screen.handle_ui_event(event),
                Err(RecvTimeoutError::Timeout) => bail!("timed out waiting for the backend"),
                Err(RecvTimeoutError::Disconnected) => bail!("backend worker stopped unexpectedly"),
            }
        }
    }

    /// Plays every queued sheet animation to its end at once.
    fn settle_sheet(&mut self) {
        for animation in self.screen.take_sheet_animations() {
            self.screen.sheet_frame(animation.sample(animation.duration));
            self.screen.sheet_animation_finished(animation.id);
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(BackendCommand::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn parse_position(raw: &str) -> Result<PositionFix> {
    let (lat, lng) = raw
        .split_once(',')
        .ok_or_else(|| anyhow!("position must look like 'lat,lng', got '{raw}'"))?;
    Ok(PositionFix {
        lat: lat.trim().parse().context("invalid latitude")?,
        lng: lng.trim().parse().context("invalid longitude")?,
        heading: None,
    })
}

fn print_events(screen: &MapScreen<TracingMapSurface>) {
    if !screen.status().is_empty() {
        eprintln!("{}", screen.status());
    }
    println!(
        "{} event(s) on {}, {} marker(s)",
        screen.events().len(),
        screen.selected_date(),
        screen.map().markers().len()
    );
    for event in screen.events() {
        let poster = if event.image_url.is_some() { "" } else { "  (no image)" };
        println!(
            "{:>6}  {}  {} @ {}{}",
            event.id.0,
            event.start_time_label(),
            event.show_name,
            event.venue.name,
            poster
        );
    }
}

fn browse(session: &mut Session, id: EventId, swipes: &[Swipe], dismiss: bool) -> Result<()> {
    print_events(&session.screen);
    if !session.screen.handle_map_tap(MapTap::Marker(id)) {
        bail!("event {} is not among the loaded events", id.0);
    }

    for swipe in swipes {
        let past = CAROUSEL_SWIPE.distance * 2.0;
        let fast = CAROUSEL_SWIPE.velocity * 2.0;
        let (dx, vx) = match swipe {
            Swipe::Left => (-past, -fast),
            Swipe::Right => (past, fast),
        };
        session.screen.popup_drag_moved(dx, 0.0);
        session.screen.popup_drag_released(dx, 0.0, vx, 0.0);
    }
    session.settle_sheet();

    if let Some(selection) = session.screen.selection() {
        let event = selection.event();
        println!(
            "selected #{} {} @ {} {} ({} of {})",
            event.id.0,
            event.show_name,
            event.venue.name,
            event.start_time_label(),
            selection.index() + 1,
            selection.group().len()
        );
    }
    println!("sheet: {:?}", session.screen.sheet_position());
    if let Some(link) = session.screen.press_card() {
        println!("link: {link}");
    }
    match session.screen.walking_directions() {
        Some(url) => println!("directions: {url}"),
        None => println!("directions: unavailable without a known position"),
    }

    if dismiss {
        let down = DragRelease::new(POPUP_DISMISS.distance * 2.0, POPUP_DISMISS.velocity * 2.0);
        session.screen.popup_drag_moved(0.0, down.translation);
        session
            .screen
            .popup_drag_released(0.0, down.translation, 0.0, down.velocity);
        session.settle_sheet();
        println!(
            "dismissed; sheet: {:?}, selection: {}",
            session.screen.sheet_position(),
            if session.screen.selected().is_some() { "kept" } else { "cleared" }
        );
    }
    Ok(())
}

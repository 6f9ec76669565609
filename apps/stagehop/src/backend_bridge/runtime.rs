//! Runtime bridge between the screen's command queue and backend event intake.
//!
//! The screen never awaits anything. Commands go to a worker thread that
//! owns a tokio runtime; results come back as [`UiEvent`]s on a channel the
//! UI loop drains.

use std::{sync::Arc, thread, time::Duration};

use anyhow::{Context, Result};
use client_core::{EventRepository, LocationProvider, LocationTracker, TrackerStatus};
use crossbeam_channel::{Receiver, Sender};
use futures::StreamExt;
use tracing::{debug, info, warn};

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::events::{RequestTicket, UiError, UiEvent},
};

pub struct BackendServices {
    pub repository: Arc<EventRepository>,
    pub tracker: Arc<LocationTracker>,
    pub location: Arc<dyn LocationProvider>,
}

pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    services: BackendServices,
) -> Result<thread::JoinHandle<()>> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to build backend runtime")?;

    thread::Builder::new()
        .name("stagehop-backend".into())
        .spawn(move || {
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::FetchEvents { ticket } => {
                        runtime.spawn(fetch_events(
                            services.repository.clone(),
                            ticket,
                            ui_tx.clone(),
                        ));
                    }
                    BackendCommand::StartLocation => {
                        runtime.spawn(follow_location(
                            services.tracker.clone(),
                            services.location.clone(),
                            ui_tx.clone(),
                        ));
                    }
                    BackendCommand::Shutdown => break,
                }
            }
            debug!("backend command loop finished");
            runtime.shutdown_timeout(Duration::from_millis(250));
        })
        .context("failed to spawn backend worker thread")
}

async fn fetch_events(repository: Arc<EventRepository>, ticket: RequestTicket, ui_tx: Sender<UiEvent>) {
    let event = match repository.fetch(ticket.key).await {
        Ok(events) => UiEvent::EventsLoaded { ticket, events },
        Err(err) => match UiError::from_fetch_error(&err) {
            Some(error) => UiEvent::EventsFailed { ticket, error },
            None => {
                debug!(date = %ticket.key, generation = ticket.generation, "dropping superseded fetch result");
                return;
            }
        },
    };
    if ui_tx.send(event).is_err() {
        warn!("ui event channel closed; dropping fetch result");
    }
}

async fn follow_location(
    tracker: Arc<LocationTracker>,
    provider: Arc<dyn LocationProvider>,
    ui_tx: Sender<UiEvent>,
) {
    if tracker.start(provider).await == TrackerStatus::Inactive {
        let _ = ui_tx.send(UiEvent::LocationUnavailable);
        return;
    }

    let mut updates = tracker.updates();
    while let Some(update) = updates.next().await {
        let Some(position) = update else {
            continue;
        };
        if ui_tx.send(UiEvent::LocationChanged(position)).is_err() {
            info!("ui event channel closed; no longer forwarding positions");
            break;
        }
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use futures::{stream::BoxStream, StreamExt};
use shared::domain::UserPosition;
use tokio::{sync::watch, task::JoinHandle};
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info};

pub const POSITION_MIN_INTERVAL: Duration = Duration::from_secs(10);
pub const POSITION_MIN_DISTANCE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// One report from the host platform. `heading` is absent on devices without a compass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionFix {
    pub lat: f64,
    pub lng: f64,
    pub heading: Option<f64>,
}

impl From<PositionFix> for UserPosition {
    fn from(fix: PositionFix) -> Self {
        Self {
            lat: fix.lat,
            lng: fix.lng,
            heading: fix.heading.unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatchOptions {
    pub min_interval: Duration,
    pub min_distance: f64,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            min_interval: POSITION_MIN_INTERVAL,
            min_distance: POSITION_MIN_DISTANCE,
        }
    }
}

#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn request_foreground_permission(&self) -> PermissionStatus;
    /// Push stream of fixes honoring the reporting cadence in `options`.
    fn watch_position(&self, options: WatchOptions) -> BoxStream<'static, PositionFix>;
}

/// Provider for hosts without a positioning service: a configured fix is
/// granted once, no fix means permission is denied.
pub struct StaticLocationProvider {
    fix: Option<PositionFix>,
}

impl StaticLocationProvider {
    pub fn new(fix: Option<PositionFix>) -> Self {
        Self { fix }
    }
}

#[async_trait]
impl LocationProvider for StaticLocationProvider {
    async fn request_foreground_permission(&self) -> PermissionStatus {
        if self.fix.is_some() {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        }
    }

    fn watch_position(&self, _options: WatchOptions) -> BoxStream<'static, PositionFix> {
        futures::stream::iter(self.fix).boxed()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerStatus {
    /// Permission not requested yet.
    Idle,
    /// Permission denied; stays this way for the rest of the session.
    Inactive,
    Active,
}

pub struct LocationTracker {
    options: WatchOptions,
    requested: AtomicBool,
    status: watch::Sender<TrackerStatus>,
    position: Arc<watch::Sender<Option<UserPosition>>>,
    stream_task: Mutex<Option<JoinHandle<()>>>,
}

impl LocationTracker {
    pub fn new(options: WatchOptions) -> Self {
        let (status, _) = watch::channel(TrackerStatus::Idle);
        let (position, _) = watch::channel(None);
        Self {
            options,
            requested: AtomicBool::new(false),
            status,
            position: Arc::new(position),
            stream_task: Mutex::new(None),
        }
    }

    /// Requests permission and, when granted, starts following the position
    /// stream on the current tokio runtime. Only the first call asks; later
    /// calls report the outcome of that first request.
    pub async fn start(&self, provider: Arc<dyn LocationProvider>) -> TrackerStatus {
        if self.requested.swap(true, Ordering::SeqCst) {
            return self.wait_for_outcome().await;
        }

        match provider.request_foreground_permission().await {
            PermissionStatus::Denied => {
                info!("location permission denied; tracking disabled for this session");
                self.status.send_replace(TrackerStatus::Inactive);
            }
            PermissionStatus::Granted => {
                info!(
                    min_interval_s = self.options.min_interval.as_secs(),
                    min_distance = self.options.min_distance,
                    "location permission granted; following position updates"
                );
                let mut fixes = provider.watch_position(self.options);
                let position = self.position.clone();
                let task = tokio::spawn(async move {
                    while let Some(fix) = fixes.next().await {
                        debug!(lat = fix.lat, lng = fix.lng, "position update");
                        position.send_replace(Some(fix.into()));
                    }
                });
                if let Ok(mut slot) = self.stream_task.lock() {
                    *slot = Some(task);
                }
                self.status.send_replace(TrackerStatus::Active);
            }
        }

        self.status()
    }

    pub fn status(&self) -> TrackerStatus {
        *self.status.borrow()
    }

    /// Latest known position; `None` until the first fix and forever when inactive.
    pub fn position(&self) -> Option<UserPosition> {
        *self.position.borrow()
    }

    pub fn updates(&self) -> WatchStream<Option<UserPosition>> {
        WatchStream::new(self.position.subscribe())
    }

    async fn wait_for_outcome(&self) -> TrackerStatus {
        let mut status = self.status.subscribe();
        let outcome = match status
            .wait_for(|status| *status != TrackerStatus::Idle)
            .await
        {
            Ok(settled) => *settled,
            Err(_) => self.status(),
        };
        outcome
    }
}

impl Default for LocationTracker {
    fn default() -> Self {
        Self::new(WatchOptions::default())
    }
}

impl Drop for LocationTracker {
    fn drop(&mut self) {
        if let Ok(mut slot) = self.stream_task.lock() {
            if let Some(task) = slot.take() {
                task.abort();
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/location_tests.rs"]
mod tests;

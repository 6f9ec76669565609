use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use async_trait::async_trait;
use chrono::Duration;
use reqwest::Client;
use shared::{
    domain::{DateKey, Event},
    error::FailureKind,
    protocol::{EventsQuery, FeatureCollection},
};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    cache::{EventCache, EventSnapshot},
    clock::Clock,
};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("events request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("events endpoint returned HTTP {status}")]
    Status { status: u16 },
    #[error("events for {key} (generation {generation}) superseded by a newer request")]
    Superseded { key: DateKey, generation: u64 },
}

impl FetchError {
    /// `None` for discarded stale responses, which are not failures.
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            FetchError::Transport(_) | FetchError::Status { .. } => {
                Some(FailureKind::NetworkFailure)
            }
            FetchError::Superseded { .. } => None,
        }
    }
}

#[async_trait]
pub trait EventSource: Send + Sync {
    async fn fetch_events(&self, key: DateKey) -> Result<Vec<Event>, FetchError>;
}

pub struct HttpEventSource {
    http: Client,
    base_url: String,
    page_size: u32,
    page_offset: u32,
}

impl HttpEventSource {
    pub fn new(base_url: impl Into<String>, page_size: u32, page_offset: u32) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            page_size,
            page_offset,
        }
    }
}

#[async_trait]
impl EventSource for HttpEventSource {
    async fn fetch_events(&self, key: DateKey) -> Result<Vec<Event>, FetchError> {
        let res = self
            .http
            .get(format!("{}/events", self.base_url.trim_end_matches('/')))
            .query(&EventsQuery::for_day(key, self.page_size, self.page_offset))
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body: FeatureCollection = res.json().await?;
        Ok(decode_features(body))
    }
}

/// Converts wire features into events, keeping fetch order. Features that
/// cannot be placed or timed are skipped, as are repeated ids.
pub fn decode_features(collection: FeatureCollection) -> Vec<Event> {
    let mut seen = HashSet::new();
    collection
        .features
        .into_iter()
        .filter_map(|feature| match Event::try_from(feature) {
            Ok(event) => Some(event),
            Err(err) => {
                warn!(error = %err, "skipping malformed event feature");
                None
            }
        })
        .filter(|event| {
            let fresh = seen.insert(event.id);
            if !fresh {
                warn!(event_id = event.id.0, "dropping duplicate event id in fetch result");
            }
            fresh
        })
        .collect()
}

pub struct EventRepository {
    source: Arc<dyn EventSource>,
    clock: Arc<dyn Clock>,
    cache: Mutex<EventCache>,
    generations: Mutex<HashMap<DateKey, u64>>,
}

impl EventRepository {
    pub fn new(source: Arc<dyn EventSource>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            source,
            clock,
            cache: Mutex::new(EventCache::new(ttl)),
            generations: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the events for `key`, from the cache while fresh and from the
    /// source otherwise. A response is only stored if no newer request for
    /// the same key started while it was in flight.
    pub async fn fetch(&self, key: DateKey) -> Result<EventSnapshot, FetchError> {
        if let Some(snapshot) = self.cached(key).await {
            debug!(date = %key, count = snapshot.len(), "serving events from cache");
            return Ok(snapshot);
        }

        let generation = self.begin_request(key).await;
        let events = match self.source.fetch_events(key).await {
            Ok(events) => events,
            Err(err) => {
                warn!(date = %key, generation, error = %err, "event fetch failed");
                return Err(err);
            }
        };

        let latest = self.latest_generation(key).await;
        if latest != Some(generation) {
            debug!(date = %key, generation, ?latest, "discarding stale event response");
            return Err(FetchError::Superseded { key, generation });
        }

        let snapshot = EventSnapshot::new(events);
        self.cache
            .lock()
            .await
            .put(key, snapshot.clone(), self.clock.now());
        info!(date = %key, generation, count = snapshot.len(), "fetched events");
        Ok(snapshot)
    }

    /// Fresh cached events for `key`, without touching the network.
    pub async fn cached(&self, key: DateKey) -> Option<EventSnapshot> {
        self.cache.lock().await.get(key, self.clock.now())
    }

    pub async fn latest_generation(&self, key: DateKey) -> Option<u64> {
        self.generations.lock().await.get(&key).copied()
    }

    async fn begin_request(&self, key: DateKey) -> u64 {
        let mut generations = self.generations.lock().await;
        let next = generations.get(&key).map_or(1, |g| g + 1);
        generations.insert(key, next);
        next
    }
}

#[cfg(test)]
#[path = "tests/repository_tests.rs"]
mod tests;

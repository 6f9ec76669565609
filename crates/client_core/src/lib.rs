//! Data and device services behind the map screen: date-keyed event
//! retrieval with a TTL cache, the user's live position, and walking
//! directions links.

pub mod cache;
pub mod clock;
pub mod directions;
pub mod location;
pub mod repository;

pub use cache::{EventCache, EventSnapshot};
pub use clock::{Clock, ManualClock, SystemClock};
pub use directions::DirectionsLinker;
pub use location::{
    LocationProvider, LocationTracker, PermissionStatus, PositionFix, StaticLocationProvider,
    TrackerStatus, WatchOptions,
};
pub use repository::{EventRepository, EventSource, FetchError, HttpEventSource};

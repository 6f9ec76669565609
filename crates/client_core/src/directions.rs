use shared::domain::{GeoPoint, UserPosition};
use url::Url;

pub const DEFAULT_DIRECTIONS_BASE_URL: &str = "https://www.google.com/maps/dir/";

#[derive(Debug, Clone)]
pub struct DirectionsLinker {
    base: Url,
}

impl DirectionsLinker {
    pub fn new(base: Url) -> Self {
        Self { base }
    }

    pub fn parse(base: &str) -> Result<Self, url::ParseError> {
        Url::parse(base).map(Self::new)
    }

    /// Walking directions from the user's position to `destination`, or
    /// `None` while no position is known.
    pub fn build_walking_directions_url(
        &self,
        origin: Option<&UserPosition>,
        destination: GeoPoint,
    ) -> Option<Url> {
        let origin = origin?;
        let mut url = self.base.clone();
        url.set_query(Some(&format!(
            "api=1&origin={},{}&destination={},{}&travelmode=walking",
            origin.lat, origin.lng, destination.lat, destination.lng
        )));
        Some(url)
    }
}

#[cfg(test)]
#[path = "tests/directions_tests.rs"]
mod tests;

use serde::{Deserialize, Serialize};

use crate::{
    domain::{parse_event_timestamp, DateKey, Event, EventId, GeoPoint, Venue, VenueId},
    error::MalformedFeature,
};

/// Query string of `GET /events`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventsQuery {
    pub date_from: String,
    pub limit: u32,
    pub offset: u32,
}

impl EventsQuery {
    pub fn for_day(key: DateKey, limit: u32, offset: u32) -> Self {
        Self {
            date_from: key.day_start(),
            limit,
            offset,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    pub geometry: PointGeometry,
    pub properties: EventProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointGeometry {
    /// `[lng, lat]`
    pub coordinates: [f64; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventProperties {
    pub id: i64,
    pub show_name: String,
    pub date: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub img: Option<String>,
    pub venue: VenueProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueProperties {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub logo: String,
}

impl TryFrom<Feature> for Event {
    type Error = MalformedFeature;

    fn try_from(feature: Feature) -> Result<Self, Self::Error> {
        let [lng, lat] = feature.geometry.coordinates;
        let props = feature.properties;

        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(MalformedFeature::InvalidCoordinates {
                id: props.id,
                lng,
                lat,
            });
        }

        let starts_at =
            parse_event_timestamp(&props.date).ok_or_else(|| MalformedFeature::InvalidTimestamp {
                id: props.id,
                value: props.date.clone(),
            })?;

        Ok(Event {
            id: EventId(props.id),
            location: GeoPoint::new(lat, lng),
            show_name: props.show_name,
            starts_at,
            link: props.link,
            image_url: props.img.filter(|img| !img.trim().is_empty()),
            venue: Venue {
                id: VenueId(props.venue.id),
                name: props.venue.name,
                logo: props.venue.logo,
            },
        })
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;

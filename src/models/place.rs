use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// GeoJSON point as sent by clients: `{"type":"Point","coordinates":[lng,lat]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: (f64, f64), // (lng, lat)
}

impl GeoPoint {
    pub fn to_coordinate(&self) -> Coordinate {
        Coordinate {
            lat: self.coordinates.1,
            lng: self.coordinates.0,
        }
    }

    pub fn from_coordinate(coord: Coordinate) -> Self {
        Self {
            kind: "Point".to_string(),
            coordinates: (coord.lng, coord.lat),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceCategory {
    Cultural,
    Natural,
    Historical,
    Adventure,
    Religious,
    Food,
    Photography,
    /// Catalog categories this service does not know about yet.
    #[serde(other)]
    Other,
}

/// A point of interest from the catalog. Immutable reference data;
/// the planner never writes these back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub city: String,
    pub address: String,
    pub coordinates: Coordinate,
    pub category: PlaceCategory,
    /// 0.0 means free entry.
    pub entrance_fee: f64,
}

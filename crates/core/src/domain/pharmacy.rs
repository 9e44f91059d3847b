use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// One on-call shift entry from the feed, with coordinates and timestamps
/// already parsed. `from`/`to` are naive local wall-clock values; the feed
/// carries no zone designator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PharmacyRecord {
    pub id: String,
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
    pub name: String,
    pub street: String,
    pub zip_code: String,
    pub location: String,
    pub phone: String,
    pub position: GeoPoint,
}

/// A selected record. `distance_km` is full precision and is `None` exactly
/// when the user location was unknown at selection time.
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    pub record: PharmacyRecord,
    pub distance_km: Option<f64>,
}

use crate::domain::pharmacy::{GeoPoint, PharmacyRecord};
use crate::ingest::error::FeedError;
use crate::time;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One feed entry exactly as it arrives: every field is text, including the
/// coordinates and the shift-window timestamps. Conversion to
/// [`PharmacyRecord`] is the explicit fallible step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub street: String,
    #[serde(default, rename = "zipCode")]
    pub zip_code: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub lat: String,
    #[serde(default)]
    pub lon: String,
}

impl RawEntry {
    pub fn into_record(self) -> Result<PharmacyRecord, FeedError> {
        let from = parse_timestamp_field("from", &self.from)?;
        let to = parse_timestamp_field("to", &self.to)?;
        let lat = parse_coordinate_field("lat", &self.lat)?;
        let lon = parse_coordinate_field("lon", &self.lon)?;

        Ok(PharmacyRecord {
            id: self.id,
            from,
            to,
            name: self.name.trim().to_string(),
            street: self.street.trim().to_string(),
            zip_code: self.zip_code.trim().to_string(),
            location: self.location.trim().to_string(),
            phone: self.phone.trim().to_string(),
            position: GeoPoint { lat, lon },
        })
    }
}

fn parse_timestamp_field(field: &'static str, value: &str) -> Result<NaiveDateTime, FeedError> {
    if value.trim().is_empty() {
        return Err(FeedError::MissingField { field });
    }
    time::parse_wall_clock(value).ok_or_else(|| FeedError::InvalidTimestamp {
        field,
        value: value.to_string(),
    })
}

fn parse_coordinate_field(field: &'static str, value: &str) -> Result<f64, FeedError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FeedError::MissingField { field });
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| FeedError::InvalidCoordinate {
            field,
            value: value.to_string(),
        })
}

/// The JSON document the proxy emits, mirroring the upstream XML structure:
/// `{ container: { entries: { entry: ... } } }`. `entry` is a single object
/// when the feed holds one record and an array when it holds several.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedDocument {
    pub container: Container,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Container {
    pub entries: Entries,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entries {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<EntryShape>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryShape {
    One(Box<RawEntry>),
    Many(Vec<RawEntry>),
}

impl Entries {
    /// Normalize the object-or-array union (and the zero-entries case) to a
    /// uniform list, so nothing downstream branches on shape.
    pub fn into_list(self) -> Vec<RawEntry> {
        match self.entry {
            None => Vec::new(),
            Some(EntryShape::One(e)) => vec![*e],
            Some(EntryShape::Many(list)) => list,
        }
    }
}

impl FeedDocument {
    pub fn from_entries(mut entries: Vec<RawEntry>) -> Self {
        let entry = match entries.len() {
            0 => None,
            1 => Some(EntryShape::One(Box::new(entries.remove(0)))),
            _ => Some(EntryShape::Many(entries)),
        };
        Self {
            container: Container {
                entries: Entries { entry },
            },
        }
    }

    pub fn into_list(self) -> Vec<RawEntry> {
        self.container.entries.into_list()
    }
}

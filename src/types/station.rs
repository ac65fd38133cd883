//! Defines the data structures representing buoy stations and their metadata:
//! location, free-text notes and the bounds of their historical archive. Also
//! includes the implementations necessary for spatial indexing with `rstar`.

use rstar::{RTreeObject, AABB};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// --- Data Structures ---

/// A single buoy station with its static metadata.
///
/// Records are immutable once built. A record may carry [`Bounds::Unknown`] when
/// archive discovery failed, but such records never make it into a
/// [`crate::StationTable`].
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StationRecord {
    /// The NDBC station identifier (e.g. "tplm2", "44013").
    pub id: String,
    /// Signed decimal degree coordinates of the station.
    pub location: Location,
    /// Free-text notes from the station catalog. Often empty.
    pub notes: String,
    /// The first and last year with archived data.
    pub bounds: Bounds,
}

/// Geographic location of a station in signed decimal degrees.
///
/// Positive latitude is North, positive longitude is East.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// The earliest and latest year for which a station has retrievable archives.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bounds {
    Known { min_year: i32, max_year: i32 },
    /// Discovery failed or the station has no yearly archive at all.
    Unknown,
}

/// A location as the station catalog spells it: magnitudes and hemisphere letters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CatalogLocation {
    pub latitude: String,
    pub latitude_hemisphere: String,
    pub longitude: String,
    pub longitude_hemisphere: String,
    pub notes: String,
}

/// Reasons a catalog location cannot become a [`Location`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidLocation {
    #[error("'{0}' is not a coordinate magnitude")]
    Magnitude(String),

    #[error("'{0}' is not a hemisphere letter")]
    Hemisphere(String),

    #[error("({latitude}, {longitude}) is outside the valid range")]
    OutOfRange { latitude: f64, longitude: f64 },
}

impl Location {
    /// Builds a location, rejecting coordinates outside [-90, 90] x [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidLocation> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(InvalidLocation::OutOfRange {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Converts catalog magnitudes and hemisphere letters to signed degrees.
    ///
    /// # Examples
    ///
    /// ```
    /// use buoydata::{CatalogLocation, Location};
    ///
    /// let raw = CatalogLocation {
    ///     latitude: "38.556".into(),
    ///     latitude_hemisphere: "N".into(),
    ///     longitude: "76.415".into(),
    ///     longitude_hemisphere: "W".into(),
    ///     notes: String::new(),
    /// };
    /// let location = Location::from_catalog(&raw).unwrap();
    /// assert_eq!(location, Location { latitude: 38.556, longitude: -76.415 });
    /// ```
    pub fn from_catalog(raw: &CatalogLocation) -> Result<Self, InvalidLocation> {
        let lat = parse_magnitude(&raw.latitude)?
            * hemisphere_sign(&raw.latitude_hemisphere, 'N', 'S')?;
        let lon = parse_magnitude(&raw.longitude)?
            * hemisphere_sign(&raw.longitude_hemisphere, 'E', 'W')?;
        Self::new(lat, lon)
    }
}

fn parse_magnitude(text: &str) -> Result<f64, InvalidLocation> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|m| m.is_finite() && *m >= 0.0)
        .ok_or_else(|| InvalidLocation::Magnitude(text.to_string()))
}

fn hemisphere_sign(letter: &str, positive: char, negative: char) -> Result<f64, InvalidLocation> {
    let mut chars = letter.trim().chars();
    match (chars.next().map(|c| c.to_ascii_uppercase()), chars.next()) {
        (Some(c), None) if c == positive => Ok(1.0),
        (Some(c), None) if c == negative => Ok(-1.0),
        _ => Err(InvalidLocation::Hemisphere(letter.to_string())),
    }
}

impl Bounds {
    pub fn is_known(&self) -> bool {
        matches!(self, Bounds::Known { .. })
    }

    /// Returns `(min_year, max_year)` for known bounds.
    pub fn years(&self) -> Option<(i32, i32)> {
        match self {
            Bounds::Known { min_year, max_year } => Some((*min_year, *max_year)),
            Bounds::Unknown => None,
        }
    }
}

// --- R-Tree Implementations ---

/// Lets a `StationRecord` live in an R-Tree keyed by `[latitude, longitude]`.
impl RTreeObject for StationRecord {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        // A station is a point, so its envelope is degenerate.
        AABB::from_point([self.location.latitude, self.location.longitude])
    }
}

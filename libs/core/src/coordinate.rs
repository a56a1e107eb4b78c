//! Coordinate resolution for logged messages.
//!
//! Messages do not carry a usable location yet, so the default resolver picks
//! one of a fixed set of points at random. Swapping in real geolocation only
//! requires another [`CoordinateResolver`] implementation.

use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ExtractError;
use crate::path::is_present;

/// A WGS84 latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Points the placeholder resolver draws from.
pub const KNOWN_POINTS: [Coordinate; 28] = [
    Coordinate::new(37.9838, 23.7275),
    Coordinate::new(40.6401, 22.9444),
    Coordinate::new(38.2466, 21.7346),
    Coordinate::new(35.3387, 25.1442),
    Coordinate::new(39.6650, 20.8537),
    Coordinate::new(39.6390, 22.4191),
    Coordinate::new(39.3622, 22.9425),
    Coordinate::new(35.5138, 24.0180),
    Coordinate::new(41.1171, 25.4058),
    Coordinate::new(40.8457, 25.8739),
    Coordinate::new(37.0755, 22.4303),
    Coordinate::new(38.9010, 22.4330),
    Coordinate::new(36.4349, 28.2176),
    Coordinate::new(39.1090, 26.5553),
    Coordinate::new(37.4467, 25.3289),
    Coordinate::new(38.3680, 26.1358),
    Coordinate::new(40.3007, 21.7887),
    Coordinate::new(40.5167, 21.2667),
    Coordinate::new(41.0851, 23.5476),
    Coordinate::new(40.9396, 24.4069),
    Coordinate::new(37.5674, 22.8016),
    Coordinate::new(37.0391, 22.1142),
    Coordinate::new(38.4340, 22.8766),
    Coordinate::new(38.6197, 20.7897),
    Coordinate::new(39.6243, 19.9217),
    Coordinate::new(36.3932, 25.4615),
    Coordinate::new(37.4415, 24.9411),
    Coordinate::new(35.2401, 24.8093),
];

/// Produces the coordinate attached to a message.
pub trait CoordinateResolver: Send + Sync {
    /// Resolves a coordinate for `message`.
    ///
    /// An absent or empty message is rejected with
    /// [`ExtractError::EmptyMessage`]; callers are expected to guard.
    fn resolve(&self, message: &Value) -> Result<Coordinate, ExtractError>;
}

/// Placeholder resolver: uniform choice from a fixed point table.
#[derive(Debug, Clone, Copy)]
pub struct RandomPointResolver {
    points: &'static [Coordinate],
}

impl RandomPointResolver {
    pub fn new(points: &'static [Coordinate]) -> Self {
        Self { points }
    }
}

impl Default for RandomPointResolver {
    fn default() -> Self {
        Self::new(&KNOWN_POINTS)
    }
}

impl CoordinateResolver for RandomPointResolver {
    fn resolve(&self, message: &Value) -> Result<Coordinate, ExtractError> {
        if !is_present(message) {
            return Err(ExtractError::EmptyMessage);
        }
        self.points
            .choose(&mut rand::rng())
            .copied()
            .ok_or(ExtractError::NoCoordinates)
    }
}

/// Resolves a coordinate with the default placeholder table.
///
/// ```
/// use msglog_core::{coordinate_for, KNOWN_POINTS};
/// use serde_json::json;
///
/// let point = coordinate_for(&json!({ "text": "hello" })).unwrap();
/// assert!(KNOWN_POINTS.contains(&point));
/// assert!(coordinate_for(&json!({})).is_err());
/// ```
pub fn coordinate_for(message: &Value) -> Result<Coordinate, ExtractError> {
    RandomPointResolver::default().resolve(message)
}

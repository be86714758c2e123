use std::str::FromStr;

use geo_types::Point;
use serde::{Deserialize, Serialize};

/// A route selected for navigation, with the metrics precomputed by the
/// route optimization service. Distance and duration are inputs here, never
/// recomputed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Route {
    pub source: String,
    pub destination: String,
    pub source_coords: Point,
    pub dest_coords: Point,
    pub distance_km: f64,
    pub duration_mins: f64,
    pub speed_kmh: f64,
    pub mode: TravelMode,
}

impl Route {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        source: String,
        destination: String,
        source_coords: Point,
        dest_coords: Point,
        distance_km: f64,
        duration_mins: f64,
        speed_kmh: f64,
        mode: TravelMode,
    ) -> Self {
        Self {
            source,
            destination,
            source_coords,
            dest_coords,
            distance_km,
            duration_mins,
            speed_kmh,
            mode,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    Bike,
    Car,
    Walk,
    Bus,
    Metro,
    Auto,
    Cab,
}

impl TravelMode {
    /// Vehicle label as the tracking service expects it.
    pub fn vehicle_label(&self) -> &'static str {
        match self {
            TravelMode::Bike => "BIKE",
            TravelMode::Car => "CAR",
            TravelMode::Walk => "WALK",
            TravelMode::Bus => "BUS",
            TravelMode::Metro => "METRO",
            TravelMode::Auto => "AUTO",
            TravelMode::Cab => "CAB",
        }
    }

    /// Marker glyph shown next to position output.
    pub fn glyph(&self) -> &'static str {
        match self {
            TravelMode::Bike => "🏍️",
            TravelMode::Car => "🚗",
            TravelMode::Walk => "🚶",
            TravelMode::Bus => "🚌",
            TravelMode::Metro => "🚇",
            TravelMode::Auto => "🛺",
            TravelMode::Cab => "🚕",
        }
    }
}

impl FromStr for TravelMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bike" => Ok(TravelMode::Bike),
            "car" => Ok(TravelMode::Car),
            "walk" => Ok(TravelMode::Walk),
            "bus" | "bmtc" => Ok(TravelMode::Bus),
            "metro" => Ok(TravelMode::Metro),
            "auto" => Ok(TravelMode::Auto),
            "cab" | "aggregator" => Ok(TravelMode::Cab),
            other => Err(format!("Unknown travel mode: {other}")),
        }
    }
}

//! Wire contract for the remote tracking service.
//!
//! Field names match what the tracking backend reads out of the JSON bodies
//! on `/api/navigation/start`, `/api/navigation/update` and
//! `/api/navigation/stop`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StartTrackingRequest {
    pub booking_id: i64,
    pub vehicle_number: String,
    pub source: String,
    pub source_lat: f64,
    pub source_lng: f64,
    pub total_distance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartTrackingResponse {
    pub success: bool,
    #[serde(default)]
    pub tracking_id: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateTrackingRequest {
    pub tracking_id: i64,
    pub lat: f64,
    pub lng: f64,
    pub distance_remaining: f64,
    /// Human-readable position, "lat, lng" to four decimals.
    pub location: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StopTrackingRequest {
    pub tracking_id: i64,
}

/// Response body shared by the update and stop endpoints. Informational
/// only; callers treat these endpoints as best-effort.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingAck {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

use chrono::{DateTime, Utc};
use geo_types::Point;
use trip_navigator_lib::{
    comms::UpdateTrackingRequest,
    progress::{chord_position, remaining_distance_km, remaining_minutes},
    route::Route,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Arrived,
    Cancelled,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Arrived | SessionState::Cancelled)
    }
}

/// One simulated trip. Owns everything the clock and reporter need, so two
/// sessions can never interfere through shared globals.
///
/// Progress is the fraction of the route duration elapsed, advanced one step
/// per clock tick and never decreasing. Arrived and Cancelled are terminal;
/// a new navigation always builds a fresh session.
pub struct NavigationSession {
    route: Route,
    tracking_id: i64,
    started_at: DateTime<Utc>,
    step: u64,
    total_steps: u64,
    progress: f64,
    state: SessionState,
}

impl NavigationSession {
    pub fn new(route: Route, tracking_id: i64, total_steps: u64) -> Self {
        Self {
            route,
            tracking_id,
            started_at: Utc::now(),
            step: 0,
            total_steps,
            progress: 0.0,
            state: SessionState::Active,
        }
    }

    pub fn tracking_id(&self) -> i64 {
        self.tracking_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Advance by one clock tick. Arrival is reached when the step counter
    /// catches up with the total; a session with no steps to simulate
    /// arrives on the first advance.
    pub fn advance(&mut self) {
        if self.state != SessionState::Active {
            return;
        }
        self.step += 1;
        self.progress = if self.total_steps == 0 {
            1.0
        } else {
            (self.step as f64 / self.total_steps as f64).min(1.0)
        };
        if self.progress >= 1.0 {
            self.state = SessionState::Arrived;
        }
    }

    /// Only valid while Active; terminal states stay terminal.
    pub fn mark_cancelled(&mut self) {
        if self.state == SessionState::Active {
            self.state = SessionState::Cancelled;
        }
    }

    pub fn position(&self) -> Point {
        chord_position(self.route.source_coords, self.route.dest_coords, self.progress)
    }

    fn location_label(&self) -> String {
        let position = self.position();
        format!("{:.4}, {:.4}", position.y(), position.x())
    }

    pub fn status(&self) -> NavigationStatus {
        let arrived = self.progress >= 1.0;
        NavigationStatus {
            state: self.state,
            position: self.position(),
            location: self.location_label(),
            remaining_km: remaining_distance_km(self.route.distance_km, self.progress),
            remaining_mins: remaining_minutes(self.route.duration_mins, self.progress),
            speed_kmh: if arrived { 0.0 } else { self.route.speed_kmh },
            progress: self.progress,
            started_at: self.started_at,
        }
    }

    /// Telemetry payload for the current position.
    pub fn update_request(&self) -> UpdateTrackingRequest {
        let position = self.position();
        UpdateTrackingRequest {
            tracking_id: self.tracking_id,
            lat: position.y(),
            lng: position.x(),
            distance_remaining: remaining_distance_km(self.route.distance_km, self.progress),
            location: self.location_label(),
        }
    }
}

/// Snapshot of a session for display binding. Everything the four display
/// labels and the marker need.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationStatus {
    pub state: SessionState,
    pub position: Point,
    pub location: String,
    pub remaining_km: f64,
    pub remaining_mins: f64,
    pub speed_kmh: f64,
    pub progress: f64,
    pub started_at: DateTime<Utc>,
}

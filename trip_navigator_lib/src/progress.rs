use geo_types::Point;

/// Position along the straight chord between source and destination for a
/// given progress fraction. This is a deliberate approximation: it does not
/// follow the actual road geometry, only the line between the endpoints.
///
/// Progress 0 yields exactly the source and progress 1 exactly the
/// destination; the endpoint is returned verbatim rather than interpolated
/// so arrival lands on the destination without f64 rounding drift.
pub fn chord_position(source: Point, destination: Point, progress: f64) -> Point {
    let progress = progress.clamp(0.0, 1.0);
    if progress >= 1.0 {
        return destination;
    }
    Point::new(
        source.x() + (destination.x() - source.x()) * progress,
        source.y() + (destination.y() - source.y()) * progress,
    )
}

pub fn remaining_distance_km(total_distance_km: f64, progress: f64) -> f64 {
    total_distance_km * (1.0 - progress.clamp(0.0, 1.0))
}

pub fn remaining_minutes(total_duration_mins: f64, progress: f64) -> f64 {
    total_duration_mins * (1.0 - progress.clamp(0.0, 1.0))
}

/// Whole minutes for display. Ceiled, so "0 mins" only ever shows at actual
/// arrival.
pub fn display_minutes(remaining_minutes: f64) -> u64 {
    remaining_minutes.max(0.0).ceil() as u64
}

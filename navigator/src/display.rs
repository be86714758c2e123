use trip_navigator_lib::progress::display_minutes;

use crate::session::NavigationStatus;

/// Where navigation output goes: the moving marker plus the four labels
/// (position, distance remaining, time remaining, speed), an arrival notice
/// and a start-failure notice.
///
/// Implementations must tolerate missing display targets: a label that is
/// not present is skipped, never an error, and nothing here may panic.
pub trait DisplaySink: Send + Sync + 'static {
    fn update_position(&self, status: &NavigationStatus);

    fn show_arrival(&self);

    fn show_error(&self, message: &str);
}

/// Display sink that writes to the log. What the CLI binary binds.
pub struct LogDisplay;

impl DisplaySink for LogDisplay {
    fn update_position(&self, status: &NavigationStatus) {
        tracing::info!(
            "at {} | {:.2} km remaining | {} mins remaining | {} km/h",
            status.location,
            status.remaining_km,
            display_minutes(status.remaining_mins),
            status.speed_kmh,
        );
    }

    fn show_arrival(&self) {
        tracing::info!("Destination reached!");
    }

    fn show_error(&self, message: &str) {
        tracing::error!("{message}");
    }
}

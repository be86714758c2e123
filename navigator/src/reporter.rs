//! Position reporting: turn progress into a position, refresh the display,
//! and forward best-effort telemetry to the tracking service.

use std::sync::{Arc, Mutex};

use trip_navigator_lib::comms::UpdateTrackingRequest;

use crate::{
    display::DisplaySink,
    session::{NavigationSession, SessionState},
    tracking::TrackingService,
};

pub(crate) struct TickOutcome {
    pub update: UpdateTrackingRequest,
    pub arrived: bool,
}

/// One reporter pass: advance the session a step, refresh the display, and
/// hand back the telemetry payload for this tick.
pub(crate) fn advance<D: DisplaySink>(
    session: &Mutex<NavigationSession>,
    display: &D,
) -> TickOutcome {
    let (status, update) = {
        let mut session = session.lock().unwrap();
        session.advance();
        (session.status(), session.update_request())
    };

    display.update_position(&status);

    TickOutcome {
        update,
        arrived: status.state == SessionState::Arrived,
    }
}

/// Best-effort telemetry. Dispatched without awaiting so a slow or failed
/// call never delays the next tick; failures are logged and swallowed.
pub(crate) fn report_position<S: TrackingService>(tracking: Arc<S>, request: UpdateTrackingRequest) {
    tokio::spawn(async move {
        let tracking_id = request.tracking_id;
        if let Err(err) = tracking.update_tracking(request).await {
            tracing::warn!("Position update for tracking session {tracking_id} failed: {err}");
        }
    });
}

/// Close the remote tracking session. Best-effort like updates: the local
/// session is already terminal whether or not the server confirms.
pub(crate) fn close_remote<S: TrackingService>(tracking: Arc<S>, tracking_id: i64) {
    tokio::spawn(async move {
        if let Err(err) = tracking.stop_tracking(tracking_id).await {
            tracing::warn!("Failed to close tracking session {tracking_id}: {err}");
        }
    });
}

/// Arrival path: surface the notice and tear down the remote session. The
/// final position update has already been rendered by [`advance`].
pub(crate) fn handle_arrival<S: TrackingService, D: DisplaySink>(
    tracking: &Arc<S>,
    display: &D,
    tracking_id: i64,
) {
    display.show_arrival();
    close_remote(tracking.clone(), tracking_id);
}

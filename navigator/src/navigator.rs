use std::sync::{Arc, Mutex};

use trip_navigator_lib::{comms::StartTrackingRequest, route::Route};

use crate::{
    clock::{self, SessionClock},
    display::DisplaySink,
    reporter,
    session::{NavigationSession, NavigationStatus, SessionState},
    tracking::{TrackingError, TrackingService},
};

/// The public interface for simulated navigation. Owns at most one session
/// and its clock; starting a new route always tears the old one down first.
pub struct Navigator<S, D>
where
    S: TrackingService,
    D: DisplaySink,
{
    tracking: Arc<S>,
    display: Arc<D>,
    active: Option<ActiveSession>,
}

struct ActiveSession {
    session: Arc<Mutex<NavigationSession>>,
    clock: SessionClock,
}

impl<S, D> Navigator<S, D>
where
    S: TrackingService,
    D: DisplaySink,
{
    pub fn new(tracking: Arc<S>, display: Arc<D>) -> Self {
        Self {
            tracking,
            display,
            active: None,
        }
    }

    /// Start navigating a route. Opens a remote tracking session first; if
    /// that fails nothing starts and the error is surfaced. A session
    /// already running is cancelled, so at most one timer is ever active.
    pub async fn start(&mut self, route: Route) -> Result<(), TrackingError> {
        self.cancel();

        let request = StartTrackingRequest {
            booking_id: 0,
            vehicle_number: route.mode.vehicle_label().to_string(),
            source: route.source.clone(),
            source_lat: route.source_coords.y(),
            source_lng: route.source_coords.x(),
            total_distance: route.distance_km,
        };

        let tracking_id = match self.tracking.start_tracking(request).await {
            Ok(tracking_id) => tracking_id,
            Err(err) => {
                self.display.show_error("Failed to start navigation");
                return Err(err);
            }
        };

        tracing::info!("Tracking session {tracking_id} opened, starting navigation");

        let total_steps = clock::total_ticks(route.duration_mins);
        let session = Arc::new(Mutex::new(NavigationSession::new(
            route,
            tracking_id,
            total_steps,
        )));

        let clock = if total_steps == 0 {
            // Nothing to simulate. Render the arrival position once and run
            // the arrival path without ever scheduling a timer.
            let outcome = reporter::advance(session.as_ref(), self.display.as_ref());
            reporter::report_position(self.tracking.clone(), outcome.update);
            reporter::handle_arrival(&self.tracking, self.display.as_ref(), tracking_id);
            SessionClock::idle()
        } else {
            SessionClock::start(session.clone(), self.tracking.clone(), self.display.clone())
        };

        self.active = Some(ActiveSession { session, clock });
        Ok(())
    }

    /// Stop the running session, if any. The timer is stopped before this
    /// returns; the remote stop call is issued best-effort, exactly once per
    /// session. A no-op when nothing is navigating.
    pub fn cancel(&mut self) {
        let Some(mut active) = self.active.take() else {
            return;
        };
        active.clock.cancel();

        let tracking_id = {
            let mut session = active.session.lock().unwrap();
            if session.state().is_terminal() {
                // Arrived (or already cancelled): the remote session was
                // closed on that path.
                return;
            }
            session.mark_cancelled();
            session.tracking_id()
        };

        tracing::info!("Navigation cancelled, closing tracking session {tracking_id}");
        reporter::close_remote(self.tracking.clone(), tracking_id);
    }

    /// Snapshot of the current session for display binding, if one exists.
    pub fn status(&self) -> Option<NavigationStatus> {
        self.active
            .as_ref()
            .map(|active| active.session.lock().unwrap().status())
    }

    pub fn is_navigating(&self) -> bool {
        matches!(self.status(), Some(status) if status.state == SessionState::Active)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
    use std::time::Duration;

    use geo_types::Point;
    use tokio::time;
    use trip_navigator_lib::{
        comms::UpdateTrackingRequest,
        route::{Route, TravelMode},
    };

    use super::*;

    #[derive(Default)]
    struct RecordingTracker {
        next_id: AtomicI64,
        starts: AtomicUsize,
        stops: AtomicUsize,
        updates: Mutex<Vec<UpdateTrackingRequest>>,
        /// 1-based update number that should fail with a transport error.
        fail_update_at: Option<usize>,
        fail_start: bool,
    }

    impl RecordingTracker {
        fn update_count(&self) -> usize {
            self.updates.lock().unwrap().len()
        }
    }

    impl TrackingService for RecordingTracker {
        async fn start_tracking(
            &self,
            _request: trip_navigator_lib::comms::StartTrackingRequest,
        ) -> Result<i64, TrackingError> {
            if self.fail_start {
                return Err(TrackingError::Rejected("Error: no such user".into()));
            }
            self.starts.fetch_add(1, Ordering::SeqCst);
            Ok(self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
        }

        async fn update_tracking(
            &self,
            request: UpdateTrackingRequest,
        ) -> Result<(), TrackingError> {
            let mut updates = self.updates.lock().unwrap();
            updates.push(request);
            if Some(updates.len()) == self.fail_update_at {
                return Err(TrackingError::Transport("connection reset".into()));
            }
            Ok(())
        }

        async fn stop_tracking(&self, _tracking_id: i64) -> Result<(), TrackingError> {
            self.stops.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingDisplay {
        renders: Mutex<Vec<NavigationStatus>>,
        arrivals: AtomicUsize,
        errors: Mutex<Vec<String>>,
    }

    impl DisplaySink for RecordingDisplay {
        fn update_position(&self, status: &NavigationStatus) {
            self.renders.lock().unwrap().push(status.clone());
        }

        fn show_arrival(&self) {
            self.arrivals.fetch_add(1, Ordering::SeqCst);
        }

        fn show_error(&self, message: &str) {
            self.errors.lock().unwrap().push(message.to_string());
        }
    }

    fn airport_route() -> Route {
        Route::new(
            "MG Road".into(),
            "Airport".into(),
            Point::new(77.60, 12.90),
            Point::new(77.70, 13.00),
            10.0,
            2.0,
            40.0,
            TravelMode::Car,
        )
    }

    fn navigator(
        tracker: RecordingTracker,
    ) -> (
        Navigator<RecordingTracker, RecordingDisplay>,
        Arc<RecordingTracker>,
        Arc<RecordingDisplay>,
    ) {
        let tracker = Arc::new(tracker);
        let display = Arc::new(RecordingDisplay::default());
        let nav = Navigator::new(tracker.clone(), display.clone());
        (nav, tracker, display)
    }

    /// Let spawned fire-and-forget tasks run to completion.
    async fn drain_spawned() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn full_route_simulation() {
        let (mut nav, tracker, display) = navigator(RecordingTracker::default());

        nav.start(airport_route()).await.unwrap();
        assert!(nav.is_navigating());

        // 2 minutes at 1 s ticks: 120 ticks, then one spare second.
        time::sleep(Duration::from_secs(121)).await;
        drain_spawned().await;

        let updates = tracker.updates.lock().unwrap();
        assert_eq!(updates.len(), 120);

        // Progress climbs monotonically in steps of 1/120.
        let renders = display.renders.lock().unwrap();
        assert_eq!(renders.len(), 120);
        for (i, status) in renders.iter().enumerate() {
            let expected = (i + 1) as f64 / 120.0;
            assert!((status.progress - expected).abs() < 1e-12);
        }

        // The final tick lands exactly on the destination.
        let last = updates.last().unwrap();
        assert_eq!(last.lat, 13.00);
        assert_eq!(last.lng, 77.70);
        assert_eq!(last.distance_remaining, 0.0);

        assert_eq!(display.arrivals.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.stops.load(Ordering::SeqCst), 1);

        assert!(!nav.is_navigating());
        assert_eq!(nav.status().unwrap().state, SessionState::Arrived);
    }

    #[tokio::test(start_paused = true)]
    async fn update_failure_does_not_stall_the_clock() {
        let tracker = RecordingTracker {
            fail_update_at: Some(5),
            ..Default::default()
        };
        let (mut nav, tracker, display) = navigator(tracker);

        nav.start(airport_route()).await.unwrap();
        time::sleep(Duration::from_secs(121)).await;
        drain_spawned().await;

        // Tick 6 and everything after still fired on schedule.
        assert_eq!(tracker.update_count(), 120);
        assert_eq!(display.arrivals.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_mid_route_stops_the_timer() {
        let (mut nav, tracker, display) = navigator(RecordingTracker::default());

        nav.start(airport_route()).await.unwrap();
        time::sleep(Duration::from_millis(50_500)).await;
        assert_eq!(tracker.update_count(), 50);

        nav.cancel();
        drain_spawned().await;

        // No further ticks, exactly one stop call, UI no longer navigating.
        time::sleep(Duration::from_secs(10)).await;
        drain_spawned().await;
        assert_eq!(tracker.update_count(), 50);
        assert_eq!(tracker.stops.load(Ordering::SeqCst), 1);
        assert_eq!(display.arrivals.load(Ordering::SeqCst), 0);
        assert!(!nav.is_navigating());
        assert_eq!(nav.status(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_without_session_is_a_noop() {
        let (mut nav, tracker, _display) = navigator(RecordingTracker::default());
        nav.cancel();
        nav.cancel();
        drain_spawned().await;
        assert_eq!(tracker.stops.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_after_arrival_sends_no_second_stop() {
        let (mut nav, tracker, _display) = navigator(RecordingTracker::default());

        nav.start(airport_route()).await.unwrap();
        time::sleep(Duration::from_secs(121)).await;
        drain_spawned().await;
        assert_eq!(tracker.stops.load(Ordering::SeqCst), 1);

        nav.cancel();
        drain_spawned().await;
        assert_eq!(tracker.stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn starting_again_replaces_the_running_session() {
        let (mut nav, tracker, display) = navigator(RecordingTracker::default());

        nav.start(airport_route()).await.unwrap();
        time::sleep(Duration::from_millis(10_500)).await;
        assert_eq!(tracker.update_count(), 10);

        // Half-minute route: 30 ticks.
        let mut short = airport_route();
        short.duration_mins = 0.5;
        nav.start(short).await.unwrap();
        drain_spawned().await;

        // The first session was cancelled and closed.
        assert_eq!(tracker.stops.load(Ordering::SeqCst), 1);

        time::sleep(Duration::from_secs(31)).await;
        drain_spawned().await;

        // Exactly one timer ran: 10 ticks from the first session plus 30
        // from the second, and only the second arrived.
        assert_eq!(tracker.update_count(), 40);
        assert_eq!(display.arrivals.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.stops.load(Ordering::SeqCst), 2);
        assert_eq!(nav.status().unwrap().state, SessionState::Arrived);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_duration_arrives_immediately() {
        let (mut nav, tracker, display) = navigator(RecordingTracker::default());

        let mut route = airport_route();
        route.duration_mins = 0.0;
        nav.start(route).await.unwrap();

        // Arrival happened synchronously, with one rendered update.
        let status = nav.status().unwrap();
        assert_eq!(status.state, SessionState::Arrived);
        assert_eq!(status.position, Point::new(77.70, 13.00));
        assert_eq!(display.renders.lock().unwrap().len(), 1);
        assert_eq!(display.arrivals.load(Ordering::SeqCst), 1);
        assert!(!nav.is_navigating());

        drain_spawned().await;
        assert_eq!(tracker.update_count(), 1);
        assert_eq!(tracker.stops.load(Ordering::SeqCst), 1);

        // No timer was scheduled.
        time::sleep(Duration::from_secs(5)).await;
        drain_spawned().await;
        assert_eq!(tracker.update_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_start_never_activates_navigation() {
        let tracker = RecordingTracker {
            fail_start: true,
            ..Default::default()
        };
        let (mut nav, tracker, display) = navigator(tracker);

        let result = nav.start(airport_route()).await;
        assert!(result.is_err());
        assert_eq!(nav.status(), None);
        assert!(!nav.is_navigating());
        assert_eq!(display.errors.lock().unwrap().len(), 1);

        time::sleep(Duration::from_secs(5)).await;
        drain_spawned().await;
        assert_eq!(tracker.update_count(), 0);
        assert_eq!(tracker.stops.load(Ordering::SeqCst), 0);
    }
}

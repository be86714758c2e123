use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use tokio::{
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};

use crate::{display::DisplaySink, reporter, session::NavigationSession, tracking::TrackingService};

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Number of clock ticks needed for a route duration. At least one tick for
/// any positive duration, so a position update is always rendered before
/// arrival. Zero means nothing to simulate: the caller arrives immediately
/// without scheduling a timer.
pub(crate) fn total_ticks(duration_mins: f64) -> u64 {
    if duration_mins <= 0.0 {
        return 0;
    }
    let ticks = (duration_mins * 60.0 / TICK_INTERVAL.as_secs_f64()).ceil() as u64;
    ticks.max(1)
}

/// Drives time-based progress for exactly one session. The join handle is
/// the ownership token for the single repeating timer: whoever starts a new
/// clock must cancel the old one first, so at most one timer is ever active.
pub(crate) struct SessionClock {
    handle: Option<JoinHandle<()>>,
}

impl SessionClock {
    /// A clock that never ran; what terminal sessions hold.
    pub(crate) fn idle() -> Self {
        Self { handle: None }
    }

    pub(crate) fn start<S, D>(
        session: Arc<Mutex<NavigationSession>>,
        tracking: Arc<S>,
        display: Arc<D>,
    ) -> Self
    where
        S: TrackingService,
        D: DisplaySink,
    {
        Self {
            handle: Some(tokio::spawn(run_ticks(session, tracking, display))),
        }
    }

    /// Idempotent. Stops the timer without touching session state; closing
    /// the remote session is the caller's job.
    pub(crate) fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

async fn run_ticks<S, D>(
    session: Arc<Mutex<NavigationSession>>,
    tracking: Arc<S>,
    display: Arc<D>,
) where
    S: TrackingService,
    D: DisplaySink,
{
    let mut interval = time::interval(TICK_INTERVAL);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // A tokio interval yields its first tick immediately; consume it so the
    // first real tick lands one interval after start.
    interval.tick().await;

    loop {
        interval.tick().await;

        let outcome = reporter::advance(session.as_ref(), display.as_ref());
        reporter::report_position(tracking.clone(), outcome.update);

        if outcome.arrived {
            // No await between the Arrived transition and this spawn, so a
            // concurrent cancel cannot swallow the stop call.
            let tracking_id = session.lock().unwrap().tracking_id();
            reporter::handle_arrival(&tracking, display.as_ref(), tracking_id);
            break;
        }
    }
}

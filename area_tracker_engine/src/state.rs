use area_tracker_lib::{fix::Fix, geometry, statistics::LiveStatistics};

/// The path and accumulators of one in-progress tracking run.
///
/// The path is append-only and chronological by construction; `distance_km`
/// always equals the sum of consecutive-fix haversine distances over it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunState {
    pub path: Vec<Fix>,
    pub distance_km: f64,
    pub duration_seconds: u64,
}

impl RunState {
    fn record_fix(&mut self, fix: Fix) {
        if let Some(previous) = self.path.last() {
            self.distance_km += geometry::haversine_distance_km(previous, &fix);
        }
        self.path.push(fix);
    }

    fn statistics(&self) -> LiveStatistics {
        LiveStatistics {
            speed_kmh: self.path.last().and_then(|fix| fix.speed_kmh).unwrap_or(0.0),
            distance_km: self.distance_km,
            duration_seconds: self.duration_seconds,
            area_km2: geometry::enclosed_area_km2(&self.path),
        }
    }
}

/// The closed set of events the state machine consumes. Fix arrivals and
/// timer ticks come from the run's subscriptions, the rest from caller
/// commands.
#[derive(Debug, Clone)]
pub enum TrackingEvent {
    Start,
    Pause,
    Resume,
    Stop,
    Reset,
    FixReceived(Fix),
    Tick,
}

/// State of the tracking run lifecycle. `Idle` is both the initial and the
/// terminal state of every run; the machine is reusable across runs.
#[derive(Debug, Clone, Default)]
pub enum TrackingState {
    #[default]
    Idle,
    Active(RunState),
    Paused(RunState),
}

impl TrackingState {
    /// Applies one event. `Stop` from a live state hands the finished run to
    /// the caller before the machine is `Idle` again, so a session can still
    /// be built from it; every other transition returns `None`.
    pub fn apply(&mut self, event: TrackingEvent) -> Option<RunState> {
        let current = std::mem::take(self);

        let (next, finished) = match (current, event) {
            (TrackingState::Idle, TrackingEvent::Start) => {
                (TrackingState::Active(RunState::default()), None)
            }
            (TrackingState::Active(run), TrackingEvent::Pause) => {
                (TrackingState::Paused(run), None)
            }
            (TrackingState::Paused(run), TrackingEvent::Resume) => {
                (TrackingState::Active(run), None)
            }
            (TrackingState::Active(run) | TrackingState::Paused(run), TrackingEvent::Stop) => {
                (TrackingState::Idle, Some(run))
            }
            (TrackingState::Active(_) | TrackingState::Paused(_), TrackingEvent::Reset) => {
                (TrackingState::Idle, None)
            }
            (TrackingState::Active(mut run), TrackingEvent::FixReceived(fix)) => {
                run.record_fix(fix);
                (TrackingState::Active(run), None)
            }
            (TrackingState::Active(mut run), TrackingEvent::Tick) => {
                run.duration_seconds += 1;
                (TrackingState::Active(run), None)
            }
            // Everything else is a no-op: fixes while paused or idle are
            // dropped (never buffered), ticks only count while active,
            // repeated pause/resume commands are idempotent, and commands
            // that do not apply to the current state are ignored.
            (state, _) => (state, None),
        };

        *self = next;
        finished
    }

    /// Live statistics recomputed from the current run; all zeros in `Idle`.
    pub fn statistics(&self) -> LiveStatistics {
        match self {
            TrackingState::Idle => LiveStatistics::default(),
            TrackingState::Active(run) | TrackingState::Paused(run) => run.statistics(),
        }
    }

    pub fn is_live(&self) -> bool {
        !matches!(self, TrackingState::Idle)
    }
}

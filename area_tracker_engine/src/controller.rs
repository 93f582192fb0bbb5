use std::sync::{Arc, Mutex};

use area_tracker_data_management::SessionRepository;
use area_tracker_lib::{session::Session, statistics::LiveStatistics};
use tokio::{
    task::JoinHandle,
    time::{Duration, MissedTickBehavior, interval},
};

use crate::{
    EngineError,
    fix_source::{FixEvent, FixSource},
    state::{RunState, TrackingEvent, TrackingState},
};

/// The two tasks scoped to one tracking run. Dropping the guard aborts both,
/// so the fix subscription and the ticker are released on every exit path:
/// normal stop, reset, and error-triggered implicit stop.
///
/// The guard is installed before the fix forwarder is spawned, so a sensor
/// error arriving on the very first received event still finds it; until
/// then `fix_task` is empty.
struct RunGuard {
    fix_task: Option<JoinHandle<()>>,
    tick_task: JoinHandle<()>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        if let Some(fix_task) = self.fix_task.take() {
            fix_task.abort();
        }
        self.tick_task.abort();
    }
}

/// Composition root of the engine: bridges a [`FixSource`] and a 1 Hz ticker
/// into state machine events, and commits finished runs to the repository.
///
/// All transitions go through one mutex-guarded [`TrackingState`], applied
/// one event at a time, so the accumulators never race.
pub struct TrackingController {
    state: Arc<Mutex<TrackingState>>,
    fix_source: Arc<dyn FixSource>,
    repository: Arc<dyn SessionRepository>,
    run_guard: Mutex<Option<RunGuard>>,
    /// A finished session whose persist failed, kept for `retry_save`.
    unsaved: Mutex<Option<Session>>,
}

impl TrackingController {
    pub fn new(fix_source: Arc<dyn FixSource>, repository: Arc<dyn SessionRepository>) -> Arc<Self> {
        Arc::new(Self {
            state: Arc::new(Mutex::new(TrackingState::Idle)),
            fix_source,
            repository,
            run_guard: Mutex::new(None),
            unsaved: Mutex::new(None),
        })
    }

    /// Begins a new run. Fails with no state change when the fix source
    /// cannot confirm permission or availability. A no-op while a run is
    /// already live.
    pub async fn start(self: &Arc<Self>) -> Result<(), EngineError> {
        if self.state.lock().unwrap().is_live() {
            tracing::warn!("start ignored: a run is already live");
            return Ok(());
        }

        let mut subscription = self.fix_source.subscribe().await?;

        self.dispatch(TrackingEvent::Start);

        let state = Arc::clone(&self.state);
        let tick_task = tokio::spawn(async move {
            let mut ticker = interval(Duration::from_secs(1));
            // Missed ticks are not reconciled; duration is a tick count.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                state.lock().unwrap().apply(TrackingEvent::Tick);
            }
        });

        // The guard must be in place before the forwarder runs: a sensor
        // error on the first event tears the run down through it.
        *self.run_guard.lock().unwrap() = Some(RunGuard { fix_task: None, tick_task });

        let controller = Arc::downgrade(self);
        let fix_task = tokio::spawn(async move {
            while let Some(event) = subscription.recv().await {
                let Some(controller) = controller.upgrade() else { break };
                match event {
                    FixEvent::Fix(fix) => {
                        controller.dispatch(TrackingEvent::FixReceived(fix));
                    }
                    FixEvent::Error(reason) => {
                        // Implicit stop: the run is discarded, never saved.
                        tracing::error!("fix source failed mid-run: {reason}");
                        controller.dispatch(TrackingEvent::Reset);
                        controller.run_guard.lock().unwrap().take();
                        break;
                    }
                }
            }
        });

        match self.run_guard.lock().unwrap().as_mut() {
            Some(guard) => guard.fix_task = Some(fix_task),
            // The run already ended (error on the first event); the
            // forwarder has broken out of its loop, but release it anyway.
            None => fix_task.abort(),
        }
        tracing::info!("tracking started");

        Ok(())
    }

    pub fn pause(&self) {
        self.dispatch(TrackingEvent::Pause);
    }

    pub fn resume(&self) {
        self.dispatch(TrackingEvent::Resume);
    }

    /// Stops the run and releases its subscriptions. A path of at least two
    /// fixes becomes a session persisted under `name`; shorter runs are
    /// discarded silently with `Ok(None)`. On a storage failure the built
    /// session is retained for [`Self::retry_save`], so a failed persist
    /// never loses the finished path.
    pub async fn stop_and_maybe_save(&self, name: &str) -> Result<Option<Session>, EngineError> {
        let finished = self.dispatch(TrackingEvent::Stop);
        self.run_guard.lock().unwrap().take();

        let Some(run) = finished else {
            return Ok(None);
        };
        let Some(session) = Session::from_path(name.to_string(), run.path, run.distance_km) else {
            tracing::info!("run too short to save, discarded");
            return Ok(None);
        };

        self.persist(session).await.map(Some)
    }

    /// Retries the persist of a session whose save failed. `Ok(None)` when
    /// nothing is pending.
    pub async fn retry_save(&self) -> Result<Option<Session>, EngineError> {
        let Some(session) = self.unsaved.lock().unwrap().take() else {
            return Ok(None);
        };
        self.persist(session).await.map(Some)
    }

    /// Discards the current run unconditionally and releases its
    /// subscriptions.
    pub fn reset(&self) {
        self.dispatch(TrackingEvent::Reset);
        self.run_guard.lock().unwrap().take();
    }

    pub fn current_statistics(&self) -> LiveStatistics {
        self.state.lock().unwrap().statistics()
    }

    async fn persist(&self, session: Session) -> Result<Session, EngineError> {
        match self.repository.add(&session).await {
            Ok(session_id) => {
                tracing::info!(session_id, name = %session.name, "session saved");
                Ok(Session {
                    session_id: Some(session_id),
                    ..session
                })
            }
            Err(err) => {
                tracing::error!("failed to save session: {err}");
                *self.unsaved.lock().unwrap() = Some(session);
                Err(err.into())
            }
        }
    }

    fn dispatch(&self, event: TrackingEvent) -> Option<RunState> {
        self.state.lock().unwrap().apply(event)
    }
}

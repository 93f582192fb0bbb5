use std::sync::Mutex;

use area_tracker_lib::fix::Fix;
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

/// One message on a fix subscription.
#[derive(Debug, Clone)]
pub enum FixEvent {
    Fix(Fix),
    /// Unrecoverable acquisition failure; the subscription is dead after
    /// this and the controller discards the run.
    Error(String),
}

/// Why a subscription could not be opened.
#[derive(Debug, Error)]
pub enum FixSourceError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("positioning sensor unavailable")]
    Unavailable,
}

/// Push-based producer of position fixes.
///
/// Implementations deliver fixes with non-decreasing timestamps at whatever
/// cadence the sensor supports; the engine assumes but does not enforce the
/// ordering. Dropping the returned receiver releases the subscription.
#[async_trait]
pub trait FixSource: Send + Sync {
    /// Opens a subscription for one tracking run. Fails without creating a
    /// subscription when permission or the sensor itself cannot be
    /// confirmed.
    async fn subscribe(&self) -> Result<mpsc::Receiver<FixEvent>, FixSourceError>;
}

/// In-process fix source: a relay that forwards pushed events to the most
/// recent subscriber. Used by the demo binary and by tests; a real sensor
/// integration implements [`FixSource`] against its platform API instead.
#[derive(Default)]
pub struct ChannelFixSource {
    subscriber: Mutex<Option<mpsc::Sender<FixEvent>>>,
}

impl ChannelFixSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forwards an event to the current subscriber. Events pushed while no
    /// subscription is live are dropped, like fixes from a sensor nobody is
    /// listening to.
    pub async fn push(&self, event: FixEvent) {
        let sender = self.subscriber.lock().unwrap().clone();
        if let Some(sender) = sender {
            let _ = sender.send(event).await;
        }
    }
}

#[async_trait]
impl FixSource for ChannelFixSource {
    async fn subscribe(&self) -> Result<mpsc::Receiver<FixEvent>, FixSourceError> {
        let (sender, receiver) = mpsc::channel(32);
        *self.subscriber.lock().unwrap() = Some(sender);
        Ok(receiver)
    }
}

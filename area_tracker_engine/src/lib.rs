pub mod controller;
pub mod fix_source;
pub mod state;

use area_tracker_data_management::StoreError;
use thiserror::Error;

use crate::fix_source::FixSourceError;

/// Errors surfaced by the tracking engine. None are fatal to the process;
/// every failure is per-operation and the caller may retry or abandon the
/// run.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("positioning sensor unavailable")]
    SensorUnavailable,
    #[error("storage failure: {0}")]
    Storage(String),
    #[error("session {0} not found")]
    NotFound(i64),
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Storage(reason) => EngineError::Storage(reason),
            StoreError::NotFound(session_id) => EngineError::NotFound(session_id),
        }
    }
}

impl From<FixSourceError> for EngineError {
    fn from(err: FixSourceError) -> Self {
        match err {
            FixSourceError::PermissionDenied => EngineError::PermissionDenied,
            FixSourceError::Unavailable => EngineError::SensorUnavailable,
        }
    }
}

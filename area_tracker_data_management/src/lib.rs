pub mod database;
pub mod gpx_util;
mod repository;

pub use repository::SessionRepository;

use thiserror::Error;

/// Errors surfaced by the session store boundary. Every failure is scoped to
/// a single call; nothing here is fatal to the process.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage failure: {0}")]
    Storage(String),
    #[error("session {0} not found")]
    NotFound(i64),
}

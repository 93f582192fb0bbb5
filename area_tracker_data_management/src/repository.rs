use area_tracker_lib::session::Session;
use async_trait::async_trait;

use crate::{StoreError, database::db::SessionDatabase};

/// Store of completed sessions, keyed by a store-generated identifier.
///
/// Each call is atomic for its single record; `list` order is unspecified
/// and callers sort as needed.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persists the session and returns its newly assigned identifier. The
    /// passed session's own `session_id` is ignored.
    async fn add(&self, session: &Session) -> Result<i64, StoreError>;

    async fn list(&self) -> Result<Vec<Session>, StoreError>;

    async fn get(&self, session_id: i64) -> Result<Session, StoreError>;

    async fn delete(&self, session_id: i64) -> Result<(), StoreError>;
}

#[async_trait]
impl SessionRepository for SessionDatabase {
    async fn add(&self, session: &Session) -> Result<i64, StoreError> {
        self.insert_session(session).await
    }

    async fn list(&self) -> Result<Vec<Session>, StoreError> {
        self.get_sessions().await
    }

    async fn get(&self, session_id: i64) -> Result<Session, StoreError> {
        self.get_session(session_id).await
    }

    async fn delete(&self, session_id: i64) -> Result<(), StoreError> {
        self.delete_session(session_id).await
    }
}

use std::path::Path;

use area_tracker_lib::session::Session;
use const_format::concatcp;
use sqlx::{Executor, Pool, Sqlite, SqlitePool, query, query_as, sqlite::{SqliteConnectOptions, SqlitePoolOptions}};

use crate::StoreError;

use super::constants::*;

/// SQLite-backed store of completed sessions. The whole path is kept as one
/// bincode blob per row; rows are only ever inserted whole and deleted whole.
#[derive(Clone)]
pub struct SessionDatabase {
    pool: Pool<Sqlite>,
}

impl SessionDatabase {
    pub async fn connect(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePool::connect_with(options).await
            .map_err(|_| StoreError::Storage("Failed to connect to database".to_string()))?;

        let db = Self { pool };
        db.init().await?;
        tracing::info!("session database ready");

        Ok(db)
    }

    /// In-memory database for tests. Pinned to a single connection, since
    /// every sqlite `:memory:` connection is its own database.
    pub async fn connect_in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:").await
            .map_err(|_| StoreError::Storage("Failed to open in-memory database".to_string()))?;

        let db = Self { pool };
        db.init().await?;

        Ok(db)
    }

    async fn init(&self) -> Result<(), StoreError> {
        self.pool.execute(concatcp!("
            CREATE TABLE IF NOT EXISTS ", SESSIONS_TABLE_NAME, "(",
                SESSION_ID,  " INTEGER PRIMARY KEY AUTOINCREMENT,",
                NAME,        " TEXT NOT NULL,",
                START_TIME,  " TIMESTAMP NOT NULL,",
                END_TIME,    " TIMESTAMP NOT NULL,",
                DISTANCE_KM, " REAL NOT NULL,",
                AREA_KM2,    " REAL NOT NULL,",
                PATH,        " BLOB NOT NULL)")).await
            .map_err(|_| StoreError::Storage("Failed to create sessions table".to_string()))
            .map(|_| ())
    }

    pub async fn insert_session(&self, session: &Session) -> Result<i64, StoreError> {
        query_as::<_, (i64,)>(concatcp!("
            INSERT INTO ", SESSIONS_TABLE_NAME,
            "(", SESSION_ID, ", ", NAME, ", ", START_TIME, ", ", END_TIME, ", ", DISTANCE_KM, ", ", AREA_KM2, ", ", PATH, ")
            VALUES (NULL, ?1, ?2, ?3, ?4, ?5, ?6) RETURNING ", SESSION_ID))
                .bind(&session.name)
                .bind(session.start_time)
                .bind(session.end_time)
                .bind(session.distance_km)
                .bind(session.area_km2)
                .bind(session.path_blob())
                .fetch_one(&self.pool).await
                .map_err(|_| StoreError::Storage("Failed to insert session".to_string()))
                .map(|row| row.0)
    }

    pub async fn get_session(&self, session_id: i64) -> Result<Session, StoreError> {
        query_as::<_, Session>(concatcp!("SELECT * FROM ", SESSIONS_TABLE_NAME, " WHERE ", SESSION_ID, " = ?1"))
            .bind(session_id)
            .fetch_optional(&self.pool).await
            .map_err(|_| StoreError::Storage("Failed to get session".to_string()))?
            .ok_or(StoreError::NotFound(session_id))
    }

    pub async fn get_sessions(&self) -> Result<Vec<Session>, StoreError> {
        query_as::<_, Session>(concatcp!("SELECT * FROM ", SESSIONS_TABLE_NAME))
            .fetch_all(&self.pool).await
            .map_err(|_| StoreError::Storage("Failed to get sessions".to_string()))
    }

    pub async fn delete_session(&self, session_id: i64) -> Result<(), StoreError> {
        let result = query(concatcp!("DELETE FROM ", SESSIONS_TABLE_NAME, " WHERE ", SESSION_ID, " = ?1"))
            .bind(session_id)
            .execute(&self.pool).await
            .map_err(|_| StoreError::Storage("Failed to delete session".to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(session_id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use area_tracker_lib::fix::Fix;

    fn sample_session(name: &str) -> Session {
        let path = vec![
            Fix::from_epoch_millis(40.0, -74.0, 1_000, Some(3.0)).unwrap(),
            Fix::from_epoch_millis(40.001, -74.0, 2_000, Some(4.0)).unwrap(),
        ];
        Session::from_path(name.to_string(), path, 0.111).unwrap()
    }

    #[tokio::test]
    async fn insert_get_delete_roundtrip() {
        let db = SessionDatabase::connect_in_memory().await.unwrap();

        let session_id = db.insert_session(&sample_session("Morning walk")).await.unwrap();

        let stored = db.get_session(session_id).await.unwrap();
        assert_eq!(stored.session_id, Some(session_id));
        assert_eq!(stored.name, "Morning walk");
        assert_eq!(stored.path.len(), 2);
        assert_eq!(stored.distance_km, 0.111);
        assert_eq!(stored.start_time.timestamp_millis(), 1_000);

        db.delete_session(session_id).await.unwrap();
        assert!(db.get_sessions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_session_is_not_found() {
        let db = SessionDatabase::connect_in_memory().await.unwrap();

        assert!(matches!(db.get_session(99).await, Err(StoreError::NotFound(99))));
        assert!(matches!(db.delete_session(99).await, Err(StoreError::NotFound(99))));
    }

    #[tokio::test]
    async fn list_returns_every_stored_session() {
        let db = SessionDatabase::connect_in_memory().await.unwrap();

        db.insert_session(&sample_session("a")).await.unwrap();
        db.insert_session(&sample_session("b")).await.unwrap();

        let mut names: Vec<String> = db.get_sessions().await.unwrap()
            .into_iter()
            .map(|session| session.name)
            .collect();
        names.sort();
        assert_eq!(names, ["a", "b"]);
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "sqlx")]
use sqlx::{prelude::*, sqlite::SqliteRow};

use crate::{fix::Fix, geometry};

/// A completed, named tracking run with its summary statistics.
///
/// Immutable after construction except for the identifier, which the
/// repository assigns on first persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// `None` until the repository has persisted the session.
    pub session_id: Option<i64>,
    pub name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub path: Vec<Fix>,
    pub distance_km: f64,
    pub area_km2: f64,
}

impl Session {
    /// Builds a session from a finished path and its accumulated distance.
    /// Start and end times come from the first and last fix; the enclosed
    /// area is computed here. Returns `None` for paths of fewer than two
    /// fixes, which are discarded rather than saved.
    pub fn from_path(name: String, path: Vec<Fix>, distance_km: f64) -> Option<Self> {
        if path.len() < 2 {
            return None;
        }

        let start_time = path.first()?.timestamp;
        let end_time = path.last()?.timestamp;

        Some(Self {
            session_id: None,
            name,
            start_time,
            end_time,
            area_km2: geometry::enclosed_area_km2(&path),
            distance_km,
            path,
        })
    }

    pub fn path_blob(&self) -> Vec<u8> {
        bincode::serialize(&self.path).unwrap()
    }
}

#[cfg(feature = "sqlx")]
impl FromRow<'_, SqliteRow> for Session {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        let blob: Vec<u8> = row.get(6);
        let path = bincode::deserialize::<Vec<Fix>>(&blob).unwrap();

        Ok(Self {
            session_id: Some(row.get(0)),
            name: row.get(1),
            start_time: row.get(2),
            end_time: row.get(3),
            distance_km: row.get(4),
            area_km2: row.get(5),
            path,
        })
    }
}

use chrono::{DateTime, Utc};
use geo_types::Point;
use serde::{Deserialize, Serialize};

/// One timestamped position reading from the positioning sensor.
///
/// `position` follows the geo-types convention: x is longitude, y is
/// latitude. Coordinates are taken as delivered; range checking is the
/// producer's contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    pub position: Point<f64>,
    pub timestamp: DateTime<Utc>,
    /// Instantaneous speed in km/h, when the sensor reports one.
    pub speed_kmh: Option<f64>,
}

impl Fix {
    pub fn new(latitude: f64, longitude: f64, timestamp: DateTime<Utc>, speed_kmh: Option<f64>) -> Self {
        Self {
            position: Point::new(longitude, latitude),
            timestamp,
            speed_kmh,
        }
    }

    /// Same as `new` but from a raw epoch-milliseconds timestamp. `None`
    /// when the timestamp is out of chrono's representable range.
    pub fn from_epoch_millis(latitude: f64, longitude: f64, epoch_ms: i64, speed_kmh: Option<f64>) -> Option<Self> {
        DateTime::from_timestamp_millis(epoch_ms)
            .map(|timestamp| Self::new(latitude, longitude, timestamp, speed_kmh))
    }

    pub fn latitude(&self) -> f64 {
        self.position.y()
    }

    pub fn longitude(&self) -> f64 {
        self.position.x()
    }
}

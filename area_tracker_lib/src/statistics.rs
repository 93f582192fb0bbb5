use serde::{Deserialize, Serialize};

/// Instantaneous view of an in-progress run.
///
/// Recomputed from the run's path and accumulators on every query, never
/// mutated independently. All zeros while no run is live.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LiveStatistics {
    /// Speed reported with the most recent fix, 0 when absent.
    pub speed_kmh: f64,
    pub distance_km: f64,
    /// Count of elapsed 1 Hz ticks while active, not a wall-clock delta.
    pub duration_seconds: u64,
    pub area_km2: f64,
}

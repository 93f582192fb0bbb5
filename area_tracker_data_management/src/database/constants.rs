pub const SESSIONS_TABLE_NAME: &str = "sessions";

pub const SESSION_ID: &str = "session_id";
pub const NAME: &str = "name";
pub const START_TIME: &str = "start_time";
pub const END_TIME: &str = "end_time";
pub const DISTANCE_KM: &str = "distance_km";
pub const AREA_KM2: &str = "area_km2";
pub const PATH: &str = "path";

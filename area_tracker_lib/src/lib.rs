pub mod fix;
pub mod geometry;
pub mod session;
pub mod statistics;

use std::{io::Write, time::SystemTime};

use area_tracker_lib::session::Session;
use geo_types::Point;
use gpx::{Gpx, GpxVersion, Time, Track, TrackSegment, Waypoint};
use time::OffsetDateTime;

use crate::StoreError;

/// Renders a saved session as a GPX 1.1 document: metadata from the session
/// name and start time, one track with a single segment, one waypoint per
/// fix. Borrows the session; export never mutates it.
pub fn session_to_gpx(session: &Session) -> Gpx {
    let mut gpx = Gpx::default();
    gpx.version = GpxVersion::Gpx11;

    let start_time: SystemTime = session.start_time.into();
    let start_time: OffsetDateTime = start_time.into();
    gpx.metadata = Some(gpx::Metadata {
        name: Some(session.name.clone()),
        time: Some(Time::from(start_time)),
        ..Default::default()
    });

    let mut track = Track::new();
    let mut segment = TrackSegment::new();

    for fix in &session.path {
        let mut waypoint = Waypoint::new(Point::new(fix.longitude(), fix.latitude()));
        let time: SystemTime = fix.timestamp.into();
        let time: OffsetDateTime = time.into();
        waypoint.time = Some(Time::from(time));
        // GPX carries speed in m/s.
        waypoint.speed = fix.speed_kmh.map(|kmh| kmh / 3.6);
        segment.points.push(waypoint);
    }

    track.segments.push(segment);
    gpx.tracks.push(track);

    gpx
}

pub fn write_gpx<W: Write>(session: &Session, writer: W) -> Result<(), StoreError> {
    gpx::write(&session_to_gpx(session), writer)
        .map_err(|err| StoreError::Storage(format!("Failed to write GPX: {err}")))
}

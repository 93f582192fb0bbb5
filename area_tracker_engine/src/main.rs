use std::sync::Arc;

use area_tracker_data_management::{SessionRepository, database::db::SessionDatabase};
use area_tracker_engine::{
    controller::TrackingController,
    fix_source::{ChannelFixSource, FixEvent},
};
use area_tracker_lib::fix::Fix;
use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Demo wiring: replays a short square walk through the engine at one fix
/// per second, then saves and lists the resulting session.
#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| format!("{}=debug", env!("CARGO_CRATE_NAME")).into())
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    std::fs::create_dir_all("data").unwrap();
    let database = SessionDatabase::connect("data/sessions.db").await.unwrap();

    let fix_source = Arc::new(ChannelFixSource::new());
    let controller = TrackingController::new(fix_source.clone(), Arc::new(database.clone()));

    controller.start().await.unwrap();

    // A ~0.5 km square near the Aarhus harbor, closed back on itself.
    let corners = [
        (56.1629, 10.2039),
        (56.1629, 10.2119),
        (56.1674, 10.2119),
        (56.1674, 10.2039),
        (56.1629, 10.2039),
    ];

    for (latitude, longitude) in corners {
        fix_source
            .push(FixEvent::Fix(Fix::new(latitude, longitude, Utc::now(), Some(5.0))))
            .await;
        tokio::time::sleep(std::time::Duration::from_secs(1)).await;

        let stats = controller.current_statistics();
        tracing::info!(
            distance_km = stats.distance_km,
            area_km2 = stats.area_km2,
            duration_seconds = stats.duration_seconds,
            speed_kmh = stats.speed_kmh,
            "live"
        );
    }

    if let Some(session) = controller.stop_and_maybe_save("Harbor loop").await.unwrap() {
        tracing::info!(session_id = session.session_id.unwrap(), "saved \"{}\"", session.name);
    }

    for session in database.list().await.unwrap() {
        tracing::info!(
            "stored session {:?}: {} ({:.3} km, {:.3} km²)",
            session.session_id,
            session.name,
            session.distance_km,
            session.area_km2
        );
    }
}

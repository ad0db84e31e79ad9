use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};
use std::env;

use crate::scene::PhysicsScene;

/// Initialize logging for an application embedding the simulation.
///
/// The library itself only emits `tracing` events and never installs a
/// subscriber on its own; call this once from the host if nothing else
/// sets one up. Panics if a global subscriber is already registered.
pub fn init_logging() {
    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
        )
        .init();

    tracing::info!("Logging initialized with level: {}", log_level);
}

/// Log a summary of the scene state for debugging.
pub fn log_scene_info(scene: &PhysicsScene) {
    tracing::info!("=== Physics Scene ===");
    tracing::info!("Bodies: {}", scene.body_count());
    tracing::info!(
        "Gravity: ({}, {}, {})",
        scene.gravity.x,
        scene.gravity.y,
        scene.gravity.z
    );
    tracing::info!("=====================");
}

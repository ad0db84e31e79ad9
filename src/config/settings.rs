use std::fs;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

// =============================================================================
// Simulation Tunables
// =============================================================================

/// Thresholds steering the collision solver.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SolverSettings {
    /// Minimum dot product between a separating axis and a planar
    /// shape's face normal for the axis to qualify for positional
    /// correction. Kept configurable because 0.99 is a tuned
    /// heuristic, not a derived value.
    pub normal_alignment_threshold: f32,
    /// Squared length under which the tangential (friction) direction
    /// is considered nonexistent.
    pub tangent_epsilon_sq: f32,
    /// Per-tick translations at or below this length are dropped to
    /// keep resting bodies from jittering.
    pub rest_translation_threshold: f32,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            normal_alignment_threshold: 0.99,
            tangent_epsilon_sq: 1e-4,
            rest_translation_threshold: 1e-3,
        }
    }
}

/// Fixed-tick drive parameters (see `FixedTimestep`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimestepSettings {
    pub tick_rate: f32,
    pub max_updates_per_frame: u32,
}

impl Default for TimestepSettings {
    fn default() -> Self {
        Self {
            tick_rate: 1.0 / 144.0,
            max_updates_per_frame: 20,
        }
    }
}

/// Everything tunable about the simulation, as one serializable unit.
///
/// Serializes to toml with gravity as a plain `[x, y, z]` array
/// followed by the solver and timestep tables.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PhysicsSettings {
    pub gravity: Vec3,
    pub solver: SolverSettings,
    pub timestep: TimestepSettings,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.8, 0.0),
            solver: SolverSettings::default(),
            timestep: TimestepSettings::default(),
        }
    }
}

/// Load settings from a toml file, falling back to defaults when the
/// file is missing or malformed.
pub fn load_physics_settings(path: &Path) -> PhysicsSettings {
    match fs::read_to_string(path) {
        Ok(data) => match toml::from_str::<PhysicsSettings>(&data) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("failed to parse {}: {}, using defaults", path.display(), e);
                PhysicsSettings::default()
            }
        },
        Err(_) => {
            tracing::warn!("no settings file at {}, using defaults", path.display());
            PhysicsSettings::default()
        }
    }
}

/// Write settings to a toml file, creating parent directories.
pub fn save_physics_settings(path: &Path, settings: &PhysicsSettings) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let toml = toml::to_string_pretty(settings)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    fs::write(path, toml)
}

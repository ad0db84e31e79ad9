pub mod settings;

pub use settings::{
    load_physics_settings, save_physics_settings, PhysicsSettings, SolverSettings,
    TimestepSettings,
};

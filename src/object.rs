use glam::Vec3;

use crate::error::PhysicsError;
use crate::shapes::Obb;
use crate::transform::{Transform, TransformHandle};

/// A simulated rigid body.
///
/// Mostly passive data: the scene integrates `velocity` from the
/// `force` and `impulse` accumulators every tick, and the solver
/// rewrites `velocity` and the bound transform on contact. The two
/// accumulators have different units on purpose (`force` is scaled by
/// the tick length, `impulse` is applied instantaneously) so movement
/// intent and jumps do not change meaning when the tick rate does.
///
/// `is_static` and `is_immovable` are independent capabilities rather
/// than one body-type enum: a static body is never integrated at all,
/// an immovable body still integrates gravity and forces but is
/// excluded from receiving collision responses.
#[derive(Debug)]
pub struct PhysicsObject {
    mass: f32,
    friction_coefficient: f32,
    collision_coefficient: f32,

    pub velocity: Vec3,
    pub impulse: Vec3,
    pub force: Vec3,

    /// True if this object never moves.
    pub is_static: bool,
    /// True if this object is not affected by collisions (but can
    /// still affect other objects through them).
    pub is_immovable: bool,

    /// Set while a collision this tick pushed the body upward.
    pub on_ground: bool,

    pub bounding_box: Obb,

    transform: TransformHandle,
}

impl PhysicsObject {
    /// A body with default properties and its own fresh transform.
    pub fn new() -> Self {
        Self::with_transform(Transform::new_handle())
    }

    /// A body bound to a transform owned elsewhere (typically the
    /// render object it should follow).
    pub fn with_transform(transform: TransformHandle) -> Self {
        let mut bounding_box = Obb::new();
        bounding_box.set_transform_matrix(transform.borrow().matrix);

        Self {
            mass: 1.0,
            friction_coefficient: 0.0,
            collision_coefficient: 0.0,
            velocity: Vec3::ZERO,
            impulse: Vec3::ZERO,
            force: Vec3::ZERO,
            is_static: false,
            is_immovable: false,
            on_ground: false,
            bounding_box,
            transform,
        }
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// The solver divides by mass, so zero, negative and non-finite
    /// values are rejected here instead of becoming NaN positions.
    pub fn set_mass(&mut self, mass: f32) -> Result<(), PhysicsError> {
        if !mass.is_finite() || mass <= 0.0 {
            tracing::warn!("rejected body mass {}", mass);
            return Err(PhysicsError::InvalidMass(mass));
        }
        self.mass = mass;
        Ok(())
    }

    pub fn friction_coefficient(&self) -> f32 {
        self.friction_coefficient
    }

    pub fn set_friction_coefficient(&mut self, coefficient: f32) -> Result<(), PhysicsError> {
        if !coefficient.is_finite() || coefficient < 0.0 {
            tracing::warn!("rejected friction coefficient {}", coefficient);
            return Err(PhysicsError::InvalidCoefficient {
                name: "friction",
                value: coefficient,
            });
        }
        self.friction_coefficient = coefficient;
        Ok(())
    }

    pub fn collision_coefficient(&self) -> f32 {
        self.collision_coefficient
    }

    /// Restitution: 0 is perfectly inelastic, 1 perfectly elastic.
    pub fn set_collision_coefficient(&mut self, coefficient: f32) -> Result<(), PhysicsError> {
        if !coefficient.is_finite() || coefficient < 0.0 {
            tracing::warn!("rejected collision coefficient {}", coefficient);
            return Err(PhysicsError::InvalidCoefficient {
                name: "collision",
                value: coefficient,
            });
        }
        self.collision_coefficient = coefficient;
        Ok(())
    }

    pub fn transform(&self) -> &TransformHandle {
        &self.transform
    }

    /// Move the body by mutating its transform position.
    pub fn translate(&self, translation: Vec3) {
        self.transform.borrow_mut().translate(translation);
    }

    /// Recompute the world matrix and rebind it to the bounding shape,
    /// which recalculates itself lazily on the next query.
    pub fn refresh_shape(&mut self) {
        let matrix = {
            let mut transform = self.transform.borrow_mut();
            transform.calculate_matrices();
            transform.matrix
        };
        self.bounding_box.set_transform_matrix(matrix);
    }
}

impl Default for PhysicsObject {
    fn default() -> Self {
        Self::new()
    }
}

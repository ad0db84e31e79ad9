use std::cell::RefCell;
use std::rc::Rc;

use glam::{Mat3, Mat4, Quat, Vec3};

/// Shared handle to a transform, as handed out by the scene graph.
///
/// The simulation is single-threaded (see `PhysicsScene`), so plain
/// reference counting with interior mutability is enough; both the
/// physics core and the embedding application read and write through
/// the same handle.
pub type TransformHandle = Rc<RefCell<Transform>>;

/// Position, rotation, scale and origin of an object, with an optional
/// parent for hierarchical placement.
///
/// `calculate_matrices` bakes the members into a cached world matrix
/// (translate, rotate, scale, then offset by the negated origin, with
/// ancestors applied first) and the matching normal matrix.
#[derive(Debug, Clone)]
pub struct Transform {
    pub parent: Option<TransformHandle>,

    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub origin: Vec3,

    pub matrix: Mat4,
    pub normal_matrix: Mat3,
}

impl Transform {
    pub fn new() -> Self {
        Self {
            parent: None,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            origin: Vec3::ZERO,
            matrix: Mat4::IDENTITY,
            normal_matrix: Mat3::IDENTITY,
        }
    }

    /// Wrap a fresh transform in a shareable handle.
    pub fn new_handle() -> TransformHandle {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn translate(&mut self, translation: Vec3) {
        self.position += translation;
    }

    pub fn set_translation(&mut self, translation: Vec3) {
        self.position = translation;
    }

    fn local_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_quat(self.rotation)
            * Mat4::from_scale(self.scale)
            * Mat4::from_translation(-self.origin)
    }

    /// World matrix including the whole parent chain, without touching
    /// any cached state.
    pub fn world_matrix(&self) -> Mat4 {
        match &self.parent {
            Some(parent) => parent.borrow().world_matrix() * self.local_matrix(),
            None => self.local_matrix(),
        }
    }

    /// Recompute and cache the world matrix and the normal matrix.
    pub fn calculate_matrices(&mut self) {
        self.matrix = self.world_matrix();

        let linear = Mat3::from_mat4(self.matrix);
        // A degenerate (zero-scale) matrix has no inverse; keep the old
        // normal matrix rather than caching NaNs.
        if linear.determinant().abs() > f32::EPSILON {
            self.normal_matrix = linear.inverse().transpose();
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_composition_order() {
        let mut transform = Transform::new();
        transform.position = Vec3::new(1.0, 2.0, 3.0);
        transform.scale = Vec3::splat(2.0);
        transform.calculate_matrices();

        // Scale applies before translation: a local point at (1, 0, 0)
        // lands at translation + 2 * (1, 0, 0).
        let p = transform.matrix.transform_point3(Vec3::X);
        assert!((p - Vec3::new(3.0, 2.0, 3.0)).length() < 1e-5);
    }

    #[test]
    fn test_origin_offsets_before_everything() {
        let mut transform = Transform::new();
        transform.origin = Vec3::new(0.5, 0.0, 0.0);
        transform.calculate_matrices();

        let p = transform.matrix.transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(-0.5, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_parent_chain_applies_parent_first() {
        let parent = Transform::new_handle();
        parent.borrow_mut().position = Vec3::new(10.0, 0.0, 0.0);

        let mut child = Transform::new();
        child.parent = Some(parent);
        child.position = Vec3::new(0.0, 1.0, 0.0);
        child.calculate_matrices();

        let p = child.matrix.transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(10.0, 1.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_rotation_affects_child_translation() {
        let parent = Transform::new_handle();
        parent.borrow_mut().rotation = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);

        let mut child = Transform::new();
        child.parent = Some(parent);
        child.position = Vec3::new(1.0, 0.0, 0.0);
        child.calculate_matrices();

        // Parent rotates +90 degrees around Z, so the child's +X offset
        // ends up along +Y.
        let p = child.matrix.transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-5);
    }
}

//! Building world-space rays from screen-space input.

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::shapes::Ray;

/// Turn a normalized-device-coordinate point (x and y in [-1, 1],
/// +Y up) into a world-space ray for picking.
///
/// The point is unprojected through the inverse projection matrix,
/// forced into a pure forward direction in camera space, then rotated
/// into world space through the inverse view matrix. The ray starts at
/// the camera position.
pub fn ray_from_ndc(ndc: Vec2, projection: Mat4, view: Mat4, camera_position: Vec3) -> Ray {
    let clip = Vec4::new(ndc.x, ndc.y, -1.0, 1.0);

    let mut camera_ray = projection.inverse() * clip;
    camera_ray.z = -1.0;
    camera_ray.w = 0.0;

    let world_ray = view.inverse() * camera_ray;
    let dir = world_ray.truncate();

    Ray::new(camera_position, dir)
}

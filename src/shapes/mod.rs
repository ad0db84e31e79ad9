pub mod obb;
pub mod ray;
pub mod triangle;

pub use obb::Obb;
pub use ray::Ray;
pub use triangle::Triangle;

use glam::Vec3;

/// Capability interface every convex collision shape exposes.
///
/// The intersection tester and the collision solver only talk to
/// shapes through these queries, so further convex primitives can be
/// added without touching either.
pub trait Shape {
    /// World-space center of the shape.
    fn center(&self) -> Vec3;

    /// Face normals to test as candidate separating axes (three for a
    /// box, one for a planar shape).
    fn face_normals(&self) -> Vec<Vec3>;

    /// Edge directions contributing cross-product axes to the
    /// separating-axis test.
    fn edge_directions(&self) -> Vec<Vec3>;

    /// Project the shape onto a unit axis, returning the covered
    /// (min, max) interval.
    fn project(&self, axis: Vec3) -> (f32, f32);

    /// The single face normal of a planar shape, if this shape has
    /// exactly one. The solver resolves against this normal instead of
    /// the generic separating axis when present.
    fn preferred_contact_normal(&self) -> Option<Vec3>;

    /// Nearest entry distance of `ray` into this shape within
    /// `[0, max_distance]`, or `f32::INFINITY` on a miss.
    fn ray_cast(&self, ray: &Ray, max_distance: f32) -> f32;
}

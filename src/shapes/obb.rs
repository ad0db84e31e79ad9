use std::cell::Cell;

use glam::{Mat4, Vec3};

use super::ray::Ray;
use super::Shape;
use crate::utils::math::basis_from_matrix;

/// World-space box state derived from the bound transform matrix.
#[derive(Debug, Clone, Copy)]
struct DerivedBox {
    center: Vec3,
    axes: [Vec3; 3],
    half_extents: Vec3,
}

/// An oriented bounding box driven by an externally-owned transform.
///
/// The box is defined by local min/max corners (a unit cube by
/// default) and a world matrix. Rotation comes from the matrix basis,
/// scale stretches the half-extents, and the derived world-space state
/// is recomputed lazily: `set_needs_update` marks it dirty and the next
/// query rebuilds it.
#[derive(Debug, Clone)]
pub struct Obb {
    local_min: Vec3,
    local_max: Vec3,
    transform_matrix: Mat4,

    needs_update: Cell<bool>,
    derived: Cell<DerivedBox>,
}

impl Obb {
    /// A unit cube centered on the local origin.
    pub fn new() -> Self {
        Self::from_min_max(Vec3::splat(-0.5), Vec3::splat(0.5))
    }

    /// A box spanning the given local corners. Inverted corner pairs
    /// are swapped so half-extents stay non-negative.
    pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
        let (min, max) = (min.min(max), min.max(max));
        Self {
            local_min: min,
            local_max: max,
            transform_matrix: Mat4::IDENTITY,
            needs_update: Cell::new(true),
            derived: Cell::new(DerivedBox {
                center: Vec3::ZERO,
                axes: [Vec3::X, Vec3::Y, Vec3::Z],
                half_extents: Vec3::ZERO,
            }),
        }
    }

    /// Change the local corners, keeping the bound matrix.
    pub fn set_min_max(&mut self, min: Vec3, max: Vec3) {
        let (min, max) = (min.min(max), min.max(max));
        self.local_min = min;
        self.local_max = max;
        self.needs_update.set(true);
    }

    /// Bind a new world matrix. The derived state refreshes on the
    /// next query.
    pub fn set_transform_matrix(&mut self, matrix: Mat4) {
        self.transform_matrix = matrix;
        self.needs_update.set(true);
    }

    /// Mark the derived state stale, forcing a recompute on next use.
    pub fn set_needs_update(&self) {
        self.needs_update.set(true);
    }

    pub fn axes(&self) -> [Vec3; 3] {
        self.updated().axes
    }

    pub fn half_extents(&self) -> Vec3 {
        self.updated().half_extents
    }

    fn updated(&self) -> DerivedBox {
        if self.needs_update.get() {
            let (axes, scale) = basis_from_matrix(&self.transform_matrix);
            let local_center = (self.local_min + self.local_max) * 0.5;
            let local_half = (self.local_max - self.local_min) * 0.5;
            self.derived.set(DerivedBox {
                center: self.transform_matrix.transform_point3(local_center),
                axes,
                half_extents: local_half * scale,
            });
            self.needs_update.set(false);
        }
        self.derived.get()
    }
}

impl Default for Obb {
    fn default() -> Self {
        Self::new()
    }
}

impl Shape for Obb {
    fn center(&self) -> Vec3 {
        self.updated().center
    }

    fn face_normals(&self) -> Vec<Vec3> {
        self.updated().axes.to_vec()
    }

    fn edge_directions(&self) -> Vec<Vec3> {
        self.updated().axes.to_vec()
    }

    fn project(&self, axis: Vec3) -> (f32, f32) {
        let d = self.updated();
        let center = d.center.dot(axis);
        let radius = d.axes[0].dot(axis).abs() * d.half_extents.x
            + d.axes[1].dot(axis).abs() * d.half_extents.y
            + d.axes[2].dot(axis).abs() * d.half_extents.z;
        (center - radius, center + radius)
    }

    fn preferred_contact_normal(&self) -> Option<Vec3> {
        None
    }

    fn ray_cast(&self, ray: &Ray, max_distance: f32) -> f32 {
        if ray.is_degenerate() {
            return f32::INFINITY;
        }

        let d = self.updated();
        let offset = ray.start() - d.center;

        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;

        // Slab test in the box frame, one axis at a time.
        for i in 0..3 {
            let half = d.half_extents[i];
            let s = offset.dot(d.axes[i]);
            let f = ray.dir().dot(d.axes[i]);

            if f.abs() < f32::EPSILON {
                // Ray parallel to this slab: no constraint from the
                // axis itself, but a start outside the slab can never
                // enter the box.
                if s < -half || s > half {
                    return f32::INFINITY;
                }
                continue;
            }

            let inv = 1.0 / f;
            let t1 = (-half - s) * inv;
            let t2 = (half - s) * inv;
            t_min = t_min.max(t1.min(t2));
            t_max = t_max.min(t1.max(t2));

            if t_min > t_max {
                return f32::INFINITY;
            }
        }

        if t_max < 0.0 {
            return f32::INFINITY;
        }

        // A start inside the box reports distance zero.
        let distance = t_min.max(0.0);
        if distance > max_distance {
            f32::INFINITY
        } else {
            distance
        }
    }
}

use std::cell::Cell;

use glam::{Mat4, Vec3};

use super::ray::Ray;
use super::Shape;
use crate::utils::math::DEGENERATE_AXIS_EPSILON_SQ;

#[derive(Debug, Clone, Copy)]
struct DerivedTriangle {
    vertices: [Vec3; 3],
    normal: Vec3,
    edges: [Vec3; 3],
}

/// A single flat triangle, the planar one-normal shape.
///
/// Colliding against flat geometry resolves along the face normal
/// rather than the raw separating axis, which is what keeps bodies
/// from sliding off ramps and floors sideways. Like `Obb`, world-space
/// state is derived lazily from a bound transform matrix.
#[derive(Debug, Clone)]
pub struct Triangle {
    local_vertices: [Vec3; 3],
    transform_matrix: Mat4,

    needs_update: Cell<bool>,
    derived: Cell<DerivedTriangle>,
}

impl Triangle {
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self {
            local_vertices: [v0, v1, v2],
            transform_matrix: Mat4::IDENTITY,
            needs_update: Cell::new(true),
            derived: Cell::new(DerivedTriangle {
                vertices: [v0, v1, v2],
                normal: Vec3::Y,
                edges: [Vec3::X, Vec3::Y, Vec3::Z],
            }),
        }
    }

    pub fn set_transform_matrix(&mut self, matrix: Mat4) {
        self.transform_matrix = matrix;
        self.needs_update.set(true);
    }

    pub fn set_needs_update(&self) {
        self.needs_update.set(true);
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        self.updated().vertices
    }

    pub fn normal(&self) -> Vec3 {
        self.updated().normal
    }

    fn updated(&self) -> DerivedTriangle {
        if self.needs_update.get() {
            let v: Vec<Vec3> = self
                .local_vertices
                .iter()
                .map(|p| self.transform_matrix.transform_point3(*p))
                .collect();
            let vertices = [v[0], v[1], v[2]];

            let e0 = vertices[1] - vertices[0];
            let e1 = vertices[2] - vertices[1];
            let e2 = vertices[0] - vertices[2];

            let cross = e0.cross(vertices[2] - vertices[0]);
            // A collapsed triangle keeps its previous normal instead of
            // normalizing a zero vector.
            let normal = if cross.length_squared() > DEGENERATE_AXIS_EPSILON_SQ {
                cross.normalize()
            } else {
                self.derived.get().normal
            };

            let unit = |e: Vec3| {
                if e.length_squared() > DEGENERATE_AXIS_EPSILON_SQ {
                    e.normalize()
                } else {
                    Vec3::ZERO
                }
            };

            self.derived.set(DerivedTriangle {
                vertices,
                normal,
                edges: [unit(e0), unit(e1), unit(e2)],
            });
            self.needs_update.set(false);
        }
        self.derived.get()
    }
}

impl Shape for Triangle {
    fn center(&self) -> Vec3 {
        let v = self.updated().vertices;
        (v[0] + v[1] + v[2]) / 3.0
    }

    fn face_normals(&self) -> Vec<Vec3> {
        vec![self.updated().normal]
    }

    fn edge_directions(&self) -> Vec<Vec3> {
        self.updated()
            .edges
            .iter()
            .copied()
            .filter(|e| *e != Vec3::ZERO)
            .collect()
    }

    fn project(&self, axis: Vec3) -> (f32, f32) {
        let v = self.updated().vertices;
        let d0 = v[0].dot(axis);
        let d1 = v[1].dot(axis);
        let d2 = v[2].dot(axis);
        (d0.min(d1).min(d2), d0.max(d1).max(d2))
    }

    fn preferred_contact_normal(&self) -> Option<Vec3> {
        Some(self.updated().normal)
    }

    fn ray_cast(&self, ray: &Ray, max_distance: f32) -> f32 {
        if ray.is_degenerate() {
            return f32::INFINITY;
        }

        // Moeller-Trumbore, both-sided.
        let v = self.updated().vertices;
        let e1 = v[1] - v[0];
        let e2 = v[2] - v[0];

        let p = ray.dir().cross(e2);
        let det = e1.dot(p);
        if det.abs() < f32::EPSILON {
            return f32::INFINITY;
        }

        let inv_det = 1.0 / det;
        let s = ray.start() - v[0];
        let u = s.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return f32::INFINITY;
        }

        let q = s.cross(e1);
        let w = ray.dir().dot(q) * inv_det;
        if w < 0.0 || u + w > 1.0 {
            return f32::INFINITY;
        }

        let t = e2.dot(q) * inv_det;
        if t < 0.0 || t > max_distance {
            f32::INFINITY
        } else {
            t
        }
    }
}

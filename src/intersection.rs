//! Separating-axis intersection queries over sets of convex shapes.
//!
//! A body's collider is a set of one or more shapes; two bodies
//! overlap when any shape pair from the two sets overlaps. All
//! functions are stateless and never fail: geometric degeneracy is
//! treated as non-constraining and a missed ray cast is reported as an
//! infinite distance.

use glam::Vec3;

use crate::shapes::{Ray, Shape};
use crate::utils::math::DEGENERATE_AXIS_EPSILON_SQ;

/// One overlapping axis from the separating-axis test of a shape pair.
///
/// The axis is unit length and oriented from shape B toward shape A.
/// The preferred contact normals of both shapes are captured so the
/// solver can resolve flat geometry along its face normal without
/// touching the shapes again.
#[derive(Debug, Clone, Copy)]
pub struct IntersectionInformation {
    pub axis: Vec3,
    pub depth: f32,
    pub normal_a: Option<Vec3>,
    pub normal_b: Option<Vec3>,
}

/// Candidate separating axes for a shape pair: both shapes' face
/// normals plus the cross products of their edge directions.
fn candidate_axes(shape_a: &dyn Shape, shape_b: &dyn Shape) -> Vec<Vec3> {
    let mut axes = shape_a.face_normals();
    axes.extend(shape_b.face_normals());

    for ea in shape_a.edge_directions() {
        for eb in shape_b.edge_directions() {
            let cross = ea.cross(eb);
            // Parallel edges give a near-zero cross product, which
            // constrains nothing.
            if cross.length_squared() > DEGENERATE_AXIS_EPSILON_SQ {
                axes.push(cross.normalize());
            }
        }
    }

    axes
}

/// Penetration of the two projected intervals along one axis: the
/// distance either shape must travel along the axis to separate,
/// negative when already separated. The two-sided min keeps the depth
/// finite when one projection contains the other (box resting on a
/// flat triangle).
fn projected_overlap(shape_a: &dyn Shape, shape_b: &dyn Shape, axis: Vec3) -> f32 {
    let (min_a, max_a) = shape_a.project(axis);
    let (min_b, max_b) = shape_b.project(axis);
    (max_a - min_b).min(max_b - min_a)
}

fn pair_overlaps(shape_a: &dyn Shape, shape_b: &dyn Shape) -> bool {
    candidate_axes(shape_a, shape_b)
        .into_iter()
        .all(|axis| projected_overlap(shape_a, shape_b, axis) >= 0.0)
}

fn pair_intersection(
    shape_a: &dyn Shape,
    shape_b: &dyn Shape,
    out: &mut Vec<IntersectionInformation>,
) -> bool {
    let start = out.len();
    let toward_a = shape_a.center() - shape_b.center();

    for axis in candidate_axes(shape_a, shape_b) {
        let depth = projected_overlap(shape_a, shape_b, axis);
        if depth < 0.0 {
            out.truncate(start);
            return false;
        }

        // Orient every reported axis from B toward A so the solver's
        // approach test reads the same way for all entries.
        let axis = if toward_a.dot(axis) < 0.0 { -axis } else { axis };
        out.push(IntersectionInformation {
            axis,
            depth,
            normal_a: shape_a.preferred_contact_normal(),
            normal_b: shape_b.preferred_contact_normal(),
        });
    }

    true
}

/// True when any shape of set A overlaps any shape of set B.
pub fn overlaps(shapes_a: &[&dyn Shape], shapes_b: &[&dyn Shape]) -> bool {
    shapes_a
        .iter()
        .any(|a| shapes_b.iter().any(|b| pair_overlaps(*a, *b)))
}

/// Collect per-axis penetration data for every overlapping shape pair.
///
/// Returns true when at least one pair overlaps; meant to be called
/// after `overlaps` already reported an intersection.
pub fn extract_intersection(
    shapes_a: &[&dyn Shape],
    shapes_b: &[&dyn Shape],
    out: &mut Vec<IntersectionInformation>,
) -> bool {
    let mut any = false;
    for a in shapes_a {
        for b in shapes_b {
            any |= pair_intersection(*a, *b, out);
        }
    }
    any
}

/// Nearest entry distance of `ray` into any shape of the set within
/// `[0, max_distance]`, or `f32::INFINITY` when every shape misses.
pub fn ray_cast(ray: &Ray, shapes: &[&dyn Shape], max_distance: f32) -> f32 {
    let mut closest = f32::INFINITY;
    for shape in shapes {
        let distance = shape.ray_cast(ray, max_distance);
        if distance < closest {
            closest = distance;
        }
    }
    closest
}

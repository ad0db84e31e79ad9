//! Impulse-based collision response.
//!
//! Stateless: takes the penetration entries extracted for one body
//! pair and mutates both bodies' velocities and positions. Restitution
//! follows the classic mass-weighted two-body equations along the
//! resolution axis; friction acts along the tangential direction of
//! the relative velocity; interpenetration is removed by translating
//! the bodies apart along the deepest usable axis.

use glam::Vec3;

use crate::config::SolverSettings;
use crate::intersection::IntersectionInformation;
use crate::object::PhysicsObject;

/// Pick the positional correction for the given penetration entries.
///
/// Entries whose B shape is planar only qualify when the separating
/// axis lines up with the plane normal (within the configured
/// alignment threshold); among the qualifying entries the deepest axis
/// wins. Returns the axis scaled by its depth, or zero when nothing
/// qualifies.
pub fn correction_vector(
    intersection_information: &[IntersectionInformation],
    settings: &SolverSettings,
) -> Vec3 {
    let mut resulting_axis = Vec3::ZERO;
    let mut max_depth = 0.0_f32;

    for inf in intersection_information {
        // Only displace along a flat shape's axis when the separating
        // axis actually is that plane normal.
        if let Some(normal) = inf.normal_b {
            if inf.axis.dot(normal) < settings.normal_alignment_threshold {
                continue;
            }
        }

        if inf.depth > max_depth {
            resulting_axis = inf.axis;
            max_depth = inf.depth;
        }
    }

    resulting_axis * max_depth
}

/// Resolve one colliding body pair.
///
/// Walks every penetration entry: picks the resolution axis (a planar
/// shape's face normal when one side has one, otherwise the entry's
/// separating axis, always oriented from B toward A), applies
/// restitution and friction impulses to the bodies that may receive
/// them, and translates the pair apart in proportion to how hard each
/// body was deflected.
pub fn resolve_collision(
    intersection_information: &[IntersectionInformation],
    po1: &mut PhysicsObject,
    po2: &mut PhysicsObject,
    settings: &SolverSettings,
) {
    let unresponsive_1 = po1.is_static || po1.is_immovable;
    let unresponsive_2 = po2.is_static || po2.is_immovable;
    if unresponsive_1 && unresponsive_2 {
        // Neither body can react; leaving them intersecting is a known
        // limitation of the solver, not an error.
        tracing::debug!("skipping collision between two unresponsive bodies");
        return;
    }

    for inf in intersection_information {
        let mut axis = inf.axis;
        if let Some(normal) = inf.normal_b {
            axis = normal;
        } else if let Some(normal) = inf.normal_a {
            // Keep the axis pointing from body B toward body A.
            axis = -normal;
        }

        let vel_difference = po1.velocity - po2.velocity;
        if vel_difference.dot(axis) >= 0.0 {
            // Already separating along this axis; adding another
            // impulse would double-count resting contacts.
            continue;
        }

        // Tangential direction of the relative motion, along which
        // friction acts.
        let mut tangent = vel_difference.cross(axis).cross(axis);
        if tangent.length_squared() > settings.tangent_epsilon_sq {
            tangent = tangent.normalize();
        } else {
            tangent = Vec3::ZERO;
        }

        let collision_coefficient = po1
            .collision_coefficient()
            .max(po2.collision_coefficient());
        let friction_coefficient = po1
            .friction_coefficient()
            .min(po2.friction_coefficient());

        let mut change_1 = Vec3::ZERO;
        let mut change_2 = Vec3::ZERO;

        if !unresponsive_1 && !unresponsive_2 {
            let m1 = po1.mass();
            let m2 = po2.mass();
            let v1_dot = po1.velocity.dot(axis);
            let v2_dot = po2.velocity.dot(axis);
            let tangent_vel_1 = vel_difference.dot(tangent);
            let tangent_vel_2 = -tangent_vel_1;

            let u1_dot = ((m1 - collision_coefficient * m2) / (m1 + m2)) * v1_dot
                + (((1.0 + collision_coefficient) * m2) / (m1 + m2)) * v2_dot;
            let u2_dot = ((m2 - collision_coefficient * m1) / (m2 + m1)) * v2_dot
                + (((1.0 + collision_coefficient) * m1) / (m2 + m1)) * v1_dot;

            let friction_magnitude_1 = -tangent_vel_1
                * friction_coefficient.min(friction_coefficient * (u1_dot - v1_dot).abs());
            let friction_magnitude_2 = -tangent_vel_2
                * friction_coefficient.min(friction_coefficient * (u2_dot - v2_dot).abs());

            change_1 = axis * (u1_dot - v1_dot) + tangent * friction_magnitude_1;
            change_2 = axis * (u2_dot - v2_dot) + tangent * friction_magnitude_2;
        } else if unresponsive_1 {
            // Body A cannot respond; reflect body B off it.
            let inverse_vel_difference = -vel_difference;
            let v2_dot = inverse_vel_difference.dot(axis);
            let relative_tangent_vel = inverse_vel_difference.dot(tangent);
            let friction_magnitude = relative_tangent_vel
                * friction_coefficient.min(friction_coefficient * v2_dot.abs());

            change_2 = axis * (-v2_dot * (1.0 + collision_coefficient))
                + tangent * -friction_magnitude;
        } else {
            let v1_dot = vel_difference.dot(axis);
            let relative_tangent_vel = vel_difference.dot(tangent);
            let friction_magnitude = relative_tangent_vel
                * friction_coefficient.min(friction_coefficient * v1_dot.abs());

            change_1 = axis * (-v1_dot * (1.0 + collision_coefficient))
                + tangent * -friction_magnitude;
        }

        po1.velocity += change_1;
        if change_1.y > 0.0 {
            po1.on_ground = true;
        }

        po2.velocity += change_2;
        if change_2.y > 0.0 {
            po2.on_ground = true;
        }

        // Split the push-out between the bodies in proportion to how
        // much each one's velocity changed; an unresponsive body never
        // takes any of it.
        let displacement = correction_vector(std::slice::from_ref(inf), settings);
        let total_change = change_1.length() + change_2.length();
        if total_change <= f32::EPSILON {
            continue;
        }

        if !unresponsive_1 {
            po1.translate(displacement * (change_1.length() / total_change));
        }
        if !unresponsive_2 {
            po2.translate(displacement * -(change_2.length() / total_change));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(axis: Vec3, depth: f32) -> IntersectionInformation {
        IntersectionInformation {
            axis,
            depth,
            normal_a: None,
            normal_b: None,
        }
    }

    fn settings() -> SolverSettings {
        SolverSettings::default()
    }

    #[test]
    fn test_head_on_inelastic_collision_stops_approach() {
        let mut a = PhysicsObject::new();
        let mut b = PhysicsObject::new();
        a.velocity = Vec3::new(-1.0, 0.0, 0.0);
        b.velocity = Vec3::new(1.0, 0.0, 0.0);

        // Axis from B toward A is +X.
        resolve_collision(&[info(Vec3::X, 0.1)], &mut a, &mut b, &settings());

        let relative = (a.velocity - b.velocity).dot(Vec3::X);
        assert!(relative >= -1e-5);
        // Equal masses, restitution zero: both bodies end at the
        // common velocity.
        assert!(a.velocity.length() < 1e-5);
        assert!(b.velocity.length() < 1e-5);
    }

    #[test]
    fn test_elastic_collision_swaps_velocities() {
        let mut a = PhysicsObject::new();
        let mut b = PhysicsObject::new();
        a.set_collision_coefficient(1.0).unwrap();
        a.velocity = Vec3::new(-2.0, 0.0, 0.0);
        b.velocity = Vec3::ZERO;

        resolve_collision(&[info(Vec3::X, 0.1)], &mut a, &mut b, &settings());

        assert!((a.velocity.x - 0.0).abs() < 1e-5);
        assert!((b.velocity.x + 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_restitution_bounds_separation_speed() {
        for restitution in [0.0_f32, 0.25, 0.5, 0.75, 1.0] {
            let mut a = PhysicsObject::new();
            let mut b = PhysicsObject::new();
            a.set_collision_coefficient(restitution).unwrap();
            a.velocity = Vec3::new(-3.0, 0.0, 0.0);
            b.velocity = Vec3::new(1.0, 0.0, 0.0);
            let closing_speed = (a.velocity - b.velocity).dot(Vec3::X).abs();

            resolve_collision(&[info(Vec3::X, 0.1)], &mut a, &mut b, &settings());

            let separation_speed = (a.velocity - b.velocity).dot(Vec3::X);
            assert!(separation_speed >= -1e-5);
            assert!(separation_speed <= restitution * closing_speed + 1e-4);
        }
    }

    #[test]
    fn test_separating_pair_is_left_alone() {
        let mut a = PhysicsObject::new();
        let mut b = PhysicsObject::new();
        a.velocity = Vec3::new(1.0, 0.0, 0.0);
        b.velocity = Vec3::ZERO;

        resolve_collision(&[info(Vec3::X, 0.1)], &mut a, &mut b, &settings());

        assert_eq!(a.velocity, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(b.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_static_floor_reflects_falling_body() {
        let mut body = PhysicsObject::new();
        let mut floor = PhysicsObject::new();
        floor.is_static = true;
        body.velocity = Vec3::new(0.0, -5.0, 0.0);
        body.set_collision_coefficient(0.5).unwrap();

        // Floor is body B, axis from floor toward the falling body.
        resolve_collision(&[info(Vec3::Y, 0.05)], &mut body, &mut floor, &settings());

        assert!((body.velocity.y - 2.5).abs() < 1e-4);
        assert!(body.on_ground);
        assert_eq!(floor.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_immovable_body_receives_no_velocity_change() {
        let mut mover = PhysicsObject::new();
        let mut immovable = PhysicsObject::new();
        immovable.is_immovable = true;
        mover.velocity = Vec3::new(-4.0, 0.0, 0.0);

        resolve_collision(&[info(Vec3::X, 0.1)], &mut mover, &mut immovable, &settings());

        assert_eq!(immovable.velocity, Vec3::ZERO);
        assert!(mover.velocity.x >= 0.0);
    }

    #[test]
    fn test_unresponsive_pair_is_inert() {
        let mut a = PhysicsObject::new();
        let mut b = PhysicsObject::new();
        a.is_static = true;
        b.is_immovable = true;
        b.velocity = Vec3::new(0.0, -1.0, 0.0);

        resolve_collision(&[info(Vec3::Y, 0.2)], &mut a, &mut b, &settings());

        assert_eq!(a.velocity, Vec3::ZERO);
        assert_eq!(b.velocity, Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(a.transform().borrow().position, Vec3::ZERO);
        assert_eq!(b.transform().borrow().position, Vec3::ZERO);
    }

    #[test]
    fn test_friction_slows_tangential_motion() {
        let mut slider = PhysicsObject::new();
        let mut floor = PhysicsObject::new();
        floor.is_static = true;
        slider.set_friction_coefficient(0.5).unwrap();
        floor.set_friction_coefficient(0.8).unwrap();
        slider.velocity = Vec3::new(2.0, -1.0, 0.0);

        resolve_collision(&[info(Vec3::Y, 0.01)], &mut slider, &mut floor, &settings());

        // Downward motion is cancelled and the tangential speed drops
        // without reversing.
        assert!(slider.velocity.y.abs() < 1e-4);
        assert!(slider.velocity.x < 2.0);
        assert!(slider.velocity.x > 0.0);
    }

    #[test]
    fn test_frictionless_contact_keeps_tangential_speed() {
        let mut slider = PhysicsObject::new();
        let mut floor = PhysicsObject::new();
        floor.is_static = true;
        slider.velocity = Vec3::new(2.0, -1.0, 0.0);

        resolve_collision(&[info(Vec3::Y, 0.01)], &mut slider, &mut floor, &settings());

        assert!((slider.velocity.x - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_planar_b_shape_resolves_along_its_normal() {
        let mut body = PhysicsObject::new();
        let mut ground = PhysicsObject::new();
        ground.is_static = true;
        body.velocity = Vec3::new(0.0, -3.0, 0.0);

        // The SAT axis is slightly off, the plane normal wins.
        let inf = IntersectionInformation {
            axis: Vec3::new(0.1, 0.9, 0.0).normalize(),
            depth: 0.02,
            normal_a: None,
            normal_b: Some(Vec3::Y),
        };
        resolve_collision(&[inf], &mut body, &mut ground, &settings());

        assert!(body.velocity.y.abs() < 1e-4);
        assert!(body.on_ground);
    }

    #[test]
    fn test_planar_a_shape_negates_axis() {
        // The planar shape sits on side A with its normal facing the
        // other body; the resolution axis still has to point from B
        // toward A, so the normal is negated and the body falling onto
        // the plane is caught.
        let mut plane_body = PhysicsObject::new();
        plane_body.is_static = true;
        let mut faller = PhysicsObject::new();
        faller.velocity = Vec3::new(0.0, -2.0, 0.0);

        let inf = IntersectionInformation {
            axis: Vec3::new(0.0, -1.0, 0.0),
            depth: 0.02,
            normal_a: Some(Vec3::Y),
            normal_b: None,
        };
        resolve_collision(&[inf], &mut plane_body, &mut faller, &settings());

        assert!(faller.velocity.y.abs() < 1e-4);
        assert!(faller.on_ground);
    }

    #[test]
    fn test_correction_prefers_deepest_axis() {
        let infos = [info(Vec3::X, 0.2), info(Vec3::Y, 0.5), info(Vec3::Z, 0.1)];
        let correction = correction_vector(&infos, &settings());
        assert!((correction - Vec3::new(0.0, 0.5, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_correction_skips_misaligned_planar_entries() {
        let aligned = IntersectionInformation {
            axis: Vec3::Y,
            depth: 0.1,
            normal_a: None,
            normal_b: Some(Vec3::Y),
        };
        let misaligned = IntersectionInformation {
            axis: Vec3::X,
            depth: 0.9,
            normal_a: None,
            normal_b: Some(Vec3::Y),
        };
        let correction = correction_vector(&[misaligned, aligned], &settings());
        assert!((correction - Vec3::new(0.0, 0.1, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_correction_of_empty_list_is_zero() {
        assert_eq!(correction_vector(&[], &settings()), Vec3::ZERO);
    }

    #[test]
    fn test_correction_pushes_bodies_apart() {
        let mut a = PhysicsObject::new();
        let mut b = PhysicsObject::new();
        a.velocity = Vec3::new(-1.0, 0.0, 0.0);
        b.velocity = Vec3::new(1.0, 0.0, 0.0);

        resolve_collision(&[info(Vec3::X, 0.2)], &mut a, &mut b, &settings());

        // Axis points from B toward A: A moves along +X, B along -X.
        assert!(a.transform().borrow().position.x > 0.0);
        assert!(b.transform().borrow().position.x < 0.0);
    }
}

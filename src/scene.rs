use glam::Vec3;

use crate::config::{PhysicsSettings, SolverSettings};
use crate::intersection;
use crate::object::PhysicsObject;
use crate::shapes::{Ray, Shape};
use crate::solver;
use crate::transform::TransformHandle;

/// Stable identity of a body inside a scene.
///
/// Handles stay valid until the body is removed; they replace raw
/// references so the scene can keep sole ownership of its body list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(u32);

/// Result of a scene ray cast: the closest hit distance and the body
/// that was struck, or infinity and `None` when everything missed.
#[derive(Debug, Clone, Copy)]
pub struct RayCastHit {
    pub distance: f32,
    pub body: Option<BodyHandle>,
}

/// Owns every simulated body and drives the simulation tick.
///
/// Collision testing is exhaustive over all unordered body pairs,
/// O(n²). Scene sizes in the surrounding application are a
/// few dozen bodies, where pair pruning buys nothing; a broad phase
/// can replace the pair loop later without changing the
/// overlap/resolve contract.
pub struct PhysicsScene {
    pub gravity: Vec3,
    solver_settings: SolverSettings,
    bodies: Vec<(BodyHandle, PhysicsObject)>,
    next_id: u32,
}

impl PhysicsScene {
    pub fn new() -> Self {
        Self::with_settings(&PhysicsSettings::default())
    }

    pub fn with_settings(settings: &PhysicsSettings) -> Self {
        Self {
            gravity: settings.gravity,
            solver_settings: settings.solver,
            bodies: Vec::new(),
            next_id: 1,
        }
    }

    /// Add a new body with a fresh transform.
    pub fn add_body(&mut self) -> BodyHandle {
        self.adopt_body(PhysicsObject::new())
    }

    /// Add a new body bound to a transform owned by the caller,
    /// typically the transform of the render object it represents.
    pub fn add_body_with_transform(&mut self, transform: TransformHandle) -> BodyHandle {
        self.adopt_body(PhysicsObject::with_transform(transform))
    }

    /// Take ownership of an already-configured body, maybe from
    /// another scene.
    pub fn adopt_body(&mut self, body: PhysicsObject) -> BodyHandle {
        let handle = BodyHandle(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.bodies.push((handle, body));
        handle
    }

    /// Remove a body by handle, handing it back when it was present.
    pub fn remove_body(&mut self, handle: BodyHandle) -> Option<PhysicsObject> {
        let index = self.bodies.iter().position(|(h, _)| *h == handle)?;
        Some(self.bodies.remove(index).1)
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&PhysicsObject> {
        self.bodies
            .iter()
            .find(|(h, _)| *h == handle)
            .map(|(_, body)| body)
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut PhysicsObject> {
        self.bodies
            .iter_mut()
            .find(|(h, _)| *h == handle)
            .map(|(_, body)| body)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Iterate bodies in insertion order.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &PhysicsObject)> {
        self.bodies.iter().map(|(h, body)| (*h, body))
    }

    /// Find the closest body hit by `ray`, skipping the handles in
    /// `ignore` (e.g. the caster itself) and anything farther than
    /// `max_distance`.
    pub fn ray_cast(&self, ray: &Ray, ignore: &[BodyHandle], max_distance: f32) -> RayCastHit {
        let mut closest_hit = f32::INFINITY;
        let mut closest_body = None;

        for (handle, body) in &self.bodies {
            if ignore.contains(handle) {
                continue;
            }
            let shapes: [&dyn Shape; 1] = [&body.bounding_box];
            let hit = intersection::ray_cast(ray, &shapes, max_distance.min(closest_hit));
            if hit < closest_hit {
                closest_hit = hit;
                closest_body = Some(*handle);
            }
        }

        RayCastHit {
            distance: closest_hit,
            body: closest_body,
        }
    }

    /// Advance the simulation by one tick.
    ///
    /// Three passes in a fixed order: refresh every body's world
    /// matrix and shape (and clear `on_ground`), resolve collisions
    /// over all pairs, then integrate motion for every non-static
    /// body.
    pub fn step(&mut self, dt: f32) {
        // Update all bounding shapes, and mark every body as airborne
        // until a collision this tick says otherwise.
        for (_, body) in &mut self.bodies {
            body.refresh_shape();
            body.on_ground = false;
        }

        let count = self.bodies.len();
        for i in 0..count {
            for j in (i + 1)..count {
                let (head, tail) = self.bodies.split_at_mut(j);
                let body_a = &mut head[i].1;
                let body_b = &mut tail[0].1;

                let shapes_a: [&dyn Shape; 1] = [&body_a.bounding_box];
                let shapes_b: [&dyn Shape; 1] = [&body_b.bounding_box];
                if !intersection::overlaps(&shapes_a, &shapes_b) {
                    continue;
                }

                let mut information = Vec::new();
                intersection::extract_intersection(&shapes_a, &shapes_b, &mut information);
                solver::resolve_collision(&information, body_a, body_b, &self.solver_settings);
            }
        }

        for (_, body) in &mut self.bodies {
            if body.is_static {
                continue;
            }

            // New velocity from gravity, forces and impulses. Forces
            // scale with the tick, impulses apply as-is.
            let old_velocity = body.velocity;
            body.velocity += self.gravity * dt;
            body.velocity += body.force * (dt / body.mass());
            body.velocity += body.impulse / body.mass();

            body.force = Vec3::ZERO;
            body.impulse = Vec3::ZERO;

            // Trapezoidal translation over the tick; sub-millimeter
            // moves are dropped to keep resting stacks from jittering.
            let translation = (old_velocity + body.velocity) * (0.5 * dt);
            if translation.length() > self.solver_settings.rest_translation_threshold {
                body.translate(translation);
                body.transform().borrow_mut().calculate_matrices();
            }
        }

        tracing::trace!("stepped {} bodies by {:.4}s", count, dt);
    }
}

impl Default for PhysicsScene {
    fn default() -> Self {
        Self::new()
    }
}

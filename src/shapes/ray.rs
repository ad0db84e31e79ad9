use glam::Vec3;

use crate::utils::math::DEGENERATE_AXIS_EPSILON_SQ;

/// A world-space ray: start point plus normalized direction.
///
/// Used both for gameplay picking and for internal collision queries.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    start: Vec3,
    dir: Vec3,
}

impl Ray {
    /// Build a ray; the direction is normalized here so queries can
    /// assume unit length. A zero-length direction is kept as zero and
    /// such a ray never hits anything.
    pub fn new(start: Vec3, dir: Vec3) -> Self {
        let dir = if dir.length_squared() > DEGENERATE_AXIS_EPSILON_SQ {
            dir.normalize()
        } else {
            Vec3::ZERO
        };
        Self { start, dir }
    }

    pub fn start(&self) -> Vec3 {
        self.start
    }

    pub fn dir(&self) -> Vec3 {
        self.dir
    }

    pub fn set_start(&mut self, start: Vec3) {
        self.start = start;
    }

    pub fn set_dir(&mut self, dir: Vec3) {
        *self = Self::new(self.start, dir);
    }

    /// True when the direction collapsed to zero at construction.
    pub fn is_degenerate(&self) -> bool {
        self.dir == Vec3::ZERO
    }

    pub fn point_at(&self, distance: f32) -> Vec3 {
        self.start + self.dir * distance
    }
}

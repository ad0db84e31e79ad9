use glam::{Mat4, Vec3};

/// Squared-length threshold below which a direction is treated as
/// degenerate (parallel edge cross products, zero-length rays).
pub const DEGENERATE_AXIS_EPSILON_SQ: f32 = 1e-8;

/// Extract the rotation basis and the per-axis scale from a world
/// matrix.
///
/// The matrix columns encode scale in their lengths; the returned axes
/// are normalized and the lengths are handed back separately. Columns
/// collapsed by a zero scale fall back to the canonical axis so callers
/// always get a usable basis to project onto.
pub fn basis_from_matrix(matrix: &Mat4) -> ([Vec3; 3], Vec3) {
    let raw = [
        matrix.transform_vector3(Vec3::X),
        matrix.transform_vector3(Vec3::Y),
        matrix.transform_vector3(Vec3::Z),
    ];
    let scale = Vec3::new(raw[0].length(), raw[1].length(), raw[2].length());

    let fallback = [Vec3::X, Vec3::Y, Vec3::Z];
    let mut axes = [Vec3::ZERO; 3];
    for i in 0..3 {
        axes[i] = if scale[i] > f32::EPSILON {
            raw[i] / scale[i]
        } else {
            fallback[i]
        };
    }

    (axes, scale)
}

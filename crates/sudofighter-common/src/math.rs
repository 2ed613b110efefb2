//! Vector and rotation helpers.
//!
//! World space is right-handed with +Y up and +Z as the forward axis of an
//! unrotated combatant. All helpers are thin wrappers over `glam`.

use glam::{Mat3, Quat, Vec3};

/// Squared length below which a direction is treated as zero.
const DEGENERATE_EPSILON: f32 = 1e-8;

/// World up axis.
pub const WORLD_UP: Vec3 = Vec3::Y;

/// Forward axis of an unrotated combatant.
pub const WORLD_FORWARD: Vec3 = Vec3::Z;

/// Unit vector pointing from `from` to `to`, or zero when they coincide.
#[must_use]
pub fn direction_to(from: Vec3, to: Vec3) -> Vec3 {
    (to - from).normalize_or_zero()
}

/// Rotation whose forward axis points along `forward`, keeping +Y up.
///
/// A zero vector yields the identity rotation. A vector parallel to the up
/// axis picks +X as the right axis so the basis stays orthonormal.
#[must_use]
pub fn look_rotation(forward: Vec3) -> Quat {
    let forward = forward.normalize_or_zero();
    if forward.length_squared() < DEGENERATE_EPSILON {
        return Quat::IDENTITY;
    }

    let mut right = WORLD_UP.cross(forward);
    if right.length_squared() < DEGENERATE_EPSILON {
        right = Vec3::X;
    }
    let right = right.normalize();
    let up = forward.cross(right);

    Quat::from_mat3(&Mat3::from_cols(right, up, forward)).normalize()
}

/// Spherical interpolation with `t` clamped to `[0, 1]`.
#[must_use]
pub fn slerp_clamped(from: Quat, to: Quat, t: f32) -> Quat {
    from.slerp(to, t.clamp(0.0, 1.0)).normalize()
}

/// Forward axis of a rotation in world space.
#[must_use]
pub fn forward_of(rotation: Quat) -> Vec3 {
    rotation * WORLD_FORWARD
}

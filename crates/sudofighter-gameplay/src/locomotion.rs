//! Straight-line movement shared by the player controller and the AI.
//!
//! Motion is a plain translation handed to the movement actuator; facing
//! turns toward the heading by spherical interpolation clamped to one
//! step per call.

use glam::Vec3;
use sudofighter_common::{look_rotation, slerp_clamped};

use crate::combatant::Combatant;
use crate::presentation::CombatantRig;

/// Translates a combatant and turns it toward `heading`.
pub(crate) fn walk(
    combatant: &mut Combatant,
    rig: &mut CombatantRig,
    displacement: Vec3,
    heading: Vec3,
    dt: f32,
) {
    if heading.length_squared() > f32::EPSILON {
        let target = look_rotation(heading);
        let t = combatant.rotation_speed() * dt;
        combatant.set_rotation(slerp_clamped(combatant.rotation(), target, t));
    }
    translate(combatant, rig, displacement);
    set_walking(combatant, rig, true);
}

/// Moves a combatant through its actuator without turning.
pub(crate) fn translate(combatant: &mut Combatant, rig: &mut CombatantRig, displacement: Vec3) {
    let position = rig.move_by(combatant.position(), displacement);
    combatant.set_position(position);
}

/// Updates the walking flag, forwarding only changes to the animator.
pub(crate) fn set_walking(combatant: &mut Combatant, rig: &mut CombatantRig, walking: bool) {
    if combatant.is_walking() != walking {
        combatant.set_walking(walking);
        rig.set_walking(walking);
    }
}

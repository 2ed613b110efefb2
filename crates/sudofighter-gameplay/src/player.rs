//! Player controller.
//!
//! The input layer decodes devices into a [`PlayerIntent`] per tick; this
//! module turns that intent into movement and dodges. Attack intents are
//! routed through the attack resolver by the match.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use sudofighter_common::CombatantId;
use tracing::trace;

use crate::locomotion;
use crate::roster::Roster;

/// Decoded player input for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PlayerIntent {
    /// Forward/backward axis in `[-1, 1]`
    pub move_axis: f32,
    /// Attack variant to perform, if any
    pub attack: Option<usize>,
    /// Dodge to perform, if any
    pub dodge: Option<DodgeDirection>,
}

impl PlayerIntent {
    /// Intent that does nothing.
    #[must_use]
    pub fn idle() -> Self {
        Self::default()
    }

    /// Intent that walks along the forward axis.
    #[must_use]
    pub fn walk(move_axis: f32) -> Self {
        Self {
            move_axis,
            ..Self::default()
        }
    }

    /// Intent that attacks with the given variant.
    #[must_use]
    pub fn attack(index: usize) -> Self {
        Self {
            attack: Some(index),
            ..Self::default()
        }
    }

    /// Adds a dodge to the intent.
    #[must_use]
    pub fn with_dodge(mut self, direction: DodgeDirection) -> Self {
        self.dodge = Some(direction);
        self
    }
}

/// Direction of a dodge relative to the combatant's facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DodgeDirection {
    /// Along the facing direction
    Front,
    /// Against the facing direction
    Back,
}

impl DodgeDirection {
    /// Animation played for this dodge.
    #[must_use]
    pub const fn animation(self) -> &'static str {
        match self {
            Self::Front => "DodgeFrontAnimation",
            Self::Back => "DodgeBackAnimation",
        }
    }

    const fn sign(self) -> f32 {
        match self {
            Self::Front => 1.0,
            Self::Back => -1.0,
        }
    }
}

/// Walks an active combatant along the world forward axis.
///
/// A non-zero axis turns the combatant toward the movement direction and
/// raises the walking flag; a zero axis clears it.
pub fn apply_movement(roster: &mut Roster, id: CombatantId, move_axis: f32, dt: f32) {
    let Some((combatant, rig)) = roster.parts_mut(id) else {
        return;
    };
    if !combatant.is_active() {
        return;
    }

    let axis = move_axis.clamp(-1.0, 1.0);
    if axis.abs() <= f32::EPSILON {
        locomotion::set_walking(combatant, rig, false);
        return;
    }

    let heading = Vec3::new(0.0, 0.0, axis);
    let displacement = heading * combatant.move_speed() * dt;
    locomotion::walk(combatant, rig, displacement, heading, dt);
}

/// Dodges an active combatant by its dodge distance; returns the new position.
pub fn dodge(roster: &mut Roster, id: CombatantId, direction: DodgeDirection) -> Option<Vec3> {
    let (combatant, rig) = roster.parts_mut(id)?;
    if !combatant.is_active() {
        return None;
    }

    rig.play(direction.animation());
    let displacement = combatant.forward() * combatant.dodge_distance() * direction.sign();
    locomotion::translate(combatant, rig, displacement);
    trace!(%id, ?direction, position = ?combatant.position(), "Dodged");
    Some(combatant.position())
}

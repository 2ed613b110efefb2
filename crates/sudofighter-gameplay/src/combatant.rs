//! Combatant entity.
//!
//! A combatant is created once when the match loads and lives until the
//! match is torn down. Its health only ever decreases, and only the hit
//! reaction pipeline writes it; its attack timestamp is written only by the
//! attack resolver.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use sudofighter_common::{forward_of, look_rotation, CombatantId};

use crate::config::CombatantConfig;

/// Who controls a combatant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Driven by decoded player input
    #[default]
    Player,
    /// Driven by the opponent decision loop
    OpponentAi,
}

impl Role {
    /// Human-readable label used in logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::OpponentAi => "opponent",
        }
    }

    /// The role this role fights against.
    #[must_use]
    pub const fn opposing(self) -> Self {
        match self {
            Self::Player => Self::OpponentAi,
            Self::OpponentAi => Self::Player,
        }
    }
}

/// Timestamp rounding tolerated when comparing an attack gap to the cooldown.
pub const COOLDOWN_EPSILON: f32 = 1e-4;

/// A participant in a match.
#[derive(Debug, Clone, PartialEq)]
pub struct Combatant {
    id: CombatantId,
    name: String,
    role: Role,

    position: Vec3,
    rotation: Quat,

    max_hp: i32,
    current_hp: i32,

    /// Simulation time of the most recent accepted attack (None = never)
    last_attack_at: Option<f32>,
    attack_cooldown: f32,

    attack_radius: f32,
    damage_per_hit: i32,
    attack_animations: Vec<String>,
    hit_sounds: Vec<String>,

    move_speed: f32,
    rotation_speed: f32,
    dodge_distance: f32,

    active: bool,
    walking: bool,
    low_health_signalled: bool,
}

impl Combatant {
    /// Creates a combatant from its configuration.
    #[must_use]
    pub fn from_config(id: CombatantId, config: &CombatantConfig) -> Self {
        let max_hp = config.max_hp.max(1);
        Self {
            id,
            name: config.name.clone(),
            role: config.role,
            position: config.position,
            rotation: look_rotation(config.facing),
            max_hp,
            current_hp: max_hp,
            last_attack_at: None,
            attack_cooldown: config.attack_cooldown.max(0.0),
            attack_radius: config.attack_radius.max(0.0),
            damage_per_hit: config.damage_per_hit,
            attack_animations: config.attack_animations.clone(),
            hit_sounds: config.hit_sounds.clone(),
            move_speed: config.move_speed,
            rotation_speed: config.rotation_speed,
            dodge_distance: config.dodge_distance,
            active: true,
            walking: false,
            low_health_signalled: false,
        }
    }

    /// Returns the combatant's id.
    #[must_use]
    pub fn id(&self) -> CombatantId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns who controls this combatant.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the world position.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Returns the facing rotation.
    #[must_use]
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Returns the forward direction in world space.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        forward_of(self.rotation)
    }

    /// Returns the maximum health.
    #[must_use]
    pub fn max_hp(&self) -> i32 {
        self.max_hp
    }

    /// Returns the current health. May be negative after a lethal hit.
    #[must_use]
    pub fn current_hp(&self) -> i32 {
        self.current_hp
    }

    /// Returns whether the combatant still has health left.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    /// Returns whether the combatant is active in the scene.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns whether the walking animation flag is set.
    #[must_use]
    pub fn is_walking(&self) -> bool {
        self.walking
    }

    /// Returns the time of the last accepted attack.
    #[must_use]
    pub fn last_attack_at(&self) -> Option<f32> {
        self.last_attack_at
    }

    /// Returns the attack cooldown in seconds.
    #[must_use]
    pub fn attack_cooldown(&self) -> f32 {
        self.attack_cooldown
    }

    /// Returns the attack radius.
    #[must_use]
    pub fn attack_radius(&self) -> f32 {
        self.attack_radius
    }

    /// Returns the damage dealt per landed hit.
    #[must_use]
    pub fn damage_per_hit(&self) -> i32 {
        self.damage_per_hit
    }

    /// Returns the attack animation names.
    #[must_use]
    pub fn attack_animations(&self) -> &[String] {
        &self.attack_animations
    }

    /// Returns the hit sound clip names.
    #[must_use]
    pub fn hit_sounds(&self) -> &[String] {
        &self.hit_sounds
    }

    /// Returns the movement speed.
    #[must_use]
    pub fn move_speed(&self) -> f32 {
        self.move_speed
    }

    /// Returns the rotation smoothing factor.
    #[must_use]
    pub fn rotation_speed(&self) -> f32 {
        self.rotation_speed
    }

    /// Returns the dodge distance.
    #[must_use]
    pub fn dodge_distance(&self) -> f32 {
        self.dodge_distance
    }

    /// Returns whether the low-health cue was already requested.
    #[must_use]
    pub fn low_health_signalled(&self) -> bool {
        self.low_health_signalled
    }

    /// Straight-line distance to another combatant.
    #[must_use]
    pub fn distance_to(&self, other: &Combatant) -> f32 {
        self.position.distance(other.position)
    }

    /// Animation name for an attack index, if the index is in range.
    #[must_use]
    pub fn attack_animation(&self, index: usize) -> Option<&str> {
        self.attack_animations
            .get(index)
            .map(String::as_str)
            .filter(|name| !name.is_empty())
    }

    /// Checks whether the cooldown has strictly elapsed at `now`.
    ///
    /// Gaps within [`COOLDOWN_EPSILON`] of the cooldown count as equal to it
    /// and are rejected.
    #[must_use]
    pub fn cooldown_ready(&self, now: f32) -> bool {
        match self.last_attack_at {
            Some(last) => now - last > self.attack_cooldown + COOLDOWN_EPSILON,
            None => true,
        }
    }

    /// Seconds until the cooldown elapses (zero when ready).
    #[must_use]
    pub fn cooldown_remaining(&self, now: f32) -> f32 {
        match self.last_attack_at {
            Some(last) => (self.attack_cooldown - (now - last)).max(0.0),
            None => 0.0,
        }
    }

    pub(crate) fn mark_attack(&mut self, now: f32) {
        self.last_attack_at = Some(now);
    }

    /// Subtracts damage without clamping; returns the new health.
    pub(crate) fn take_damage(&mut self, damage: i32) -> i32 {
        self.current_hp = self.current_hp.saturating_sub(damage);
        self.current_hp
    }

    pub(crate) fn mark_low_health_signalled(&mut self) {
        self.low_health_signalled = true;
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
        if !active {
            self.walking = false;
        }
    }

    pub(crate) fn set_walking(&mut self, walking: bool) {
        self.walking = walking;
    }

    pub(crate) fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub(crate) fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }

    #[cfg(test)]
    pub(crate) fn set_current_hp(&mut self, hp: i32) {
        self.current_hp = hp;
    }
}

//! Fight configuration.
//!
//! Everything tunable about a match lives here: per-combatant combat
//! parameters, hit reaction timing, and opponent AI settings. The structs
//! deserialize with `#[serde(default)]` so a partial TOML table only needs
//! to name the values it overrides.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use sudofighter_common::SchemaVersion;

use crate::combatant::Role;

/// Attack animation names shared by both default combatants.
pub const DEFAULT_ATTACK_ANIMATIONS: [&str; 4] = [
    "Attack1Animation",
    "Attack2Animation",
    "Attack3Animation",
    "Attack4Animation",
];

/// Creation parameters for a single combatant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatantConfig {
    /// Display name (used in logs)
    pub name: String,
    /// Who controls the combatant
    pub role: Role,
    /// Spawn position in world space
    pub position: Vec3,
    /// Initial facing direction
    pub facing: Vec3,
    /// Maximum (and starting) health
    pub max_hp: i32,
    /// Damage dealt by each landed hit
    pub damage_per_hit: i32,
    /// Minimum seconds between accepted attacks
    pub attack_cooldown: f32,
    /// Maximum center-to-center distance at which an attack connects
    pub attack_radius: f32,
    /// Movement speed in units/sec
    pub move_speed: f32,
    /// Rotation smoothing factor (higher = snappier)
    pub rotation_speed: f32,
    /// Distance covered by a dodge
    pub dodge_distance: f32,
    /// Attack animation names, index matched to attack number
    pub attack_animations: Vec<String>,
    /// Audio clips, one picked at random when this combatant is hit
    pub hit_sounds: Vec<String>,
}

impl Default for CombatantConfig {
    fn default() -> Self {
        Self::player("Fighter")
    }
}

impl CombatantConfig {
    /// Player-controlled combatant with the stock fight settings.
    #[must_use]
    pub fn player(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: Role::Player,
            position: Vec3::ZERO,
            facing: Vec3::Z,
            max_hp: 100,
            damage_per_hit: 5,
            attack_cooldown: 0.5,
            attack_radius: 2.2,
            move_speed: 1.0,
            rotation_speed: 10.0,
            dodge_distance: 5.0,
            attack_animations: DEFAULT_ATTACK_ANIMATIONS
                .iter()
                .map(ToString::to_string)
                .collect(),
            hit_sounds: vec![
                "hit_grunt_1".to_string(),
                "hit_grunt_2".to_string(),
                "hit_grunt_3".to_string(),
            ],
        }
    }

    /// AI-controlled combatant with the stock fight settings.
    #[must_use]
    pub fn opponent(name: impl Into<String>) -> Self {
        Self {
            role: Role::OpponentAi,
            position: Vec3::new(0.0, 0.0, 4.0),
            facing: Vec3::NEG_Z,
            attack_radius: 2.0,
            hit_sounds: vec!["punch_1".to_string(), "punch_2".to_string()],
            ..Self::player(name)
        }
    }

    /// Sets the spawn position.
    #[must_use]
    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Sets the maximum health.
    #[must_use]
    pub fn with_max_hp(mut self, max_hp: i32) -> Self {
        self.max_hp = max_hp;
        self
    }

    /// Sets the damage per landed hit.
    #[must_use]
    pub fn with_damage(mut self, damage: i32) -> Self {
        self.damage_per_hit = damage;
        self
    }

    /// Sets the attack radius.
    #[must_use]
    pub fn with_attack_radius(mut self, radius: f32) -> Self {
        self.attack_radius = radius;
        self
    }

    /// Sets the hit sound set.
    #[must_use]
    pub fn with_hit_sounds(mut self, sounds: Vec<String>) -> Self {
        self.hit_sounds = sounds;
        self
    }

    /// Sets the attack animation set.
    #[must_use]
    pub fn with_attack_animations(mut self, animations: Vec<String>) -> Self {
        self.attack_animations = animations;
        self
    }

    /// Clamps values to sensible ranges.
    pub fn validate(&mut self) {
        self.max_hp = self.max_hp.max(1);
        self.damage_per_hit = self.damage_per_hit.max(0);
        self.attack_cooldown = self.attack_cooldown.max(0.0);
        self.attack_radius = self.attack_radius.max(0.0);
        self.move_speed = self.move_speed.max(0.0);
        self.rotation_speed = self.rotation_speed.max(0.0);
        self.dodge_distance = self.dodge_distance.max(0.0);
    }
}

/// How overlapping hit reactions against one target are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReactionOverlap {
    /// Tasks run interleaved; feedback start/stop from different tasks may race.
    #[default]
    Interleave,
    /// A task starts only after every earlier task for the same target finished.
    Serialize,
}

/// Timing and feedback parameters of the hit reaction pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactionSettings {
    /// Delay between feedback start and damage application, in scaled seconds
    pub delay: f32,
    /// Health at or below which the low-health cue is requested
    pub low_health_threshold: i32,
    /// Low frequency motor intensity (0-1) when hit
    pub vibration_low: f32,
    /// High frequency motor intensity (0-1) when hit
    pub vibration_high: f32,
    /// Overlap policy for concurrent reactions on one target
    pub overlap: ReactionOverlap,
}

impl Default for ReactionSettings {
    fn default() -> Self {
        Self {
            delay: 0.3,
            low_health_threshold: 40,
            vibration_low: 0.5,
            vibration_high: 0.5,
            overlap: ReactionOverlap::Interleave,
        }
    }
}

impl ReactionSettings {
    /// Clamps values to sensible ranges.
    pub fn validate(&mut self) {
        self.delay = self.delay.clamp(0.0, 5.0);
        self.vibration_low = self.vibration_low.clamp(0.0, 1.0);
        self.vibration_high = self.vibration_high.clamp(0.0, 1.0);
    }
}

/// Which radius decides whether an AI attack schedules a hit reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AiHitGate {
    /// The AI's own engage radius gates the reaction; the resolver only
    /// consumes the cooldown and plays the animation.
    #[default]
    EngageRadius,
    /// Reactions are scheduled only through the resolver's radius test.
    ResolverRadius,
}

/// Opponent AI tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    /// Distance at which the AI stops approaching and starts attacking
    pub engage_radius: f32,
    /// Radius gate used for scheduling reactions
    pub hit_gate: AiHitGate,
    /// Skip attacks while reactions against the AI itself are in flight
    pub suppress_while_reeling: bool,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            engage_radius: 2.0,
            hit_gate: AiHitGate::EngageRadius,
            suppress_while_reeling: false,
        }
    }
}

impl AiSettings {
    /// Clamps values to sensible ranges.
    pub fn validate(&mut self) {
        self.engage_radius = self.engage_radius.max(0.0);
    }
}

/// Complete match configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FightConfig {
    /// Schema version of this configuration
    pub schema_version: SchemaVersion,
    /// RNG seed (None = random)
    pub seed: Option<u64>,
    /// Hit reaction parameters
    pub reaction: ReactionSettings,
    /// Opponent AI parameters
    pub ai: AiSettings,
    /// Combatants created when the match loads
    pub combatants: Vec<CombatantConfig>,
}

impl Default for FightConfig {
    fn default() -> Self {
        Self {
            schema_version: SchemaVersion::FIGHT_CONFIG,
            seed: None,
            reaction: ReactionSettings::default(),
            ai: AiSettings::default(),
            combatants: vec![
                CombatantConfig::player("Fighter"),
                CombatantConfig::opponent("Opponent"),
            ],
        }
    }
}

impl FightConfig {
    /// Creates a configuration with no combatants.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            combatants: Vec::new(),
            ..Self::default()
        }
    }

    /// Adds a combatant.
    #[must_use]
    pub fn with_combatant(mut self, combatant: CombatantConfig) -> Self {
        self.combatants.push(combatant);
        self
    }

    /// Sets the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate and clamp every nested value.
    pub fn validate(&mut self) {
        self.reaction.validate();
        self.ai.validate();
        for combatant in &mut self.combatants {
            combatant.validate();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FightConfig::default();
        assert_eq!(config.combatants.len(), 2);
        assert_eq!(config.combatants[0].role, Role::Player);
        assert_eq!(config.combatants[1].role, Role::OpponentAi);
        assert!((config.reaction.delay - 0.3).abs() < 1e-6);
        assert_eq!(config.reaction.low_health_threshold, 40);
    }

    #[test]
    fn test_stock_combatants() {
        let player = CombatantConfig::player("P");
        assert!((player.attack_radius - 2.2).abs() < 1e-6);
        assert_eq!(player.attack_animations.len(), 4);

        let opponent = CombatantConfig::opponent("O");
        assert!((opponent.attack_radius - 2.0).abs() < 1e-6);
        assert_eq!(opponent.max_hp, 100);
    }

    #[test]
    fn test_config_validation() {
        let mut config = FightConfig::default();
        config.reaction.vibration_low = 3.0;
        config.combatants[0].max_hp = -10;
        config.combatants[0].attack_cooldown = -1.0;

        config.validate();

        assert_eq!(config.reaction.vibration_low, 1.0);
        assert_eq!(config.combatants[0].max_hp, 1);
        assert_eq!(config.combatants[0].attack_cooldown, 0.0);
    }

    #[test]
    fn test_config_json_partial() {
        let json = r#"{ "seed": 7, "reaction": { "delay": 0.1 } }"#;
        let config: FightConfig = serde_json::from_str(json).expect("parse");

        assert_eq!(config.seed, Some(7));
        assert!((config.reaction.delay - 0.1).abs() < 1e-6);
        assert_eq!(config.reaction.low_health_threshold, 40);
        assert_eq!(config.combatants.len(), 2);
    }

    #[test]
    fn test_overlap_serde_names() {
        let json = serde_json::to_string(&ReactionOverlap::Serialize).expect("serialize");
        assert_eq!(json, "\"serialize\"");
        let gate: AiHitGate = serde_json::from_str("\"resolver_radius\"").expect("parse");
        assert_eq!(gate, AiHitGate::ResolverRadius);
    }
}

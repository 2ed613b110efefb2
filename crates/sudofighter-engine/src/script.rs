//! Scripted player input for headless runs.
//!
//! Stands in for the input layer: reads the match state and produces the
//! decoded [`PlayerIntent`] a human would.

use sudofighter_common::CombatantId;
use sudofighter_gameplay::{Clock, Match, PlayerIntent};

use crate::config::PlayerScript;

/// Produces one player intent per tick.
#[derive(Debug, Clone)]
pub struct ScriptedPlayer {
    script: PlayerScript,
    next_attack: usize,
}

impl ScriptedPlayer {
    /// Creates a scripted player.
    #[must_use]
    pub fn new(script: PlayerScript) -> Self {
        Self {
            script,
            next_attack: 0,
        }
    }

    /// Decides the intent for `player` this tick.
    pub fn intent<C: Clock>(&mut self, fight: &Match<C>, player: CombatantId) -> PlayerIntent {
        if self.script == PlayerScript::Idle {
            return PlayerIntent::idle();
        }

        let roster = fight.roster();
        let Some(me) = roster.get(player).filter(|c| c.is_active()) else {
            return PlayerIntent::idle();
        };

        let nearest = fight
            .opponents()
            .iter()
            .filter_map(|&id| roster.get(id))
            .filter(|c| c.is_active())
            .min_by(|a, b| me.distance_to(a).total_cmp(&me.distance_to(b)));
        let Some(target) = nearest else {
            return PlayerIntent::idle();
        };

        if me.distance_to(target) <= me.attack_radius() {
            if !me.cooldown_ready(fight.clock().now()) {
                return PlayerIntent::idle();
            }
            let variants = me.attack_animations().len().max(1);
            let index = self.next_attack % variants;
            self.next_attack = self.next_attack.wrapping_add(1);
            PlayerIntent::attack(index)
        } else {
            // movement is along Z only, so an X-only offset cannot be closed
            let dz = target.position().z - me.position().z;
            if dz.abs() <= f32::EPSILON {
                return PlayerIntent::idle();
            }
            PlayerIntent::walk(dz.signum())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use sudofighter_gameplay::{CombatantConfig, FightConfig};

    const PLAYER: CombatantId = CombatantId::new(0);

    fn fight(opponent_z: f32) -> Match {
        Match::with_sim_clock(
            FightConfig::empty()
                .with_combatant(CombatantConfig::player("P"))
                .with_combatant(
                    CombatantConfig::opponent("O").at(Vec3::new(0.0, 0.0, opponent_z)),
                ),
        )
    }

    #[test]
    fn test_idle_script() {
        let m = fight(1.0);
        let mut script = ScriptedPlayer::new(PlayerScript::Idle);
        assert_eq!(script.intent(&m, PLAYER), PlayerIntent::idle());
    }

    #[test]
    fn test_walks_toward_far_opponent() {
        let m = fight(-6.0);
        let mut script = ScriptedPlayer::new(PlayerScript::Aggressive);
        assert_eq!(script.intent(&m, PLAYER), PlayerIntent::walk(-1.0));
    }

    #[test]
    fn test_idles_when_opponent_is_level_on_z() {
        let m = Match::with_sim_clock(
            FightConfig::empty()
                .with_combatant(CombatantConfig::player("P"))
                .with_combatant(CombatantConfig::opponent("O").at(Vec3::new(6.0, 0.0, 0.0))),
        );
        let mut script = ScriptedPlayer::new(PlayerScript::Aggressive);
        assert_eq!(script.intent(&m, PLAYER), PlayerIntent::idle());
    }

    #[test]
    fn test_cycles_attacks_in_range() {
        let mut m = fight(1.0);
        let mut script = ScriptedPlayer::new(PlayerScript::Aggressive);

        assert_eq!(script.intent(&m, PLAYER), PlayerIntent::attack(0));
        m.tick(0.0, &PlayerIntent::attack(0));

        // on cooldown
        m.tick(0.2, &PlayerIntent::idle());
        assert_eq!(script.intent(&m, PLAYER), PlayerIntent::idle());

        m.tick(0.4, &PlayerIntent::idle());
        assert_eq!(script.intent(&m, PLAYER), PlayerIntent::attack(1));
    }
}

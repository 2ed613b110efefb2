//! Opponent decision loop.
//!
//! Each tick, every {AI combatant, tracked target} pair gets one decision.
//! The decision is a pure function of distance and cooldown: inside the
//! engage radius the AI stands and attacks when its cooldown allows,
//! outside it walks straight at the target. Nothing is remembered between
//! ticks except the attack timestamp on the combatant itself.

use fastrand::Rng;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use sudofighter_common::{direction_to, CombatantId};
use tracing::trace;

use crate::attack::{self, AttackResult};
use crate::config::{AiHitGate, AiSettings};
use crate::events::EventBus;
use crate::hit_reaction::HitReactionQueue;
use crate::locomotion;
use crate::roster::Roster;

/// What an AI combatant does this tick against one target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AiDecision {
    /// AI or target inactive or missing
    Idle,
    /// Out of range: walk along `direction`
    Approach {
        /// Unit vector toward the target
        direction: Vec3,
    },
    /// In range: stand and attack if `ready`
    Engage {
        /// Whether an attack is attempted this tick
        ready: bool,
    },
}

/// Per-tick controller for AI combatants.
#[derive(Debug, Clone, Default)]
pub struct OpponentBrain {
    settings: AiSettings,
}

impl OpponentBrain {
    /// Creates a brain with the given settings.
    #[must_use]
    pub fn new(settings: AiSettings) -> Self {
        Self { settings }
    }

    /// Decides what `ai` does about `target` at time `now`.
    #[must_use]
    pub fn decide(
        &self,
        roster: &Roster,
        ai: CombatantId,
        target: CombatantId,
        now: f32,
        reactions: &HitReactionQueue,
    ) -> AiDecision {
        let (Some(me), Some(other)) = (roster.get(ai), roster.get(target)) else {
            return AiDecision::Idle;
        };
        if !me.is_active() || !other.is_active() {
            return AiDecision::Idle;
        }

        if me.distance_to(other) <= self.settings.engage_radius {
            let reeling = self.settings.suppress_while_reeling && reactions.in_flight_for(ai) > 0;
            AiDecision::Engage {
                ready: me.cooldown_ready(now) && !reeling,
            }
        } else {
            AiDecision::Approach {
                direction: direction_to(me.position(), other.position()),
            }
        }
    }

    /// Runs the engaged stance: clears the walking flag and attacks when ready.
    ///
    /// With [`AiHitGate::EngageRadius`] the resolver only gates the cooldown
    /// and plays the animation; the reaction is scheduled against `target`
    /// directly, so the result reports it as landed. With
    /// [`AiHitGate::ResolverRadius`] the resolver's own target selection
    /// decides.
    #[allow(clippy::too_many_arguments)]
    pub fn engage(
        &self,
        roster: &mut Roster,
        ai: CombatantId,
        target: CombatantId,
        ready: bool,
        now: f32,
        rng: &mut Rng,
        reactions: &mut HitReactionQueue,
        events: &EventBus,
    ) -> Option<AttackResult> {
        let (me, rig) = roster.parts_mut(ai)?;
        locomotion::set_walking(me, rig, false);
        if !ready {
            return None;
        }

        let variants = me.attack_animations().len();
        let attack_index = if variants == 0 { 0 } else { rng.usize(..variants) };
        trace!(%ai, %target, attack_index, "AI attacking");

        let result = match self.settings.hit_gate {
            AiHitGate::EngageRadius => {
                let result = attack::resolve(roster, ai, attack_index, &[target], now, events);
                if result.is_accepted() {
                    let damage = roster.get(ai).map_or(0, |c| c.damage_per_hit());
                    reactions.schedule(target, damage, events);
                    AttackResult::Landed {
                        targets: vec![target],
                    }
                } else {
                    result
                }
            },
            AiHitGate::ResolverRadius => {
                attack::try_attack(roster, ai, attack_index, &[target], now, reactions, events)
            },
        };
        Some(result)
    }

    /// Walks `ai` along `direction` for one tick.
    pub fn approach(&self, roster: &mut Roster, ai: CombatantId, direction: Vec3, dt: f32) {
        let Some((me, rig)) = roster.parts_mut(ai) else {
            return;
        };
        if !me.is_active() {
            return;
        }
        let displacement = direction * me.move_speed() * dt;
        locomotion::walk(me, rig, displacement, direction, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CombatantConfig;
    use crate::events::FightEvent;
    use crate::presentation::mock::{recording_rig, Call};

    const PLAYER: CombatantId = CombatantId::new(0);
    const AI: CombatantId = CombatantId::new(1);

    fn roster_at(ai_z: f32) -> Roster {
        Roster::from_configs(&[
            CombatantConfig::player("P"),
            CombatantConfig::opponent("O").at(Vec3::new(0.0, 0.0, ai_z)),
        ])
    }

    #[test]
    fn test_far_target_is_approached() {
        let roster = roster_at(4.0);
        let brain = OpponentBrain::default();

        let decision = brain.decide(&roster, AI, PLAYER, 0.0, &HitReactionQueue::default());

        let AiDecision::Approach { direction } = decision else {
            panic!("expected approach, got {decision:?}");
        };
        assert!((direction - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn test_near_target_is_engaged() {
        let roster = roster_at(2.0);
        let brain = OpponentBrain::default();

        let decision = brain.decide(&roster, AI, PLAYER, 0.0, &HitReactionQueue::default());
        assert_eq!(decision, AiDecision::Engage { ready: true });
    }

    #[test]
    fn test_inactive_target_is_idle() {
        let mut roster = roster_at(1.0);
        roster.get_mut(PLAYER).expect("player").set_active(false);
        let brain = OpponentBrain::default();

        let decision = brain.decide(&roster, AI, PLAYER, 0.0, &HitReactionQueue::default());
        assert_eq!(decision, AiDecision::Idle);
        assert_eq!(
            brain.decide(&roster, AI, CombatantId::new(5), 0.0, &HitReactionQueue::default()),
            AiDecision::Idle
        );
    }

    #[test]
    fn test_approach_moves_and_faces_target() {
        let mut roster = roster_at(4.0);
        let (rig, log) = recording_rig(false);
        roster.attach_rig(AI, rig).expect("attach");
        log.clear();
        let brain = OpponentBrain::default();

        brain.approach(&mut roster, AI, Vec3::NEG_Z, 0.5);

        let ai = roster.get(AI).expect("ai");
        assert!((ai.position().z - 3.5).abs() < 1e-6);
        assert!((ai.forward() - Vec3::NEG_Z).length() < 1e-3);
        assert!(ai.is_walking());
        assert!(log.calls().contains(&Call::Walking(true)));
    }

    #[test]
    fn test_engage_schedules_hit_on_ready_tick() {
        let mut roster = roster_at(1.5);
        let brain = OpponentBrain::default();
        let mut rng = Rng::with_seed(11);
        let mut queue = HitReactionQueue::default();
        let events = EventBus::default();

        let result = brain.engage(&mut roster, AI, PLAYER, true, 0.0, &mut rng, &mut queue, &events);

        assert_eq!(result, Some(AttackResult::Landed { targets: vec![PLAYER] }));
        assert_eq!(queue.in_flight_for(PLAYER), 1);
        assert_eq!(roster.get(AI).and_then(|c| c.last_attack_at()), Some(0.0));
    }

    #[test]
    fn test_engage_not_ready_only_stands() {
        let mut roster = roster_at(1.5);
        let (rig, log) = recording_rig(false);
        roster.attach_rig(AI, rig).expect("attach");
        log.clear();
        let brain = OpponentBrain::default();
        let mut rng = Rng::with_seed(11);
        let mut queue = HitReactionQueue::default();
        let events = EventBus::default();

        brain.approach(&mut roster, AI, Vec3::NEG_Z, 0.1);
        let result = brain.engage(&mut roster, AI, PLAYER, false, 0.0, &mut rng, &mut queue, &events);

        assert_eq!(result, None);
        assert!(queue.is_empty());
        assert_eq!(log.calls().last(), Some(&Call::Walking(false)));
    }

    #[test]
    fn test_engage_gate_ignores_resolver_radius() {
        // engage radius wider than the attack radius
        let mut roster = Roster::from_configs(&[
            CombatantConfig::player("P"),
            CombatantConfig::opponent("O")
                .at(Vec3::new(0.0, 0.0, 1.9))
                .with_attack_radius(1.0),
        ]);
        let mut rng = Rng::with_seed(5);
        let events = EventBus::default();

        let engage_gate = OpponentBrain::default();
        let mut queue = HitReactionQueue::default();
        engage_gate.engage(&mut roster, AI, PLAYER, true, 0.0, &mut rng, &mut queue, &events);
        assert_eq!(queue.len(), 1);

        let resolver_gate = OpponentBrain::new(AiSettings {
            hit_gate: AiHitGate::ResolverRadius,
            ..AiSettings::default()
        });
        let mut queue = HitReactionQueue::default();
        let result =
            resolver_gate.engage(&mut roster, AI, PLAYER, true, 1.0, &mut rng, &mut queue, &events);
        assert_eq!(result, Some(AttackResult::Whiffed));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_reeling_suppresses_attack() {
        let roster = roster_at(1.0);
        let events = EventBus::default();
        let mut queue = HitReactionQueue::default();
        queue.schedule(AI, 5, &events);

        let lenient = OpponentBrain::default();
        assert_eq!(
            lenient.decide(&roster, AI, PLAYER, 0.0, &queue),
            AiDecision::Engage { ready: true }
        );

        let strict = OpponentBrain::new(AiSettings {
            suppress_while_reeling: true,
            ..AiSettings::default()
        });
        assert_eq!(
            strict.decide(&roster, AI, PLAYER, 0.0, &queue),
            AiDecision::Engage { ready: false }
        );
    }

    #[test]
    fn test_random_attack_index_in_range() {
        let mut roster = roster_at(1.0);
        let brain = OpponentBrain::default();
        let mut rng = Rng::with_seed(99);
        let mut queue = HitReactionQueue::default();
        let events = EventBus::default();

        for n in 0..20u8 {
            let now = f32::from(n);
            brain.engage(&mut roster, AI, PLAYER, true, now, &mut rng, &mut queue, &events);
        }

        for event in events.drain() {
            if let FightEvent::AttackAccepted { attack_index, animation, .. } = event {
                assert!(attack_index < 4);
                assert!(animation.is_some());
            }
        }
    }
}

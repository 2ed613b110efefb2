//! Cooldown-gated attack resolution.
//!
//! An attack attempt is honored only when strictly more than the attacker's
//! cooldown has elapsed since its last accepted attack. An accepted attack
//! always consumes the cooldown, even when it whiffs or its animation index
//! is invalid. Targets are every active opponent whose center lies within
//! the attack radius; there is no facing or line-of-sight test.

use serde::{Deserialize, Serialize};
use sudofighter_common::CombatantId;
use tracing::{debug, info, warn};

use crate::events::{EventBus, FightEvent};
use crate::hit_reaction::HitReactionQueue;
use crate::roster::Roster;

/// Outcome of an attack attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttackResult {
    /// Rejected; nothing changed
    OnCooldown {
        /// Seconds of cooldown left
        remaining: f32,
    },
    /// Accepted with nobody in range
    Whiffed,
    /// Accepted and connected
    Landed {
        /// Struck combatants in scan order
        targets: Vec<CombatantId>,
    },
    /// Attacker unknown or inactive; nothing happened
    Ignored,
}

impl AttackResult {
    /// Returns whether the attempt consumed the cooldown.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Whiffed | Self::Landed { .. })
    }

    /// Number of struck combatants.
    #[must_use]
    pub fn target_count(&self) -> usize {
        match self {
            Self::Landed { targets } => targets.len(),
            _ => 0,
        }
    }

    /// Struck combatants.
    #[must_use]
    pub fn targets(&self) -> &[CombatantId] {
        match self {
            Self::Landed { targets } => targets,
            _ => &[],
        }
    }
}

/// Runs the cooldown gate, plays the attack animation and selects targets.
///
/// No hit reaction is scheduled; see [`try_attack`] for the full path.
pub fn resolve(
    roster: &mut Roster,
    attacker: CombatantId,
    attack_index: usize,
    opponents: &[CombatantId],
    now: f32,
    events: &EventBus,
) -> AttackResult {
    let Some(source) = roster.get(attacker).filter(|c| c.is_active()) else {
        return AttackResult::Ignored;
    };

    if !source.cooldown_ready(now) {
        let remaining = source.cooldown_remaining(now);
        debug!(%attacker, remaining, "Cool down, cannot perform any attack");
        events.publish(FightEvent::AttackRejected {
            attacker,
            remaining,
        });
        return AttackResult::OnCooldown { remaining };
    }

    let origin = source.position();
    let radius = source.attack_radius();
    let enemy = source.role().opposing();
    let animation = source.attack_animation(attack_index).map(str::to_owned);

    let targets: Vec<CombatantId> = opponents
        .iter()
        .copied()
        .filter(|&id| id != attacker)
        .filter(|&id| {
            roster
                .get(id)
                .is_some_and(|c| {
                    c.is_active() && c.role() == enemy && c.position().distance(origin) <= radius
                })
        })
        .collect();

    let Some((source, rig)) = roster.parts_mut(attacker) else {
        return AttackResult::Ignored;
    };
    source.mark_attack(now);
    match animation.as_deref() {
        Some(name) => rig.play(name),
        None => warn!(
            %attacker,
            attack_index,
            available = source.attack_animations().len(),
            "No attack animation for index"
        ),
    }

    info!(
        %attacker,
        attack_index,
        targets = targets.len(),
        at = now,
        "Attack accepted"
    );
    events.publish(FightEvent::AttackAccepted {
        attacker,
        attack_index,
        animation,
        targets: targets.clone(),
    });

    if targets.is_empty() {
        AttackResult::Whiffed
    } else {
        AttackResult::Landed { targets }
    }
}

/// Attempts an attack and schedules a hit reaction against every target.
pub fn try_attack(
    roster: &mut Roster,
    attacker: CombatantId,
    attack_index: usize,
    opponents: &[CombatantId],
    now: f32,
    reactions: &mut HitReactionQueue,
    events: &EventBus,
) -> AttackResult {
    let result = resolve(roster, attacker, attack_index, opponents, now, events);
    if let AttackResult::Landed { targets } = &result {
        let damage = roster.get(attacker).map_or(0, |c| c.damage_per_hit());
        for &target in targets {
            reactions.schedule(target, damage, events);
        }
    }
    result
}

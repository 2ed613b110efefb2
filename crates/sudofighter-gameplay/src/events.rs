//! Event bus for fight observers.
//!
//! Systems publish what happened during a tick; the engine drains the bus
//! for its match summary and tests drain it to assert on ordering.

use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};
use tracing::debug;

use sudofighter_common::{CombatantId, ReactionId};

use crate::arbiter::MatchOutcome;

/// Events published by the fight systems.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FightEvent {
    /// Attack attempt rejected because the cooldown has not elapsed
    AttackRejected {
        /// Attacking combatant
        attacker: CombatantId,
        /// Seconds of cooldown left
        remaining: f32,
    },
    /// Attack attempt accepted
    AttackAccepted {
        /// Attacking combatant
        attacker: CombatantId,
        /// Requested attack index
        attack_index: usize,
        /// Animation played, if the index was valid
        animation: Option<String>,
        /// Combatants within the attack radius
        targets: Vec<CombatantId>,
    },
    /// Hit reaction queued against a target
    HitScheduled {
        /// Reaction task
        reaction: ReactionId,
        /// Struck combatant
        target: CombatantId,
        /// Damage to apply
        damage: i32,
    },
    /// Hit reaction applied its damage
    HitApplied {
        /// Reaction task
        reaction: ReactionId,
        /// Struck combatant
        target: CombatantId,
        /// Damage applied
        damage: i32,
        /// Health after the hit
        current_hp: i32,
    },
    /// Target crossed the low-health threshold
    LowHealth {
        /// Combatant concerned
        target: CombatantId,
        /// Health after the hit
        current_hp: i32,
    },
    /// Target's health reached zero or below
    Downed {
        /// Combatant concerned
        target: CombatantId,
    },
    /// In-flight reactions dropped because their target was deactivated
    ReactionsCancelled {
        /// Deactivated combatant
        target: CombatantId,
        /// Number of dropped tasks
        count: usize,
    },
    /// Match reached a terminal outcome
    OutcomeResolved {
        /// Terminal outcome
        outcome: MatchOutcome,
    },
}

/// Event bus for broadcasting fight events.
#[derive(Debug)]
pub struct EventBus {
    /// Sender for broadcasting events
    sender: Sender<FightEvent>,
    /// Receiver for collecting events
    receiver: Receiver<FightEvent>,
    /// Channel capacity
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl EventBus {
    /// Creates a new event bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Publishes an event to the bus.
    ///
    /// Never blocks. When the bus is full the event is dropped.
    pub fn publish(&self, event: FightEvent) {
        if self.sender.try_send(event).is_err() {
            debug!(capacity = self.capacity, "Event bus full, dropping event");
        }
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<FightEvent> {
        self.receiver.try_iter().collect()
    }

    /// Returns the number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Returns the channel capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_drain_in_order() {
        let bus = EventBus::new(8);
        bus.publish(FightEvent::Downed {
            target: CombatantId::new(0),
        });
        bus.publish(FightEvent::OutcomeResolved {
            outcome: MatchOutcome::PlayerLost,
        });

        assert_eq!(bus.pending_count(), 2);
        let events = bus.drain();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], FightEvent::Downed { .. }));
        assert_eq!(bus.pending_count(), 0);
    }

    #[test]
    fn test_full_bus_drops_events() {
        let bus = EventBus::new(1);
        for _ in 0..3 {
            bus.publish(FightEvent::Downed {
                target: CombatantId::new(0),
            });
        }
        assert_eq!(bus.drain().len(), 1);
        assert_eq!(bus.capacity(), 1);
    }
}

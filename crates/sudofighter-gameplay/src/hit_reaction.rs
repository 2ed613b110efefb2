//! Hit reaction pipeline.
//!
//! Every landed hit becomes a [`HitReactionTask`]: a small resumable state
//! machine that starts controller feedback, waits a fixed delay of scaled
//! time, then applies the damage and its cues. Tasks live in a
//! [`HitReactionQueue`] that the match drains once per tick, so a waiting
//! task never blocks the tick loop.
//!
//! Steps after the delay, in order:
//! 1. random hit sound at the target's position
//! 2. unconditional health decrement (no clamping)
//! 3. health display update
//! 4. low-health light, once per combatant
//! 5. death notification
//! 6. hit animation
//! 7. feedback stop
//!
//! Any step whose collaborator is missing is skipped.

use fastrand::Rng;
use serde::{Deserialize, Serialize};
use sudofighter_common::{CombatantId, ReactionId};
use tracing::{debug, info, trace};

use crate::config::{ReactionOverlap, ReactionSettings};
use crate::events::{EventBus, FightEvent};
use crate::presentation::{LightColor, Stage};
use crate::roster::Roster;

/// Animation played on a combatant that was hit.
pub const HIT_REACTION_ANIMATION: &str = "HitDamageAnimation";

/// Progress of a reaction task.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ReactionStep {
    /// Scheduled, feedback not started yet
    Pending,
    /// Feedback running, waiting for the delay to elapse
    Waiting {
        /// Simulation time at which the hit resolves
        until: f32,
    },
    /// Finished or dropped
    Done,
}

/// One in-flight hit reaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitReactionTask {
    id: ReactionId,
    target: CombatantId,
    damage: i32,
    step: ReactionStep,
}

impl HitReactionTask {
    /// Returns the task id.
    #[must_use]
    pub fn id(&self) -> ReactionId {
        self.id
    }

    /// Returns the struck combatant.
    #[must_use]
    pub fn target(&self) -> CombatantId {
        self.target
    }

    /// Returns the damage this task applies.
    #[must_use]
    pub fn damage(&self) -> i32 {
        self.damage
    }

    /// Returns the current step.
    #[must_use]
    pub fn step(&self) -> ReactionStep {
        self.step
    }
}

/// Queue of in-flight hit reactions.
#[derive(Debug, Clone)]
pub struct HitReactionQueue {
    tasks: Vec<HitReactionTask>,
    next_id: ReactionId,
    settings: ReactionSettings,
}

impl Default for HitReactionQueue {
    fn default() -> Self {
        Self::new(ReactionSettings::default())
    }
}

impl HitReactionQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new(settings: ReactionSettings) -> Self {
        Self {
            tasks: Vec::new(),
            next_id: ReactionId::new(1),
            settings,
        }
    }

    /// Returns the number of in-flight tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns whether no task is in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Returns the in-flight tasks in scheduling order.
    #[must_use]
    pub fn tasks(&self) -> &[HitReactionTask] {
        &self.tasks
    }

    /// Number of in-flight tasks against a target.
    #[must_use]
    pub fn in_flight_for(&self, target: CombatantId) -> usize {
        self.tasks.iter().filter(|t| t.target == target).count()
    }

    /// Queues a reaction against `target`. It starts on the next drain.
    pub fn schedule(&mut self, target: CombatantId, damage: i32, events: &EventBus) -> ReactionId {
        let id = self.next_id;
        self.next_id = id.next();
        self.tasks.push(HitReactionTask {
            id,
            target,
            damage,
            step: ReactionStep::Pending,
        });
        trace!(reaction = id.raw(), combatant = %target, damage, "Scheduled hit reaction");
        events.publish(FightEvent::HitScheduled {
            reaction: id,
            target,
            damage,
        });
        id
    }

    /// Drops every task against `target`; returns how many were dropped.
    pub fn cancel_for(&mut self, target: CombatantId, events: &EventBus) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.target != target);
        let count = before - self.tasks.len();
        if count > 0 {
            debug!(combatant = %target, count, "Cancelled hit reactions");
            events.publish(FightEvent::ReactionsCancelled { target, count });
        }
        count
    }

    /// Advances every task as far as `now` allows; returns how many finished.
    pub fn drain(
        &mut self,
        now: f32,
        roster: &mut Roster,
        stage: &mut Stage,
        rng: &mut Rng,
        events: &EventBus,
    ) -> usize {
        let settings = &self.settings;
        let mut busy: Vec<CombatantId> = Vec::new();

        for task in &mut self.tasks {
            if settings.overlap == ReactionOverlap::Serialize && busy.contains(&task.target) {
                continue;
            }
            advance(task, now, settings, roster, stage, rng, events);
            if task.step != ReactionStep::Done {
                busy.push(task.target);
            }
        }

        let before = self.tasks.len();
        self.tasks.retain(|t| t.step != ReactionStep::Done);
        before - self.tasks.len()
    }
}

/// Runs a task's steps until it has to wait or is done.
fn advance(
    task: &mut HitReactionTask,
    now: f32,
    settings: &ReactionSettings,
    roster: &mut Roster,
    stage: &mut Stage,
    rng: &mut Rng,
    events: &EventBus,
) {
    loop {
        let Some((target, rig)) = roster.parts_mut(task.target) else {
            task.step = ReactionStep::Done;
            return;
        };
        if !target.is_active() {
            task.step = ReactionStep::Done;
            return;
        }

        match task.step {
            ReactionStep::Pending => {
                rig.start_vibration(settings.vibration_low, settings.vibration_high);
                task.step = ReactionStep::Waiting {
                    until: now + settings.delay,
                };
            },
            ReactionStep::Waiting { until } if now >= until => {
                if let Some(clip) = pick_clip(target.hit_sounds(), rng) {
                    stage.play_clip_at(clip, target.position());
                }

                let current_hp = target.take_damage(task.damage);
                rig.set_health(current_hp);
                events.publish(FightEvent::HitApplied {
                    reaction: task.id,
                    target: task.target,
                    damage: task.damage,
                    current_hp,
                });

                if current_hp <= settings.low_health_threshold && !target.low_health_signalled() {
                    target.mark_low_health_signalled();
                    rig.set_light(LightColor::RED);
                    events.publish(FightEvent::LowHealth {
                        target: task.target,
                        current_hp,
                    });
                }

                if current_hp <= 0 {
                    info!(
                        combatant = %task.target,
                        name = target.name(),
                        role = target.role().label(),
                        current_hp,
                        "Combatant died"
                    );
                    events.publish(FightEvent::Downed {
                        target: task.target,
                    });
                }

                rig.play(HIT_REACTION_ANIMATION);
                rig.stop_vibration();
                task.step = ReactionStep::Done;
            },
            ReactionStep::Waiting { .. } | ReactionStep::Done => return,
        }
    }
}

fn pick_clip<'a>(clips: &'a [String], rng: &mut Rng) -> Option<&'a str> {
    if clips.is_empty() {
        return None;
    }
    clips
        .get(rng.usize(..clips.len()))
        .map(String::as_str)
        .filter(|clip| !clip.is_empty())
}

//! Match session and tick loop.
//!
//! A [`Match`] owns the roster, the reaction queue, the AI, the arbiter and
//! the clock. Each [`Match::tick`] runs the phases in a fixed order for
//! every combatant:
//!
//! 1. decision/attack: player attacks, then AI decisions
//! 2. movement: player walk and dodge, then AI approach
//! 3. hit reactions advance
//! 4. outcome arbitration
//!
//! Arbitration runs every tick, even when the clock is frozen or the match
//! is already over, so a knockout is never missed.

use fastrand::Rng;
use glam::Vec3;
use sudofighter_common::{CombatantId, RosterError};
use tracing::{debug, info};

use crate::ai::{AiDecision, OpponentBrain};
use crate::arbiter::{MatchOutcome, OutcomeArbiter};
use crate::attack::{self, AttackResult};
use crate::clock::{Clock, SimClock};
use crate::combatant::Role;
use crate::config::FightConfig;
use crate::events::EventBus;
use crate::hit_reaction::HitReactionQueue;
use crate::player::{self, PlayerIntent};
use crate::presentation::{CombatantRig, Stage};
use crate::roster::Roster;
use crate::selection::CharacterSelection;

/// Summary of one tick.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickReport {
    /// Attack attempts made this tick, in resolution order
    pub attacks: Vec<(CombatantId, AttackResult)>,
    /// Hit reactions that finished this tick
    pub reactions_finished: usize,
    /// Outcome after arbitration
    pub outcome: MatchOutcome,
}

/// A running fight.
#[derive(Debug)]
pub struct Match<C: Clock = SimClock> {
    roster: Roster,
    players: Vec<CombatantId>,
    opponents: Vec<CombatantId>,
    reactions: HitReactionQueue,
    brain: OpponentBrain,
    arbiter: OutcomeArbiter,
    stage: Stage,
    rng: Rng,
    events: EventBus,
    clock: C,
}

impl Match<SimClock> {
    /// Creates a match driven by a fresh [`SimClock`].
    #[must_use]
    pub fn with_sim_clock(config: FightConfig) -> Self {
        Self::new(config, SimClock::new())
    }
}

impl<C: Clock> Match<C> {
    /// Creates a match from its configuration.
    #[must_use]
    pub fn new(mut config: FightConfig, clock: C) -> Self {
        config.validate();
        let roster = Roster::from_configs(&config.combatants);
        let players = roster.ids_with_role(Role::Player);
        let opponents = roster.ids_with_role(Role::OpponentAi);
        let rng = config.seed.map_or_else(Rng::new, Rng::with_seed);

        info!(
            players = players.len(),
            opponents = opponents.len(),
            seed = ?config.seed,
            "Match created"
        );

        Self {
            roster,
            players,
            opponents,
            reactions: HitReactionQueue::new(config.reaction),
            brain: OpponentBrain::new(config.ai),
            arbiter: OutcomeArbiter::new(),
            stage: Stage::new(),
            rng,
            events: EventBus::default(),
            clock,
        }
    }

    /// Returns the roster.
    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Returns the player-role combatant ids.
    #[must_use]
    pub fn players(&self) -> &[CombatantId] {
        &self.players
    }

    /// Returns the AI-role combatant ids.
    #[must_use]
    pub fn opponents(&self) -> &[CombatantId] {
        &self.opponents
    }

    /// Returns the in-flight hit reactions.
    #[must_use]
    pub fn reactions(&self) -> &HitReactionQueue {
        &self.reactions
    }

    /// Returns the event bus.
    ///
    /// The bus is bounded (see [`EventBus::capacity`]). Once it is full,
    /// newly published events are dropped until the caller drains it, so a
    /// driver that wants every event must call [`EventBus::drain`] each
    /// tick. [`Match::outcome`] stays authoritative either way.
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Returns the clock.
    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Returns the clock mutably.
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Returns the current outcome.
    #[must_use]
    pub fn outcome(&self) -> MatchOutcome {
        self.arbiter.outcome()
    }

    /// Returns whether the clock is frozen.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.clock.is_frozen()
    }

    /// Installs collaborators for a combatant.
    pub fn attach_rig(&mut self, id: CombatantId, rig: CombatantRig) -> Result<(), RosterError> {
        self.roster.attach_rig(id, rig)
    }

    /// Installs match-wide collaborators.
    pub fn set_stage(&mut self, stage: Stage) {
        self.stage = stage;
    }

    /// Advances the match by `real_dt` unscaled seconds.
    ///
    /// `intent` drives every active player-role combatant.
    pub fn tick(&mut self, real_dt: f32, intent: &PlayerIntent) -> TickReport {
        self.clock.advance(real_dt);
        let mut report = TickReport::default();

        if !self.arbiter.outcome().is_terminal() && !self.clock.is_frozen() {
            let now = self.clock.now();
            let dt = self.clock.delta();

            let approaches = self.decision_phase(now, intent, &mut report);
            self.movement_phase(dt, intent, &approaches);
            report.reactions_finished = self.reactions.drain(
                now,
                &mut self.roster,
                &mut self.stage,
                &mut self.rng,
                &self.events,
            );
        }

        report.outcome =
            self.arbiter
                .evaluate(&self.roster, &mut self.clock, &mut self.stage, &self.events);
        report
    }

    fn decision_phase(
        &mut self,
        now: f32,
        intent: &PlayerIntent,
        report: &mut TickReport,
    ) -> Vec<(CombatantId, Vec3)> {
        if let Some(attack_index) = intent.attack {
            for &id in &self.players {
                if !self.roster.get(id).is_some_and(|c| c.is_active()) {
                    continue;
                }
                let result = attack::try_attack(
                    &mut self.roster,
                    id,
                    attack_index,
                    &self.opponents,
                    now,
                    &mut self.reactions,
                    &self.events,
                );
                report.attacks.push((id, result));
            }
        }

        let mut approaches = Vec::new();
        for &ai in &self.opponents {
            for &target in &self.players {
                match self.brain.decide(&self.roster, ai, target, now, &self.reactions) {
                    AiDecision::Idle => {},
                    AiDecision::Approach { direction } => approaches.push((ai, direction)),
                    AiDecision::Engage { ready } => {
                        if let Some(result) = self.brain.engage(
                            &mut self.roster,
                            ai,
                            target,
                            ready,
                            now,
                            &mut self.rng,
                            &mut self.reactions,
                            &self.events,
                        ) {
                            report.attacks.push((ai, result));
                        }
                    },
                }
            }
        }
        approaches
    }

    fn movement_phase(&mut self, dt: f32, intent: &PlayerIntent, approaches: &[(CombatantId, Vec3)]) {
        for &id in &self.players {
            player::apply_movement(&mut self.roster, id, intent.move_axis, dt);
            if let Some(direction) = intent.dodge {
                player::dodge(&mut self.roster, id, direction);
            }
        }
        for &(ai, direction) in approaches {
            self.brain.approach(&mut self.roster, ai, direction, dt);
        }
    }

    /// Activates or deactivates a combatant.
    ///
    /// Deactivation cancels the combatant's in-flight hit reactions and
    /// stops its controller vibration.
    pub fn set_active(&mut self, id: CombatantId, active: bool) -> Result<(), RosterError> {
        let (combatant, rig) = self.roster.parts_mut(id).ok_or(RosterError::NotFound(id))?;
        if combatant.is_active() == active {
            return Ok(());
        }
        combatant.set_active(active);
        if !active {
            rig.set_walking(false);
            rig.stop_vibration();
            self.reactions.cancel_for(id, &self.events);
        }
        debug!(%id, active, "Combatant activation changed");
        Ok(())
    }

    /// Activates only the selected player-role combatant.
    pub fn apply_selection(
        &mut self,
        selection: &CharacterSelection,
    ) -> Result<CombatantId, RosterError> {
        let Some(&first) = self.players.first() else {
            return Err(RosterError::MissingRole(Role::Player.label()));
        };
        let chosen = self.players.get(selection.index()).copied().unwrap_or(first);

        for id in self.players.clone() {
            self.set_active(id, id == chosen)?;
        }
        info!(%chosen, "Character selected");
        Ok(chosen)
    }

    /// Freezes the simulation.
    pub fn pause(&mut self) {
        self.clock.set_time_scale(0.0);
        debug!("Match paused");
    }

    /// Unfreezes the simulation unless the match is over.
    pub fn resume(&mut self) {
        if self.outcome().is_terminal() {
            return;
        }
        self.clock.set_time_scale(1.0);
        debug!("Match resumed");
    }

    /// Deactivates every combatant.
    pub fn teardown(&mut self) {
        let ids: Vec<CombatantId> = self.roster.iter().map(|c| c.id()).collect();
        for id in ids {
            // ids come from the roster itself
            let _ = self.set_active(id, false);
        }
        debug!("Match torn down");
    }

    /// Restores normal time and tears the match down.
    pub fn return_to_menu(&mut self) {
        self.clock.set_time_scale(1.0);
        self.teardown();
        info!("Returned to main menu");
    }
}

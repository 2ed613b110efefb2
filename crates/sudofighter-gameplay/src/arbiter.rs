//! Match outcome arbitration.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::clock::Clock;
use crate::combatant::Role;
use crate::events::{EventBus, FightEvent};
use crate::presentation::Stage;
use crate::roster::Roster;

/// Terminal state of a match. Written once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    /// Still being fought
    #[default]
    Ongoing,
    /// An opponent went down first
    PlayerWon,
    /// A player-role combatant went down
    PlayerLost,
}

impl MatchOutcome {
    /// Returns whether the match is over.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Ongoing)
    }

    /// Text shown on the result screen.
    #[must_use]
    pub const fn result_text(self) -> Option<&'static str> {
        match self {
            Self::Ongoing => None,
            Self::PlayerWon => Some("You Won!"),
            Self::PlayerLost => Some("You Lost"),
        }
    }
}

impl std::fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Ongoing => "ongoing",
            Self::PlayerWon => "player won",
            Self::PlayerLost => "player lost",
        };
        f.write_str(label)
    }
}

/// Detects and finalizes the match outcome.
///
/// Player-role combatants are scanned before opponents, so a mutual knockout
/// within one tick resolves to [`MatchOutcome::PlayerLost`].
#[derive(Debug, Clone, Default)]
pub struct OutcomeArbiter {
    outcome: MatchOutcome,
}

impl OutcomeArbiter {
    /// Creates an arbiter for an ongoing match.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current outcome.
    #[must_use]
    pub fn outcome(&self) -> MatchOutcome {
        self.outcome
    }

    /// Computes what the outcome would be from the roster alone.
    #[must_use]
    pub fn scan(roster: &Roster) -> MatchOutcome {
        let downed = |role: Role| {
            roster
                .iter()
                .any(|c| c.role() == role && c.is_active() && !c.is_alive())
        };

        if downed(Role::Player) {
            MatchOutcome::PlayerLost
        } else if downed(Role::OpponentAi) {
            MatchOutcome::PlayerWon
        } else {
            MatchOutcome::Ongoing
        }
    }

    /// Scans the roster and finalizes the first terminal outcome.
    ///
    /// On resolution the clock is frozen, the result is shown and an
    /// [`FightEvent::OutcomeResolved`] is published. Once resolved, further
    /// calls return the stored outcome without side effects.
    pub fn evaluate<C: Clock + ?Sized>(
        &mut self,
        roster: &Roster,
        clock: &mut C,
        stage: &mut Stage,
        events: &EventBus,
    ) -> MatchOutcome {
        if self.outcome.is_terminal() {
            return self.outcome;
        }

        let outcome = Self::scan(roster);
        if !outcome.is_terminal() {
            return outcome;
        }

        self.outcome = outcome;
        clock.set_time_scale(0.0);
        if let Some(text) = outcome.result_text() {
            stage.show_result(text);
        }
        info!(%outcome, at = clock.now(), "Match concluded");
        events.publish(FightEvent::OutcomeResolved { outcome });
        outcome
    }
}

//! Error types for SudoFighter.

use thiserror::Error;

use crate::ids::CombatantId;

/// Top-level error type for SudoFighter operations.
#[derive(Debug, Error)]
pub enum FighterError {
    /// Roster lookup errors
    #[error("Roster error: {0}")]
    Roster(#[from] RosterError),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Schema version mismatch
    #[error("Schema version mismatch: expected {expected}, got {actual}")]
    VersionMismatch {
        /// Expected version
        expected: String,
        /// Actual version found
        actual: String,
    },
}

/// Errors raised when addressing combatants in a roster.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    /// Combatant id does not exist in the roster
    #[error("combatant not found: {0}")]
    NotFound(CombatantId),

    /// The roster has no combatants
    #[error("roster is empty")]
    Empty,

    /// The roster has no combatant with the requested role
    #[error("roster has no {0} combatant")]
    MissingRole(&'static str),
}

/// Result type alias for SudoFighter operations.
pub type FighterResult<T> = Result<T, FighterError>;

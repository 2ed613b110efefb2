//! # SudoFighter Gameplay
//!
//! Fight simulation core for SudoFighter.
//!
//! This crate decides, tick by tick, what happens in a two-sided fight:
//! - Combatants and the roster arena that owns them
//! - Cooldown-gated attack resolution with radius-based targeting
//! - Deferred hit reactions (feedback, damage, cues) on a task queue
//! - Opponent AI that approaches and attacks
//! - Player controller for walking and dodging
//! - Match outcome arbitration
//! - Character selection with a persisted index
//! - Presentation collaborator traits (animation, audio, haptics, UI)
//! - Event bus for observers

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod ai;
pub mod arbiter;
pub mod attack;
pub mod clock;
pub mod combatant;
pub mod config;
pub mod events;
pub mod hit_reaction;
mod locomotion;
pub mod player;
pub mod presentation;
pub mod roster;
pub mod selection;
pub mod session;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::ai::*;
    pub use crate::arbiter::*;
    pub use crate::attack::*;
    pub use crate::clock::*;
    pub use crate::combatant::*;
    pub use crate::config::*;
    pub use crate::events::*;
    pub use crate::hit_reaction::*;
    pub use crate::player::*;
    pub use crate::presentation::*;
    pub use crate::roster::*;
    pub use crate::selection::*;
    pub use crate::session::*;
}

pub use prelude::*;

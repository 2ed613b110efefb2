//! # SudoFighter Common
//!
//! Common types, utilities, and shared abstractions for SudoFighter.
//!
//! This crate provides foundational types used by the simulation core and
//! the engine driver:
//! - Combatant identifiers (arena indices)
//! - Vector and rotation helpers on top of `glam`
//! - Version information for configuration schemas
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod ids;
pub mod math;
pub mod version;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::ids::*;
    pub use crate::math::*;
    pub use crate::version::*;
}

pub use prelude::*;

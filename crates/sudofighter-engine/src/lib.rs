//! SudoFighter Engine - headless driver for the fighting-game core.
//!
//! This crate wires the simulation in `sudofighter-gameplay` to the outside
//! world: configuration files, the persisted character selection, logging
//! presentation adapters, a scripted player and the fixed-rate tick loop.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

/// Match setup and the tick loop
pub mod app;
/// Engine configuration file
pub mod config;
/// Tracing-backed presentation collaborators
pub mod presentation;
/// Scripted player input
pub mod script;
/// File-backed character selection
pub mod selection_store;
/// Fixed timestep accounting
pub mod timing;

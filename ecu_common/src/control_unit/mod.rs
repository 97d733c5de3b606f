//! Control Unit shared types.
//!
//! All types shared between the torque control component, its observers,
//! and the CLI live here: lifecycle state, subsystem identifiers, errors
//! and fault flags, control events, and configuration structures.

pub mod config;
pub mod error;
pub mod event;
pub mod state;

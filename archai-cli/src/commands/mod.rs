//! Subcommand implementations.

pub mod classify;
pub mod feedback;
pub mod styles;

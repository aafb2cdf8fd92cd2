//! Subcommand implementations.

pub mod provision;
pub mod vars;

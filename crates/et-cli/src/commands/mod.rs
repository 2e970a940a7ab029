//! CLI subcommand implementations.

pub mod elapsed;
pub mod replay;
pub mod status;

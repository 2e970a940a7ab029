//! Editing timer CLI library.
//!
//! Integration layer between recorded host events, the core tracker and the
//! document property store.

mod cli;
pub mod commands;
mod config;
pub mod host;
pub mod prompt;

pub use cli::{Cli, Commands};
pub use config::{Config, IdleMode};

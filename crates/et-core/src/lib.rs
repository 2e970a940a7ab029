//! Core editing-time accounting.
//!
//! This crate contains:
//! - Session timers: per-document stopwatches that separate active editing
//!   from idle gaps
//! - The timer registry: one timer per open document, rekeyed on save-as
//! - The document lifecycle interface the host integration drives
//!
//! Nothing here performs I/O. Persisting totals and asking the user about
//! idle gaps belong to the integration layer.

pub mod clock;
mod display;
pub mod policy;
mod registry;
mod session_timer;
mod tracker;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use display::format_elapsed;
pub use policy::{DEFAULT_IDLE_THRESHOLD, TrackingPolicy};
pub use registry::TimerRegistry;
pub use session_timer::{SessionTimer, duration_from_seconds};
pub use tracker::{DocumentEvents, EditingTracker, IdleAnswer, IdlePrompt};
pub use types::{DocumentKey, ValidationError};

//! Replays recorded host events against the editing tracker.
//!
//! A host event log is JSONL, one document lifecycle event per line:
//!
//! ```text
//! {"at":"2025-01-01T09:00:00Z","event":"opened","document":"/docs/a.xlsx"}
//! {"at":"2025-01-01T09:01:00Z","event":"changed","document":"/docs/a.xlsx"}
//! {"at":"2025-01-01T09:02:00Z","event":"before_save","document":"/docs/a.xlsx"}
//! {"at":"2025-01-01T09:02:00Z","event":"after_save","document":"/docs/b.xlsx","previous":"/docs/a.xlsx"}
//! {"at":"2025-01-01T09:03:00Z","event":"closing","document":"/docs/b.xlsx"}
//! ```
//!
//! Time is virtual: before each event the tracker's clock is set to the
//! event's offset from the first event.

use std::collections::{BTreeMap, HashMap};
use std::io::BufRead;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use et_core::{
    DocumentEvents, DocumentKey, EditingTracker, IdlePrompt, ManualClock, TrackingPolicy,
};
use et_db::Database;
use serde::Deserialize;
use thiserror::Error;

/// Problems with the event log itself.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("line {line}: invalid event: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("line {line}: event at {at} is earlier than the previous event at {previous}")]
    OutOfOrder {
        line: usize,
        at: DateTime<Utc>,
        previous: DateTime<Utc>,
    },
}

/// A recorded host event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HostEvent {
    pub at: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: HostEventKind,
}

/// Document lifecycle notifications as the host reports them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEventKind {
    Opened { document: DocumentKey },
    Changed { document: DocumentKey },
    BeforeSave { document: DocumentKey },
    /// `previous` differs from `document` after a save-as.
    AfterSave {
        document: DocumentKey,
        #[serde(default)]
        previous: Option<DocumentKey>,
    },
    Closing { document: DocumentKey },
}

/// Reads a host event log, skipping blank lines. Returns `(line, event)` pairs.
pub fn read_events<R: BufRead>(reader: R) -> Result<Vec<(usize, HostEvent)>> {
    let mut events = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.with_context(|| format!("failed to read line {line_number}"))?;
        if line.trim().is_empty() {
            continue;
        }
        let event = serde_json::from_str(&line).map_err(|source| ReplayError::Parse {
            line: line_number,
            source,
        })?;
        events.push((line_number, event));
    }
    Ok(events)
}

/// Plays the host's part: owns the open documents' pending properties and
/// writes them to the store when a save completes.
pub struct ReplayHost<'db, P: IdlePrompt> {
    db: &'db mut Database,
    clock: ManualClock,
    tracker: EditingTracker<ManualClock, P>,
    origin: Option<DateTime<Utc>>,
    previous_at: Option<DateTime<Utc>>,
    /// Totals written into open documents, not yet saved to disk.
    pending: HashMap<DocumentKey, f64>,
    saved: BTreeMap<DocumentKey, f64>,
}

impl<'db, P: IdlePrompt> ReplayHost<'db, P> {
    pub fn new(db: &'db mut Database, policy: TrackingPolicy, prompt: P) -> Self {
        let clock = ManualClock::new();
        let tracker = EditingTracker::new(clock.clone(), policy, prompt);
        Self {
            db,
            clock,
            tracker,
            origin: None,
            previous_at: None,
            pending: HashMap::new(),
            saved: BTreeMap::new(),
        }
    }

    /// Moves the virtual clock to `at`.
    fn advance_to(&mut self, line: usize, at: DateTime<Utc>) -> Result<(), ReplayError> {
        if let Some(previous) = self.previous_at {
            if at < previous {
                return Err(ReplayError::OutOfOrder { line, at, previous });
            }
        }
        let origin = *self.origin.get_or_insert(at);
        // Non-negative: `at` is never earlier than the first event.
        let offset = (at - origin).to_std().unwrap_or_default();
        self.clock.set(offset);
        self.previous_at = Some(at);
        Ok(())
    }

    /// Applies one event from line `line` of the log.
    pub fn apply(&mut self, line: usize, event: &HostEvent) -> Result<()> {
        self.advance_to(line, event.at)?;

        match &event.kind {
            HostEventKind::Opened { document } => {
                // Read only; the store is written when a save completes.
                let stored = if self.tracker.policy().should_track(document) {
                    self.db
                        .elapsed_seconds(document.as_str())
                        .with_context(|| format!("failed to read stored time for {document}"))?
                } else {
                    None
                };
                self.tracker.on_opened(document, stored);
            }
            HostEventKind::Changed { document } => self.tracker.on_changed(document),
            HostEventKind::BeforeSave { document } => {
                if let Some(total) = self.tracker.on_before_save(document) {
                    self.pending.insert(document.clone(), total);
                }
            }
            HostEventKind::AfterSave { document, previous } => {
                let previous = previous.as_ref().unwrap_or(document);
                if let Some(total) = self.pending.remove(previous) {
                    self.db
                        .set_elapsed_seconds(document.as_str(), total)
                        .with_context(|| format!("failed to store time for {document}"))?;
                    self.saved.insert(document.clone(), total);
                }
                self.tracker.on_after_save(document, previous);
            }
            HostEventKind::Closing { document } => {
                if self.pending.remove(document).is_some() {
                    tracing::debug!(%document, "discarding unsaved editing time");
                }
                self.tracker.on_closing(document);
            }
        }
        Ok(())
    }

    /// Totals written to the store during this replay, by document.
    pub fn saved(&self) -> &BTreeMap<DocumentKey, f64> {
        &self.saved
    }

    /// Documents still tracked (opened and not closed).
    pub fn open_documents(&self) -> usize {
        self.tracker.registry().len()
    }
}

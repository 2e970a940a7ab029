//! Host-facing document lifecycle interface.
//!
//! The integration layer translates whatever the host application emits into
//! calls on [`DocumentEvents`]. [`EditingTracker`] implements it on top of a
//! [`TimerRegistry`], a [`TrackingPolicy`] and an [`IdlePrompt`] that stands
//! in for the host's yes/no dialog.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::display::format_elapsed;
use crate::policy::TrackingPolicy;
use crate::registry::TimerRegistry;
use crate::session_timer::duration_from_seconds;
use crate::types::DocumentKey;

/// Document lifecycle notifications delivered by the host.
///
/// All methods are no-ops for documents that are not tracked.
pub trait DocumentEvents {
    /// A document was opened or created. `stored_elapsed_seconds` is the
    /// total persisted in the document, if any.
    ///
    /// Returns whether the document is tracked.
    fn on_opened(&mut self, key: &DocumentKey, stored_elapsed_seconds: Option<f64>) -> bool;

    /// The document's content changed.
    fn on_changed(&mut self, key: &DocumentKey);

    /// The document is about to be saved. Returns the total to persist into
    /// the document before the save completes.
    fn on_before_save(&mut self, key: &DocumentKey) -> Option<f64>;

    /// The document was saved as `key`; it was known as `old_key` before.
    fn on_after_save(&mut self, key: &DocumentKey, old_key: &DocumentKey);

    /// The document is closing.
    fn on_closing(&mut self, key: &DocumentKey);

    /// Persisted editing time formatted as `m:ss`, `0:00` when untracked.
    fn elapsed_display(&self, key: &DocumentKey) -> String;
}

/// Asks whether an idle gap should count as editing time.
pub trait IdlePrompt {
    /// Returns `true` to include `gap`, `false` to exclude it.
    fn include_idle_gap(&mut self, gap: Duration) -> bool;
}

impl<F> IdlePrompt for F
where
    F: FnMut(Duration) -> bool,
{
    fn include_idle_gap(&mut self, gap: Duration) -> bool {
        self(gap)
    }
}

/// A fixed answer to every idle prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdleAnswer {
    Include,
    Exclude,
}

impl IdlePrompt for IdleAnswer {
    fn include_idle_gap(&mut self, _gap: Duration) -> bool {
        matches!(self, Self::Include)
    }
}

/// Tracks editing time for every open document.
///
/// Owned by the integration layer; there is no process-wide instance.
#[derive(Debug)]
pub struct EditingTracker<C: Clock + Clone, P: IdlePrompt> {
    registry: TimerRegistry<C>,
    policy: TrackingPolicy,
    prompt: P,
}

impl<C: Clock + Clone, P: IdlePrompt> EditingTracker<C, P> {
    pub fn new(clock: C, policy: TrackingPolicy, prompt: P) -> Self {
        Self {
            registry: TimerRegistry::new(clock),
            policy,
            prompt,
        }
    }

    pub fn registry(&self) -> &TimerRegistry<C> {
        &self.registry
    }

    pub fn policy(&self) -> &TrackingPolicy {
        &self.policy
    }

    /// Persisted editing time for `key`, if tracked.
    pub fn elapsed(&self, key: &DocumentKey) -> Option<Duration> {
        self.registry.get(key).map(crate::SessionTimer::elapsed)
    }
}

impl<C: Clock + Clone, P: IdlePrompt> DocumentEvents for EditingTracker<C, P> {
    fn on_opened(&mut self, key: &DocumentKey, stored_elapsed_seconds: Option<f64>) -> bool {
        if !self.policy.should_track(key) {
            tracing::debug!(document = %key, "document excluded from tracking");
            return false;
        }
        let initial = duration_from_seconds(stored_elapsed_seconds.unwrap_or(0.0));
        self.registry.track(key.clone(), initial);
        true
    }

    fn on_changed(&mut self, key: &DocumentKey) {
        let Some(timer) = self.registry.get_mut(key) else {
            return;
        };
        if !timer.is_idle_exceeded(self.policy.idle_threshold) {
            timer.record_activity();
            return;
        }

        let gap = timer.time_since_last_activity();
        tracing::debug!(
            document = %key,
            gap = %format_elapsed(gap),
            "idle threshold exceeded"
        );
        if self.prompt.include_idle_gap(gap) {
            tracing::info!(document = %key, gap_secs = gap.as_secs_f64(), "idle gap included");
            timer.resolve_idle_as_active();
        } else {
            tracing::info!(document = %key, gap_secs = gap.as_secs_f64(), "idle gap excluded");
            timer.resolve_idle_as_excluded();
        }
    }

    fn on_before_save(&mut self, key: &DocumentKey) -> Option<f64> {
        if !self.registry.is_tracked(key) {
            return None;
        }
        // Bring the timer up to date first, including any idle decision.
        self.on_changed(key);
        let total = self.registry.get_mut(key)?.checkpoint_seconds();
        tracing::debug!(document = %key, total_secs = total, "checkpointed editing time");
        Some(total)
    }

    fn on_after_save(&mut self, key: &DocumentKey, old_key: &DocumentKey) {
        if key != old_key {
            self.registry.rekey(old_key, key.clone());
        }
    }

    fn on_closing(&mut self, key: &DocumentKey) {
        self.registry.untrack(key);
    }

    fn elapsed_display(&self, key: &DocumentKey) -> String {
        format_elapsed(self.elapsed(key).unwrap_or_default())
    }
}

//! Registry of session timers for open documents.
//!
//! Absent keys mean "not tracked": every operation on an absent key is a
//! no-op or returns `None`. This is how blacklisted documents are ignored
//! throughout.

use std::collections::HashMap;
use std::time::Duration;

use crate::clock::Clock;
use crate::session_timer::SessionTimer;
use crate::types::DocumentKey;

/// One [`SessionTimer`] per tracked document.
#[derive(Debug)]
pub struct TimerRegistry<C: Clock + Clone> {
    clock: C,
    timers: HashMap<DocumentKey, SessionTimer<C>>,
}

impl<C: Clock + Clone> TimerRegistry<C> {
    /// Creates an empty registry whose timers read `clock`.
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            timers: HashMap::new(),
        }
    }

    /// Starts tracking `key`, seeded with `initial_elapsed`.
    ///
    /// An existing timer for `key` is stopped and replaced. That should not
    /// happen when the host reports lifecycle events correctly, so it is
    /// logged.
    pub fn track(&mut self, key: DocumentKey, initial_elapsed: Duration) -> &mut SessionTimer<C> {
        let timer = SessionTimer::new(self.clock.clone(), initial_elapsed);
        if let Some(mut previous) = self.timers.remove(&key) {
            tracing::warn!(
                document = %key,
                previous_elapsed_secs = previous.elapsed().as_secs_f64(),
                "document already tracked; replacing timer"
            );
            previous.stop();
        }
        tracing::debug!(
            document = %key,
            initial_elapsed_secs = initial_elapsed.as_secs_f64(),
            "tracking document"
        );
        self.timers.entry(key).or_insert(timer)
    }

    pub fn get(&self, key: &DocumentKey) -> Option<&SessionTimer<C>> {
        self.timers.get(key)
    }

    pub fn get_mut(&mut self, key: &DocumentKey) -> Option<&mut SessionTimer<C>> {
        self.timers.get_mut(key)
    }

    pub fn is_tracked(&self, key: &DocumentKey) -> bool {
        self.timers.contains_key(key)
    }

    /// Moves the timer for `old_key` to `new_key`.
    ///
    /// No-op if `old_key` is not tracked or the keys are equal. A timer
    /// already registered under `new_key` is stopped and replaced.
    pub fn rekey(&mut self, old_key: &DocumentKey, new_key: DocumentKey) {
        if *old_key == new_key {
            return;
        }
        let Some(timer) = self.timers.remove(old_key) else {
            tracing::debug!(document = %old_key, "rekey of untracked document ignored");
            return;
        };
        if let Some(mut displaced) = self.timers.insert(new_key.clone(), timer) {
            tracing::warn!(
                from = %old_key,
                to = %new_key,
                "rekey target already tracked; replacing timer"
            );
            displaced.stop();
        }
        tracing::debug!(from = %old_key, to = %new_key, "rekeyed document");
    }

    /// Stops and forgets the timer for `key`, if any.
    pub fn untrack(&mut self, key: &DocumentKey) {
        if let Some(mut timer) = self.timers.remove(key) {
            timer.stop();
            tracing::debug!(
                document = %key,
                elapsed_secs = timer.elapsed().as_secs_f64(),
                "untracked document"
            );
        }
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

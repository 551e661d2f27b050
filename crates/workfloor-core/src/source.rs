//! Input sources for the simulation loop.
//!
//! The [`EventSource`] trait abstracts where feed events and the courier's
//! active-destination signal come from. The runner polls it once per tick
//! with the current simulated time. [`ReplaySource`] replays a recorded
//! feed file; [`NoEvents`] never produces anything.

use chrono::{DateTime, Utc};
use workfloor_agents::collaboration::parse_timestamp;
use workfloor_types::FeedEvent;

use crate::feed::{Dispatch, FeedFile};

/// Supplies feed events and the courier signal to the runner.
pub trait EventSource {
    /// Return the events that became available at or before `now` and
    /// have not been returned before.
    fn poll_events(&mut self, now: DateTime<Utc>) -> Vec<FeedEvent>;

    /// The courier's active destination at `now`, if any.
    fn active_destination(&self, _now: DateTime<Utc>) -> Option<String> {
        None
    }

    /// Whether the source will never produce another event.
    fn is_exhausted(&self) -> bool;
}

/// A source that never produces events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEvents;

impl EventSource for NoEvents {
    fn poll_events(&mut self, _now: DateTime<Utc>) -> Vec<FeedEvent> {
        Vec::new()
    }

    fn is_exhausted(&self) -> bool {
        true
    }
}

/// Replays a recorded feed against simulated time.
///
/// Each event is released once `now` reaches its timestamp. Events whose
/// timestamp cannot be read are released on the first poll; the detector
/// skips them.
#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    /// Pending events, ordered by release time (stable for equal times).
    pending: Vec<(Option<DateTime<Utc>>, FeedEvent)>,
    next: usize,
    /// Dispatches with readable timestamps, ordered by time.
    dispatches: Vec<(DateTime<Utc>, Option<String>)>,
}

impl ReplaySource {
    /// Build a replay source from a parsed feed file.
    pub fn new(file: FeedFile) -> Self {
        let mut pending: Vec<(Option<DateTime<Utc>>, FeedEvent)> = file
            .events
            .into_iter()
            .map(|event| (parse_timestamp(&event.timestamp), event))
            .collect();
        // `None` sorts first, so unreadable timestamps go out immediately.
        pending.sort_by_key(|(at, _)| *at);

        let mut dispatches: Vec<(DateTime<Utc>, Option<String>)> = file
            .dispatches
            .into_iter()
            .filter_map(|Dispatch { timestamp, destination }| {
                let at = parse_timestamp(&timestamp);
                if at.is_none() {
                    tracing::warn!(%timestamp, "Skipping dispatch with unreadable timestamp");
                }
                at.map(|at| (at, destination))
            })
            .collect();
        dispatches.sort_by_key(|(at, _)| *at);

        Self {
            pending,
            next: 0,
            dispatches,
        }
    }

    /// Number of events not yet released.
    pub fn remaining(&self) -> usize {
        self.pending.len().saturating_sub(self.next)
    }
}

impl EventSource for ReplaySource {
    fn poll_events(&mut self, now: DateTime<Utc>) -> Vec<FeedEvent> {
        let start = self.next;
        let ready = self
            .pending
            .iter()
            .skip(start)
            .take_while(|(at, _)| at.is_none_or(|at| at <= now))
            .count();
        self.next = start.saturating_add(ready);
        self.pending
            .iter()
            .skip(start)
            .take(ready)
            .map(|(_, event)| event.clone())
            .collect()
    }

    fn active_destination(&self, now: DateTime<Utc>) -> Option<String> {
        self.dispatches
            .iter()
            .take_while(|(at, _)| *at <= now)
            .last()
            .and_then(|(_, destination)| destination.clone())
    }

    fn is_exhausted(&self) -> bool {
        self.remaining() == 0
            && self
                .dispatches
                .last()
                .is_none_or(|(_, destination)| destination.is_none())
    }
}

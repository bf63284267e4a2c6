// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rotating slot selection.
//!
//! Each workday at most one pool member takes the rotating on-site slot.
//! A strategy owns the cursor for one engine invocation; cursors are never
//! persisted.

use rota_domain::PersonId;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use time::Date;

/// Which rotation strategy the engine uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationPolicy {
    /// Plain cursor continuation.
    #[default]
    Cursor,
    /// Members back from an absence take the next slot.
    ReturnQueue,
}

impl RotationPolicy {
    /// Builds a strategy for this policy, starting at `cursor`.
    #[must_use]
    pub fn strategy(self, cursor: usize) -> Box<dyn RotationStrategy> {
        match self {
            Self::Cursor => Box::new(CursorRotation::new(cursor)),
            Self::ReturnQueue => Box::new(ReturnQueueRotation::new(cursor)),
        }
    }
}

/// Picks the rotating on-site person for a workday.
pub trait RotationStrategy: std::fmt::Debug {
    /// Selects today's rotating on-site person.
    ///
    /// # Arguments
    ///
    /// * `date` - The workday being scheduled
    /// * `candidates` - Today's effective pool, in pool order
    /// * `is_available` - Whether a candidate can be on-site today
    ///
    /// # Returns
    ///
    /// The selected person, or `None` when no candidate is available.
    fn select(
        &mut self,
        date: Date,
        candidates: &[&PersonId],
        is_available: &dyn Fn(&PersonId) -> bool,
    ) -> Option<PersonId>;

    /// Notes pool members available on `date` after being away the day
    /// before. Called for every calendar day, ahead of any selection.
    fn record_returns(&mut self, _date: Date, _returned: &[PersonId]) {}

    /// The current cursor value.
    fn cursor(&self) -> usize;
}

/// Round-robin over the effective pool.
///
/// The walk starts at `cursor mod len`. Every candidate examined consumes a
/// cursor step, whether skipped or selected, so a fully unavailable pool
/// advances the cursor by its length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorRotation {
    cursor: usize,
}

impl CursorRotation {
    /// Creates a cursor rotation starting at `cursor`.
    #[must_use]
    pub const fn new(cursor: usize) -> Self {
        Self { cursor }
    }

    fn walk(
        &mut self,
        candidates: &[&PersonId],
        is_available: &dyn Fn(&PersonId) -> bool,
    ) -> Option<PersonId> {
        let len: usize = candidates.len();
        for _ in 0..len {
            let candidate: &PersonId = candidates[self.cursor % len];
            self.cursor += 1;
            if is_available(candidate) {
                return Some(candidate.clone());
            }
        }
        None
    }
}

impl RotationStrategy for CursorRotation {
    fn select(
        &mut self,
        _date: Date,
        candidates: &[&PersonId],
        is_available: &dyn Fn(&PersonId) -> bool,
    ) -> Option<PersonId> {
        self.walk(candidates, is_available)
    }

    fn cursor(&self) -> usize {
        self.cursor
    }
}

/// Cursor rotation where members back from an absence are owed a turn.
///
/// A pool member joins the return queue on the first calendar day they are
/// available after being away. On a workday the earliest queued member in
/// today's pool takes the slot before the cursor is consulted, and the
/// cursor restarts right after them. Queued members who are away again are
/// dropped from the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnQueueRotation {
    inner: CursorRotation,
    queue: VecDeque<PersonId>,
}

impl ReturnQueueRotation {
    /// Creates a return-queue rotation starting at `cursor` with an empty queue.
    #[must_use]
    pub const fn new(cursor: usize) -> Self {
        Self {
            inner: CursorRotation::new(cursor),
            queue: VecDeque::new(),
        }
    }

    /// Persons currently owed a turn, earliest first.
    pub fn queued(&self) -> impl Iterator<Item = &PersonId> {
        self.queue.iter()
    }
}

impl RotationStrategy for ReturnQueueRotation {
    fn select(
        &mut self,
        date: Date,
        candidates: &[&PersonId],
        is_available: &dyn Fn(&PersonId) -> bool,
    ) -> Option<PersonId> {
        let mut index: usize = 0;
        while let Some(id) = self.queue.get(index) {
            if !is_available(id) {
                self.queue.remove(index);
                continue;
            }
            // Covering the fixed role today; keep their place in the queue.
            let Some(position) = candidates.iter().position(|c| *c == id) else {
                index += 1;
                continue;
            };
            let chosen: Option<PersonId> = self.queue.remove(index);
            self.inner.cursor = position + 1;
            tracing::debug!(
                %date,
                person = ?chosen,
                cursor = self.inner.cursor,
                "Returning member takes the slot"
            );
            return chosen;
        }

        self.inner.walk(candidates, is_available)
    }

    fn record_returns(&mut self, date: Date, returned: &[PersonId]) {
        for id in returned {
            if !self.queue.contains(id) {
                tracing::debug!(%date, person = %id, "Member back from absence joins the queue");
                self.queue.push_back(id.clone());
            }
        }
    }

    fn cursor(&self) -> usize {
        self.inner.cursor
    }
}

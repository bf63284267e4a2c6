// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The assignment matrix and window merge.
//!
//! ## Invariants
//!
//! - At most one assignment exists per `(date, person)`
//! - Writing an existing identity replaces it, never duplicates it
//! - A merge only touches managed persons inside the recalculated window

use crate::error::CoreError;
use rota_domain::{AssignmentId, DailyAssignment, DateRange, PersonId};
use std::collections::{BTreeMap, HashSet};
use time::Date;

/// Default upper bound on operations per write batch.
pub const DEFAULT_MAX_BATCH_OPS: usize = 500;

/// Assignments keyed by their composite identity, in chronological order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentMatrix {
    entries: BTreeMap<AssignmentId, DailyAssignment>,
}

impl AssignmentMatrix {
    /// Creates an empty matrix.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the assignment with the same identity.
    ///
    /// Returns the assignment it replaced, if any.
    pub fn upsert(&mut self, assignment: DailyAssignment) -> Option<DailyAssignment> {
        self.entries.insert(assignment.id(), assignment)
    }

    /// Removes the assignment with the given identity.
    pub fn remove(&mut self, id: &AssignmentId) -> Option<DailyAssignment> {
        self.entries.remove(id)
    }

    /// Looks up the assignment for a person on a date.
    #[must_use]
    pub fn get(&self, date: Date, person_id: &PersonId) -> Option<&DailyAssignment> {
        self.entries
            .get(&AssignmentId::new(date, person_id.clone()))
    }

    /// Looks up an assignment by identity.
    #[must_use]
    pub fn get_by_id(&self, id: &AssignmentId) -> Option<&DailyAssignment> {
        self.entries.get(id)
    }

    /// Number of assignments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the matrix holds no assignments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All assignments, ordered by date then person.
    pub fn iter(&self) -> impl Iterator<Item = &DailyAssignment> {
        self.entries.values()
    }

    /// Assignments dated inside the window.
    pub fn in_window(&self, window: DateRange) -> impl Iterator<Item = &DailyAssignment> {
        self.entries
            .values()
            .skip_while(move |a| a.date < window.start())
            .take_while(move |a| a.date <= window.end())
    }

    /// Replaces the managed persons' assignments inside `window` with `computed`.
    ///
    /// Assignments outside the window, or belonging to persons not in
    /// `managed`, are left untouched. Running the same merge twice yields the
    /// same matrix.
    pub fn merge_window(
        &mut self,
        window: DateRange,
        managed: &HashSet<PersonId>,
        computed: Vec<DailyAssignment>,
    ) {
        self.entries
            .retain(|id, _| !(window.contains(id.date) && managed.contains(&id.person_id)));
        for assignment in computed {
            self.upsert(assignment);
        }
    }

    /// Applies a store-oriented merge plan to this matrix.
    pub fn apply_plan(&mut self, plan: &MergePlan) {
        for id in &plan.deletions {
            self.entries.remove(id);
        }
        for assignment in &plan.upserts {
            self.upsert(assignment.clone());
        }
    }
}

impl FromIterator<DailyAssignment> for AssignmentMatrix {
    /// Later assignments with the same identity supersede earlier ones.
    fn from_iter<I: IntoIterator<Item = DailyAssignment>>(iter: I) -> Self {
        let mut matrix: Self = Self::new();
        for assignment in iter {
            matrix.upsert(assignment);
        }
        matrix
    }
}

/// A merge expressed as deletions and upserts against a store.
///
/// Unchanged assignments are neither deleted nor rewritten, so re-running a
/// recalculation over settled data produces an empty plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergePlan {
    /// Identities to remove.
    pub deletions: Vec<AssignmentId>,
    /// Assignments to insert or replace.
    pub upserts: Vec<DailyAssignment>,
}

impl MergePlan {
    /// Total number of write operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.deletions.len() + self.upserts.len()
    }

    /// Whether the plan changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deletions.is_empty() && self.upserts.is_empty()
    }

    /// Chunks the plan into batches of at most `max_ops` operations.
    ///
    /// Deletions come first so a batch never resurrects a row another batch
    /// removes.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidBatchSize` if `max_ops` is zero.
    pub fn batches(&self, max_ops: usize) -> Result<Vec<WriteBatch>, CoreError> {
        if max_ops == 0 {
            return Err(CoreError::InvalidBatchSize);
        }

        let mut batches: Vec<WriteBatch> = Vec::new();
        let mut current: WriteBatch = WriteBatch::default();
        for id in &self.deletions {
            if current.len() == max_ops {
                batches.push(std::mem::take(&mut current));
            }
            current.deletions.push(id.clone());
        }
        for assignment in &self.upserts {
            if current.len() == max_ops {
                batches.push(std::mem::take(&mut current));
            }
            current.upserts.push(assignment.clone());
        }
        if !current.is_empty() {
            batches.push(current);
        }
        Ok(batches)
    }
}

/// One bounded group of store writes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    /// Identities to remove.
    pub deletions: Vec<AssignmentId>,
    /// Assignments to insert or replace.
    pub upserts: Vec<DailyAssignment>,
}

impl WriteBatch {
    /// Number of operations in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.deletions.len() + self.upserts.len()
    }

    /// Whether the batch is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deletions.is_empty() && self.upserts.is_empty()
    }
}

/// Plans the store writes that turn `existing` into the merged matrix.
///
/// # Arguments
///
/// * `existing` - The stored assignments
/// * `window` - The recalculated window
/// * `managed` - Persons the engine owns records for
/// * `computed` - The freshly computed assignments for the window
///
/// # Errors
///
/// Returns `CoreError::UnmanagedAssignment` if a computed assignment belongs
/// to a person outside `managed`, and `CoreError::AssignmentOutsideWindow` if
/// one is dated outside the window.
pub fn plan_merge(
    existing: &AssignmentMatrix,
    window: DateRange,
    managed: &HashSet<PersonId>,
    computed: &[DailyAssignment],
) -> Result<MergePlan, CoreError> {
    let mut computed_ids: HashSet<AssignmentId> = HashSet::with_capacity(computed.len());
    for assignment in computed {
        if !managed.contains(&assignment.person_id) {
            return Err(CoreError::UnmanagedAssignment(assignment.id().to_string()));
        }
        if !window.contains(assignment.date) {
            return Err(CoreError::AssignmentOutsideWindow(
                assignment.id().to_string(),
            ));
        }
        computed_ids.insert(assignment.id());
    }

    let deletions: Vec<AssignmentId> = existing
        .in_window(window)
        .filter(|a| managed.contains(&a.person_id))
        .map(DailyAssignment::id)
        .filter(|id| !computed_ids.contains(id))
        .collect();

    let upserts: Vec<DailyAssignment> = computed
        .iter()
        .filter(|a| existing.get_by_id(&a.id()) != Some(*a))
        .cloned()
        .collect();

    Ok(MergePlan { deletions, upserts })
}

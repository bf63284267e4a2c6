// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Cursor inference for incremental recalculation.
//!
//! Recalculating from an arbitrary start date must continue the rotation
//! where settled history left it, without persisting the cursor.

use crate::matrix::AssignmentMatrix;
use rota_domain::{PersonId, Roster, StatusKind};
use time::{Date, Duration};

/// Infers the starting cursor for a recalculation beginning at `start`.
///
/// Scans backward from `start - 1` through `start - lookback_days` for the
/// latest day on which a pool member held the rotating on-site slot. On days
/// the fixed person's record is blocking, the substitute was covering the
/// fixed role and does not count.
///
/// # Arguments
///
/// * `start` - First date being recalculated
/// * `lookback_days` - How many days of history to scan
/// * `roster` - The team
/// * `history` - Previously stored assignments
///
/// # Returns
///
/// That member's pool index plus one, or `0` when nothing is found.
#[must_use]
pub fn infer_cursor(
    start: Date,
    lookback_days: u32,
    roster: &Roster,
    history: &AssignmentMatrix,
) -> usize {
    for offset in 1..=i64::from(lookback_days) {
        let Some(date) = start.checked_sub(Duration::days(offset)) else {
            break;
        };
        let fixed_absent: bool = history
            .get(date, &roster.fixed().id)
            .is_some_and(|a| a.status.blocks_rotation());
        let acting_fixed: Option<&PersonId> = if fixed_absent {
            roster.substitute()
        } else {
            None
        };
        let on_site: Option<usize> = roster.pool().iter().position(|member| {
            Some(&member.id) != acting_fixed
                && history
                    .get(date, &member.id)
                    .is_some_and(|a| a.status == StatusKind::OnSite)
        });
        if let Some(index) = on_site {
            tracing::debug!(
                %start,
                %date,
                person = %roster.pool()[index].id,
                cursor = index + 1,
                "Continuing rotation from history"
            );
            return index + 1;
        }
    }

    tracing::debug!(%start, lookback_days, "No rotation history in lookback, starting at 0");
    0
}

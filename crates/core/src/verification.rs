// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Schedule verification.
//!
//! Scans stored assignments and reports every day that breaks a presence
//! rule. Verification never fails; it only counts and describes.

use crate::matrix::AssignmentMatrix;
use rota_domain::{DailyAssignment, DateRange, HolidaySet, PersonId, Roster, StatusKind, is_non_workday};
use serde::Serialize;
use time::Date;

/// Minimum on-site headcount on a workday: the fixed role plus the rotating slot.
pub const DEFAULT_REQUIRED_ON_SITE: usize = 2;

/// A rule broken on a particular day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViolationKind {
    /// A managed person has no record on a workday.
    MissingRecord {
        /// Who is missing.
        person_id: PersonId,
    },
    /// The fixed person is available but not on-site.
    FixedNotOnSite,
    /// The fixed person is absent and the substitute is not on-site.
    SubstituteNotOnSite {
        /// The configured substitute.
        person_id: PersonId,
    },
    /// Fewer people on-site than required.
    InsufficientCoverage {
        /// People on-site.
        on_site: usize,
        /// People required.
        required: usize,
    },
    /// More than one pool member holds the rotating slot.
    MultipleRotatingOnSite {
        /// Rotating members on-site.
        count: usize,
    },
    /// A presence record exists on a weekend or holiday.
    PresenceOnNonWorkday {
        /// Whose record it is.
        person_id: PersonId,
    },
}

/// One reported violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// The day the rule was broken.
    #[serde(with = "rota_domain::iso_date")]
    pub date: Date,
    /// What went wrong.
    #[serde(flatten)]
    pub kind: ViolationKind,
}

/// The outcome of verifying a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    /// The verified window.
    pub window: DateRange,
    /// Workdays examined.
    pub workdays_checked: usize,
    /// Every violation found, in date order.
    pub violations: Vec<Violation>,
}

impl VerificationReport {
    /// Whether the window passed every check.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of violations of a given kind.
    pub fn count_where<F>(&self, predicate: F) -> usize
    where
        F: Fn(&ViolationKind) -> bool,
    {
        self.violations.iter().filter(|v| predicate(&v.kind)).count()
    }
}

/// Verifies stored assignments over a window.
///
/// # Arguments
///
/// * `window` - Dates to verify
/// * `roster` - The team
/// * `holidays` - Holiday dates
/// * `matrix` - Stored assignments
/// * `required_on_site` - Minimum on-site headcount per workday
#[must_use]
pub fn verify_schedule(
    window: DateRange,
    roster: &Roster,
    holidays: &HolidaySet,
    matrix: &AssignmentMatrix,
    required_on_site: usize,
) -> VerificationReport {
    let mut report: VerificationReport = VerificationReport {
        window,
        workdays_checked: 0,
        violations: Vec::new(),
    };

    for date in window {
        if is_non_workday(date, holidays) {
            for member in roster.members() {
                if matrix
                    .get(date, &member.id)
                    .is_some_and(|a| a.status.is_mutable())
                {
                    report.violations.push(Violation {
                        date,
                        kind: ViolationKind::PresenceOnNonWorkday {
                            person_id: member.id.clone(),
                        },
                    });
                }
            }
            continue;
        }

        report.workdays_checked += 1;
        verify_workday(date, roster, matrix, required_on_site, &mut report.violations);
    }

    if !report.is_clean() {
        tracing::info!(
            start = %window.start(),
            end = %window.end(),
            violations = report.violations.len(),
            "Schedule verification found violations"
        );
    }
    report
}

fn verify_workday(
    date: Date,
    roster: &Roster,
    matrix: &AssignmentMatrix,
    required_on_site: usize,
    violations: &mut Vec<Violation>,
) {
    let mut push = |kind: ViolationKind| violations.push(Violation { date, kind });

    let status_of = |id: &PersonId| -> Option<StatusKind> {
        matrix.get(date, id).map(|a: &DailyAssignment| a.status)
    };

    for member in roster.members() {
        if status_of(&member.id).is_none() {
            push(ViolationKind::MissingRecord {
                person_id: member.id.clone(),
            });
        }
    }

    let fixed_status: Option<StatusKind> = status_of(&roster.fixed().id);
    let fixed_absent: bool = fixed_status.is_some_and(|s| s.blocks_rotation());
    if fixed_status.is_some() && !fixed_absent && fixed_status != Some(StatusKind::OnSite) {
        push(ViolationKind::FixedNotOnSite);
    }

    let acting_fixed: Option<&PersonId> = if fixed_absent {
        roster.substitute()
    } else {
        None
    };
    if let Some(substitute) = acting_fixed
        && status_of(substitute) != Some(StatusKind::OnSite)
    {
        push(ViolationKind::SubstituteNotOnSite {
            person_id: substitute.clone(),
        });
    }

    let on_site: usize = roster
        .members()
        .filter(|m| status_of(&m.id) == Some(StatusKind::OnSite))
        .count();
    if on_site < required_on_site {
        push(ViolationKind::InsufficientCoverage {
            on_site,
            required: required_on_site,
        });
    }

    let rotating_on_site: usize = roster
        .pool()
        .iter()
        .filter(|m| Some(&m.id) != acting_fixed)
        .filter(|m| status_of(&m.id) == Some(StatusKind::OnSite))
        .count();
    if rotating_on_site > 1 {
        push(ViolationKind::MultipleRotatingOnSite {
            count: rotating_on_site,
        });
    }
}

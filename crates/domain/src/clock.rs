// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The team's wall-clock calendar.
//!
//! "Today" is whatever date it currently is where the team works, not on
//! the host running the server.

use crate::error::DomainError;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use time::Date;

/// Resolves calendar dates in the team's declared timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamClock {
    tz: Tz,
}

impl TeamClock {
    /// Creates a clock for an IANA timezone name such as `America/Sao_Paulo`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimezone` if the name is not a known zone.
    pub fn new(timezone: &str) -> Result<Self, DomainError> {
        let tz: Tz = timezone
            .parse()
            .map_err(|_| DomainError::InvalidTimezone(timezone.to_string()))?;
        Ok(Self { tz })
    }

    /// Returns the timezone name.
    #[must_use]
    pub fn timezone(&self) -> &'static str {
        self.tz.name()
    }

    /// Today's date in the team timezone.
    ///
    /// # Errors
    ///
    /// Returns an error if the local date cannot be represented.
    pub fn today(&self) -> Result<Date, DomainError> {
        self.date_at(Utc::now())
    }

    /// The team-local date at a given instant.
    ///
    /// # Errors
    ///
    /// Returns an error if the local date cannot be represented.
    pub fn date_at(&self, instant: DateTime<Utc>) -> Result<Date, DomainError> {
        let local: NaiveDate = instant.with_timezone(&self.tz).date_naive();
        to_time_date(local)
    }
}

/// Converts a `chrono` calendar date to a `time` calendar date.
fn to_time_date(date: NaiveDate) -> Result<Date, DomainError> {
    let ordinal: u16 =
        u16::try_from(date.ordinal()).map_err(|_| DomainError::DateArithmeticOverflow {
            operation: format!("converting {date} to an ordinal date"),
        })?;
    Date::from_ordinal_date(date.year(), ordinal).map_err(|e| {
        DomainError::DateArithmeticOverflow {
            operation: format!("converting {date}: {e}"),
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use time::macros::date;

    #[test]
    fn test_rejects_unknown_timezone() {
        assert_eq!(
            TeamClock::new("Mars/Olympus_Mons"),
            Err(DomainError::InvalidTimezone(String::from(
                "Mars/Olympus_Mons"
            )))
        );
    }

    #[test]
    fn test_date_at_uses_team_timezone() {
        let clock: TeamClock = TeamClock::new("America/Sao_Paulo").unwrap();
        // 02:00 UTC on Jan 2 is still Jan 1 in Sao Paulo (UTC-3).
        let instant: DateTime<Utc> = Utc.with_ymd_and_hms(2026, 1, 2, 2, 0, 0).unwrap();
        assert_eq!(clock.date_at(instant).unwrap(), date!(2026 - 01 - 01));

        let utc: TeamClock = TeamClock::new("UTC").unwrap();
        assert_eq!(utc.date_at(instant).unwrap(), date!(2026 - 01 - 02));
    }

    #[test]
    fn test_timezone_name() {
        let clock: TeamClock = TeamClock::new("America/Sao_Paulo").unwrap();
        assert_eq!(clock.timezone(), "America/Sao_Paulo");
    }
}

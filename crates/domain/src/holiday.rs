// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Holiday feeds.
//!
//! The engine only ever looks at holiday dates. Names and categories exist
//! for the people maintaining the feed.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;
use time::{Date, Duration, Month};

/// Where a holiday applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HolidayCategory {
    /// Country-wide.
    National,
    /// State or province.
    Regional,
    /// Municipal.
    Local,
    /// Declared by the company.
    Company,
}

impl HolidayCategory {
    /// Converts this category to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::National => "national",
            Self::Regional => "regional",
            Self::Local => "local",
            Self::Company => "company",
        }
    }
}

impl FromStr for HolidayCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "national" => Ok(Self::National),
            "regional" => Ok(Self::Regional),
            "local" => Ok(Self::Local),
            "company" => Ok(Self::Company),
            _ => Err(DomainError::InvalidHolidayCategory(s.to_string())),
        }
    }
}

/// A single non-working calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    /// The date.
    #[serde(with = "crate::date_format::iso_date")]
    pub date: Date,
    /// Display name.
    pub name: String,
    /// Scope.
    pub category: HolidayCategory,
}

impl Holiday {
    /// Creates a new `Holiday`.
    #[must_use]
    pub const fn new(date: Date, name: String, category: HolidayCategory) -> Self {
        Self {
            date,
            name,
            category,
        }
    }
}

/// A holiday observed on the same month and day every year.
///
/// State and municipal holidays are listed this way in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringHoliday {
    /// Month number, 1 through 12.
    pub month: u8,
    /// Day of the month.
    pub day: u8,
    /// Display name.
    pub name: String,
    /// Scope.
    pub category: HolidayCategory,
}

impl RecurringHoliday {
    /// Checks that the month and day exist in at least a leap year.
    ///
    /// # Errors
    ///
    /// Returns an error if the month is outside 1 through 12 or the day does
    /// not exist in that month.
    pub fn validate(&self) -> Result<(), DomainError> {
        let month: Month = Month::try_from(self.month).map_err(|_| self.invalid())?;
        Date::from_calendar_date(2000, month, self.day).map_err(|_| self.invalid())?;
        Ok(())
    }

    /// The holiday as observed in `year`.
    ///
    /// Returns `None` when the date does not exist that year (February 29
    /// outside leap years) or the entry is invalid.
    #[must_use]
    pub fn in_year(&self, year: i32) -> Option<Holiday> {
        let month: Month = Month::try_from(self.month).ok()?;
        let date: Date = Date::from_calendar_date(year, month, self.day).ok()?;
        Some(Holiday::new(date, self.name.clone(), self.category))
    }

    fn invalid(&self) -> DomainError {
        DomainError::InvalidRecurringHoliday {
            month: self.month,
            day: self.day,
        }
    }
}

/// Computes Easter Sunday (Gregorian) for the year.
///
/// # Errors
///
/// Returns an error if the resulting date is out of range for `time::Date`.
pub fn easter_sunday(year: i32) -> Result<Date, DomainError> {
    // Anonymous Gregorian algorithm (Meeus/Jones/Butcher).
    let a: i32 = year.rem_euclid(19);
    let b: i32 = year.div_euclid(100);
    let c: i32 = year.rem_euclid(100);
    let d: i32 = b / 4;
    let e: i32 = b % 4;
    let f: i32 = (b + 8) / 25;
    let g: i32 = (b - f + 1) / 3;
    let h: i32 = (19 * a + b - d - g + 15) % 30;
    let i: i32 = c / 4;
    let k: i32 = c % 4;
    let l: i32 = (32 + 2 * e + 2 * i - h - k) % 7;
    let m: i32 = (a + 11 * h + 22 * l) / 451;
    let month: i32 = (h + l - 7 * m + 114) / 31;
    let day: i32 = (h + l - 7 * m + 114) % 31 + 1;

    let month: Month = if month == 3 { Month::March } else { Month::April };
    let day: u8 = u8::try_from(day).map_err(|_| DomainError::DateArithmeticOverflow {
        operation: format!("computing Easter for {year}"),
    })?;
    calendar_date(year, month, day)
}

fn calendar_date(year: i32, month: Month, day: u8) -> Result<Date, DomainError> {
    Date::from_calendar_date(year, month, day).map_err(|e| DomainError::DateArithmeticOverflow {
        operation: format!("building {year}-{month}-{day}: {e}"),
    })
}

fn offset(date: Date, days: i64) -> Result<Date, DomainError> {
    date.checked_add(Duration::days(days))
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: format!("offsetting {date} by {days} days"),
        })
}

/// The built-in national holiday calendar for a year, sorted by date.
///
/// Used when no external feed is available. Fixed-date holidays plus the
/// Easter-relative Carnival Monday and Tuesday, Good Friday and Corpus Christi.
///
/// # Errors
///
/// Returns an error if the year is outside the supported date range.
pub fn national_holidays(year: i32) -> Result<Vec<Holiday>, DomainError> {
    let easter: Date = easter_sunday(year)?;

    let mut fixed: Vec<(Month, u8, &str)> = vec![
        (Month::January, 1, "New Year's Day"),
        (Month::April, 21, "Tiradentes"),
        (Month::May, 1, "Labour Day"),
        (Month::September, 7, "Independence Day"),
        (Month::October, 12, "Our Lady of Aparecida"),
        (Month::November, 2, "All Souls' Day"),
        (Month::November, 15, "Republic Day"),
        (Month::December, 25, "Christmas Day"),
    ];
    if year >= 2024 {
        fixed.push((Month::November, 20, "Black Consciousness Day"));
    }

    let mut holidays: Vec<Holiday> = Vec::with_capacity(fixed.len() + 4);
    for (month, day, name) in fixed {
        holidays.push(Holiday::new(
            calendar_date(year, month, day)?,
            name.to_string(),
            HolidayCategory::National,
        ));
    }
    for (days, name) in [
        (-48, "Carnival Monday"),
        (-47, "Carnival Tuesday"),
        (-2, "Good Friday"),
        (60, "Corpus Christi"),
    ] {
        holidays.push(Holiday::new(
            offset(easter, days)?,
            name.to_string(),
            HolidayCategory::National,
        ));
    }

    holidays.sort_by_key(|h| h.date);
    Ok(holidays)
}

/// The default calendar for a year: national holidays followed by the
/// recurring entries, first entry per date kept.
///
/// # Errors
///
/// Returns an error if the year is outside the supported date range.
pub fn holidays_for_year(
    year: i32,
    recurring: &[RecurringHoliday],
) -> Result<Vec<Holiday>, DomainError> {
    let national: Vec<Holiday> = national_holidays(year)?;
    let observed: Vec<Holiday> = recurring.iter().filter_map(|r| r.in_year(year)).collect();
    Ok(merge_holiday_feeds([national, observed]))
}

/// Merges several holiday feeds into one list.
///
/// Feeds are consulted in order; when two entries share a date, the first
/// one seen is kept. The result is sorted by date.
#[must_use]
pub fn merge_holiday_feeds<I>(feeds: I) -> Vec<Holiday>
where
    I: IntoIterator<Item = Vec<Holiday>>,
{
    let mut seen: HashSet<Date> = HashSet::new();
    let mut merged: Vec<Holiday> = feeds
        .into_iter()
        .flatten()
        .filter(|h| seen.insert(h.date))
        .collect();
    merged.sort_by_key(|h| h.date);
    merged
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use time::macros::date;

    fn sp_recurring() -> Vec<RecurringHoliday> {
        vec![
            RecurringHoliday {
                month: 1,
                day: 25,
                name: String::from("City Anniversary"),
                category: HolidayCategory::Local,
            },
            RecurringHoliday {
                month: 7,
                day: 9,
                name: String::from("Constitutionalist Revolution"),
                category: HolidayCategory::Regional,
            },
        ]
    }

    #[test]
    fn test_holidays_for_year_adds_recurring_dates() {
        let holidays: Vec<Holiday> = holidays_for_year(2027, &sp_recurring()).unwrap();

        assert_eq!(holidays.len(), national_holidays(2027).unwrap().len() + 2);
        let july: &Holiday = holidays
            .iter()
            .find(|h| h.date == date!(2027 - 07 - 09))
            .unwrap();
        assert_eq!(july.category, HolidayCategory::Regional);
        assert!(holidays.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn test_holidays_for_year_prefers_national_entry_on_shared_date() {
        let recurring: Vec<RecurringHoliday> = vec![RecurringHoliday {
            month: 12,
            day: 25,
            name: String::from("Office Closed"),
            category: HolidayCategory::Company,
        }];
        let holidays: Vec<Holiday> = holidays_for_year(2027, &recurring).unwrap();

        assert_eq!(holidays.len(), national_holidays(2027).unwrap().len());
        let christmas: &Holiday = holidays
            .iter()
            .find(|h| h.date == date!(2027 - 12 - 25))
            .unwrap();
        assert_eq!(christmas.category, HolidayCategory::National);
    }

    #[test]
    fn test_recurring_leap_day_skips_common_years() {
        let leap_day = RecurringHoliday {
            month: 2,
            day: 29,
            name: String::from("Leap Day"),
            category: HolidayCategory::Company,
        };
        assert!(leap_day.validate().is_ok());
        assert_eq!(leap_day.in_year(2028).unwrap().date, date!(2028 - 02 - 29));
        assert!(leap_day.in_year(2027).is_none());
    }

    #[test]
    fn test_recurring_rejects_impossible_dates() {
        let bad_month = RecurringHoliday {
            month: 13,
            day: 1,
            name: String::from("Nope"),
            category: HolidayCategory::Company,
        };
        assert_eq!(
            bad_month.validate(),
            Err(DomainError::InvalidRecurringHoliday { month: 13, day: 1 })
        );
        let bad_day = RecurringHoliday {
            month: 4,
            day: 31,
            ..bad_month
        };
        assert!(bad_day.validate().is_err());
    }

    #[test]
    fn test_easter_sunday_known_years() {
        assert_eq!(easter_sunday(2024).unwrap(), date!(2024 - 03 - 31));
        assert_eq!(easter_sunday(2025).unwrap(), date!(2025 - 04 - 20));
        assert_eq!(easter_sunday(2026).unwrap(), date!(2026 - 04 - 05));
        assert_eq!(easter_sunday(2027).unwrap(), date!(2027 - 03 - 28));
    }

    #[test]
    fn test_national_holidays_2026_movable_dates() {
        let holidays: Vec<Holiday> = national_holidays(2026).unwrap();
        let dates: Vec<Date> = holidays.iter().map(|h| h.date).collect();

        assert!(dates.contains(&date!(2026 - 02 - 16)));
        assert!(dates.contains(&date!(2026 - 02 - 17)));
        assert!(dates.contains(&date!(2026 - 04 - 03)));
        assert!(dates.contains(&date!(2026 - 06 - 04)));
        assert!(dates.contains(&date!(2026 - 11 - 20)));
        assert_eq!(holidays.len(), 13);
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_national_holidays_2025_matches_published_calendar() {
        let dates: Vec<Date> = national_holidays(2025)
            .unwrap()
            .into_iter()
            .map(|h| h.date)
            .collect();
        assert!(dates.contains(&date!(2025 - 03 - 03)));
        assert!(dates.contains(&date!(2025 - 03 - 04)));
        assert!(dates.contains(&date!(2025 - 04 - 18)));
        assert!(dates.contains(&date!(2025 - 06 - 19)));
    }

    #[test]
    fn test_merge_holiday_feeds_keeps_first_per_date() {
        let national: Vec<Holiday> = vec![Holiday::new(
            date!(2026 - 11 - 20),
            String::from("Black Consciousness Day"),
            HolidayCategory::National,
        )];
        let local: Vec<Holiday> = vec![
            Holiday::new(
                date!(2026 - 11 - 20),
                String::from("Local duplicate"),
                HolidayCategory::Local,
            ),
            Holiday::new(
                date!(2026 - 01 - 25),
                String::from("City anniversary"),
                HolidayCategory::Local,
            ),
        ];

        let merged: Vec<Holiday> = merge_holiday_feeds([national, local]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].date, date!(2026 - 01 - 25));
        assert_eq!(merged[1].category, HolidayCategory::National);
    }

    #[test]
    fn test_category_round_trips_through_str() {
        for category in [
            HolidayCategory::National,
            HolidayCategory::Regional,
            HolidayCategory::Local,
            HolidayCategory::Company,
        ] {
            assert_eq!(category.as_str().parse::<HolidayCategory>().unwrap(), category);
        }
        assert!("federal".parse::<HolidayCategory>().is_err());
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Team configuration.
//!
//! The roster and engine tuning are read from a JSON document. A built-in
//! default describes the reference team so the server can start without a
//! file.

use rota::{DEFAULT_MAX_BATCH_OPS, DEFAULT_REQUIRED_ON_SITE, EngineOptions};
use rota_domain::{
    DomainError, Holiday, HolidayCategory, Person, PersonId, RecurringHoliday, Role, Roster,
    TeamClock, validate_lookback_days,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read configuration file '{path}': {message}")]
    Read {
        /// The file that failed.
        path: String,
        /// The I/O error.
        message: String,
    },
    /// The document is not valid configuration JSON.
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
    /// A configured value breaks a domain rule.
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] DomainError),
    /// The write batch size is zero.
    #[error("max_batch_ops must be greater than 0")]
    ZeroBatchSize,
    /// The required on-site headcount is zero.
    #[error("required_on_site must be greater than 0")]
    ZeroRequiredOnSite,
}

/// One configured team member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberConfig {
    /// Stable person identifier.
    pub id: String,
    /// Display name.
    pub name: String,
}

impl MemberConfig {
    fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    fn to_person(&self, role: Role) -> Result<Person, DomainError> {
        Ok(Person::new(PersonId::new(&self.id)?, self.name.clone(), role))
    }
}

/// The on-disk configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RotaConfig {
    /// IANA timezone the team's "today" is computed in.
    pub timezone: String,
    /// The fixed-role person.
    pub fixed: MemberConfig,
    /// Rotating pool in rotation order.
    pub pool: Vec<MemberConfig>,
    /// Pool member who covers on-site when the fixed person is away.
    #[serde(default)]
    pub substitute: Option<String>,
    /// Engine tuning.
    #[serde(default)]
    pub engine: EngineOptions,
    /// Upper bound on operations per write batch.
    #[serde(default = "default_max_batch_ops")]
    pub max_batch_ops: usize,
    /// Minimum on-site headcount verification expects on a workday.
    #[serde(default = "default_required_on_site")]
    pub required_on_site: usize,
    /// Company or local holidays imported at startup.
    #[serde(default)]
    pub extra_holidays: Vec<Holiday>,
    /// State and municipal holidays observed every year on the same date.
    #[serde(default)]
    pub recurring_holidays: Vec<RecurringHoliday>,
}

const fn default_max_batch_ops() -> usize {
    DEFAULT_MAX_BATCH_OPS
}

const fn default_required_on_site() -> usize {
    DEFAULT_REQUIRED_ON_SITE
}

impl Default for RotaConfig {
    /// The reference team: one fixed person, four in rotation, and a
    /// substitute drawn from the pool.
    fn default() -> Self {
        Self {
            timezone: "America/Sao_Paulo".to_string(),
            fixed: MemberConfig::new("iuri", "Iuri"),
            pool: vec![
                MemberConfig::new("andre", "Andre"),
                MemberConfig::new("virginia", "Virginia"),
                MemberConfig::new("carol", "Carol"),
                MemberConfig::new("william", "William"),
            ],
            substitute: Some("carol".to_string()),
            engine: EngineOptions::default(),
            max_batch_ops: DEFAULT_MAX_BATCH_OPS,
            required_on_site: DEFAULT_REQUIRED_ON_SITE,
            extra_holidays: Vec::new(),
            recurring_holidays: vec![
                RecurringHoliday {
                    month: 1,
                    day: 25,
                    name: "São Paulo City Anniversary".to_string(),
                    category: HolidayCategory::Local,
                },
                RecurringHoliday {
                    month: 7,
                    day: 9,
                    name: "Constitutionalist Revolution".to_string(),
                    category: HolidayCategory::Regional,
                },
            ],
        }
    }
}

impl RotaConfig {
    /// Parses a configuration document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or has unknown fields.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path: &Path = path.as_ref();
        let contents: String = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&contents)
    }

    /// Validates the document and resolves it into team settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the roster, timezone, lookback, batch size or a
    /// recurring holiday date is invalid.
    pub fn into_settings(self) -> Result<TeamSettings, ConfigError> {
        validate_lookback_days(self.engine.lookback_days)?;
        if self.max_batch_ops == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        if self.required_on_site == 0 {
            return Err(ConfigError::ZeroRequiredOnSite);
        }
        for holiday in &self.recurring_holidays {
            holiday.validate()?;
        }

        let fixed: Person = self.fixed.to_person(Role::Fixed)?;
        let pool: Vec<Person> = self
            .pool
            .iter()
            .map(|m| m.to_person(Role::Rotating))
            .collect::<Result<_, _>>()?;
        let substitute: Option<PersonId> = self
            .substitute
            .as_deref()
            .map(PersonId::new)
            .transpose()?;

        Ok(TeamSettings {
            roster: Roster::new(fixed, pool, substitute)?,
            clock: TeamClock::new(&self.timezone)?,
            engine: self.engine,
            max_batch_ops: self.max_batch_ops,
            required_on_site: self.required_on_site,
            extra_holidays: self.extra_holidays,
            recurring_holidays: self.recurring_holidays,
        })
    }
}

/// Validated configuration the handlers run against.
#[derive(Debug, Clone)]
pub struct TeamSettings {
    /// The team.
    pub roster: Roster,
    /// The team's clock.
    pub clock: TeamClock,
    /// Engine tuning.
    pub engine: EngineOptions,
    /// Upper bound on operations per write batch.
    pub max_batch_ops: usize,
    /// Minimum on-site headcount per workday.
    pub required_on_site: usize,
    /// Holidays imported at startup.
    pub extra_holidays: Vec<Holiday>,
    /// Month-day holidays added whenever a year's defaults are seeded.
    pub recurring_holidays: Vec<RecurringHoliday>,
}

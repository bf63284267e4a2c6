// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use rota_persistence::SqlitePersistence;
use time::Date;

use crate::{
    DateWindowRequest, MemberConfig, RecalculateRequest, RegisterAbsenceRequest, RotaConfig,
    TeamSettings, initialize_store,
};

/// Fixed `f`, pool `a, b, c, d`, substitute `c`, UTC clock, small batches.
pub fn create_test_settings() -> TeamSettings {
    let member = |id: &str| MemberConfig {
        id: id.to_string(),
        name: id.to_uppercase(),
    };
    RotaConfig {
        timezone: String::from("UTC"),
        fixed: member("f"),
        pool: vec![member("a"), member("b"), member("c"), member("d")],
        substitute: Some(String::from("c")),
        max_batch_ops: 25,
        ..RotaConfig::default()
    }
    .into_settings()
    .unwrap()
}

/// An in-memory store prepared for the test settings.
pub fn create_test_persistence(settings: &TeamSettings) -> SqlitePersistence {
    let mut persistence: SqlitePersistence =
        SqlitePersistence::new_in_memory().expect("Failed to create in-memory store");
    initialize_store(&mut persistence, settings).expect("Failed to initialize store");
    persistence
}

pub fn create_test_window(start: Date, end: Date) -> DateWindowRequest {
    DateWindowRequest { start, end }
}

pub fn create_test_recalculation(start: Date, end: Date) -> RecalculateRequest {
    RecalculateRequest {
        start: Some(start),
        end: Some(end),
    }
}

pub fn create_test_absence(person_id: &str, start: Date, length_days: i32) -> RegisterAbsenceRequest {
    RegisterAbsenceRequest {
        person_id: person_id.to_string(),
        start,
        length_days,
        reason: String::from("vacation"),
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Persistence, PersistenceError};
use time::macros::date;

use super::{create_test_assignment, create_test_persistence};
use rota_domain::StatusKind;

#[test]
fn test_new_in_memory_runs_migrations() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    assert!(persistence.list_people().unwrap().is_empty());
    assert!(persistence.list_holidays(None).unwrap().is_empty());
    assert_eq!(persistence.count_assignments().unwrap(), 0);
}

#[test]
fn test_foreign_key_enforcement_is_enabled() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_in_memory_databases_are_isolated() {
    let mut first: Persistence = create_test_persistence();
    let mut second: Persistence = Persistence::new_in_memory().unwrap();

    first
        .upsert_assignment(&create_test_assignment(
            date!(2026 - 03 - 02),
            "a",
            StatusKind::OnSite,
        ))
        .unwrap();

    assert_eq!(first.count_assignments().unwrap(), 1);
    assert_eq!(second.count_assignments().unwrap(), 0);
    assert!(second.list_people().unwrap().is_empty());
}

#[test]
fn test_file_database_persists_across_reopen() {
    let path = std::env::temp_dir().join(format!("rota_store_test_{}.db", std::process::id()));
    let _ = std::fs::remove_file(&path);

    {
        let mut persistence: Persistence = Persistence::new_with_file(&path).unwrap();
        persistence
            .sync_people(&super::create_test_roster())
            .unwrap();
    }
    {
        let mut reopened: Persistence = Persistence::new_with_file(&path).unwrap();
        assert_eq!(reopened.list_people().unwrap().len(), 5);
    }

    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
    }
}

#[test]
fn test_error_display_names_failing_batch() {
    let err: PersistenceError = PersistenceError::BatchCommitFailed {
        batch: 2,
        total: 3,
        message: "disk I/O error".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Write batch 2 of 3 failed and the merge was rolled back: disk I/O error"
    );
}

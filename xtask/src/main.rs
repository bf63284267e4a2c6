// Copyright (C) 2024-2025 Fred Clausen and the ratatui project contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - Project Automation
//!
//! Lint, build, and test orchestration for the rota workspace.
//!
//! - `cargo xtask ci` runs the lint, build and test gate
//! - `cargo xtask verify-migrations` applies the `SQLite` migrations to an
//!   in-memory database and checks the resulting schema
//!
//! Standard `cargo test` stays fast and needs no external services.

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::{fmt::Debug, io, process::Output};

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{eyre::Context, Result};
use color_eyre::eyre::eyre;
use diesel::sql_types::{Integer, Text};
use diesel::{QueryableByName, RunQueryDsl, SqliteConnection};
use duct::cmd;
use std::collections::{BTreeMap, BTreeSet};
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        self.command.run()
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Lint, build, test, then verify migrations
    CI,

    /// Build every target
    #[command(visible_alias = "b")]
    Build,

    /// Type-check every target
    #[command(visible_alias = "c")]
    Check,

    /// Run every lint
    #[command(visible_alias = "l")]
    Lint,

    /// Clippy with warnings denied
    #[command(visible_alias = "cl")]
    LintClippy,

    /// Build the docs of each workspace crate with warnings denied
    #[command(visible_alias = "d")]
    LintDocs,

    /// rustfmt in check mode
    #[command(visible_alias = "lf")]
    LintFormatting,

    /// Spell-check sources and docs
    #[command(visible_alias = "lt")]
    LintTypos,

    /// Apply clippy fixes and reformat
    #[command(visible_alias = "f")]
    Fix,

    /// Run the workspace tests
    #[command(visible_alias = "t")]
    Test,

    /// Verify the `SQLite` migrations apply, match, and revert
    #[command(visible_alias = "vm")]
    VerifyMigrations,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => cargo(&["build", "--workspace", "--all-targets"]),
            Self::Check => cargo(&["check", "--workspace", "--all-targets"]),
            Self::Lint => lint(),
            Self::LintClippy => lint_clippy(),
            Self::LintDocs => lint_docs(),
            Self::LintFormatting => cargo(&["fmt", "--all", "--check"]),
            Self::LintTypos => lint_typos(),
            Self::Fix => fix(),
            Self::Test => cargo(&["test", "--workspace", "--all-targets"]),
            Self::VerifyMigrations => verify_migrations(),
        }
    }
}

fn ci() -> Result<()> {
    lint()?;
    Command::Build.run()?;
    Command::Test.run()?;
    verify_migrations()
}

fn lint() -> Result<()> {
    lint_clippy()?;
    lint_docs()?;
    Command::LintFormatting.run()?;
    lint_typos()
}

fn lint_clippy() -> Result<()> {
    cargo(&[
        "clippy",
        "--workspace",
        "--all-targets",
        "--",
        "-D",
        "warnings",
    ])
}

fn fix() -> Result<()> {
    cargo(&[
        "clippy",
        "--workspace",
        "--all-targets",
        "--fix",
        "--allow-dirty",
        "--allow-staged",
    ])?;
    cargo(&["fmt", "--all"])
}

/// Builds each library crate's docs separately so a broken intra-doc link
/// names the crate it lives in.
fn lint_docs() -> Result<()> {
    let meta = MetadataCommand::new()
        .no_deps()
        .exec()
        .wrap_err("failed to read workspace metadata")?;

    for package in meta.workspace_packages() {
        if package.name.as_str() == "xtask" {
            continue;
        }
        cmd("cargo", ["doc", "--no-deps", "--package", package.name.as_str()])
            .env("RUSTDOCFLAGS", "-D warnings")
            .run_with_trace()?;
    }
    Ok(())
}

fn lint_typos() -> Result<()> {
    cmd!("typos").run_with_trace()?;
    Ok(())
}

fn cargo(args: &[&str]) -> Result<()> {
    cmd("cargo", args.iter().copied()).run_with_trace()?;
    Ok(())
}

/// Verify the rota migrations produce the expected `SQLite` schema
///
/// ## What This Command Does
///
/// 1. Applies the embedded migrations to an in-memory `SQLite` database
/// 2. Introspects the resulting schema (tables, columns, types, constraints)
/// 3. Compares it structurally against the schema the persistence layer expects
/// 4. Reverts every migration and checks no tables are left behind
///
/// ## Usage
///
/// ```bash
/// cargo xtask verify-migrations
/// ```
///
/// ## Failures
///
/// The command fails if a migration does not apply or revert cleanly, or if
/// the applied schema differs from the expected one.
fn verify_migrations() -> Result<()> {
    use diesel::Connection;
    use diesel_migrations::{embed_migrations, MigrationHarness};

    const MIGRATIONS: diesel_migrations::EmbeddedMigrations =
        embed_migrations!("../crates/persistence/migrations");

    tracing::info!("Starting migration verification");

    let mut conn = SqliteConnection::establish(":memory:")
        .wrap_err("Failed to create SQLite in-memory database")?;

    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut conn)
        .wrap_err("Failed to enable foreign keys on SQLite")?;

    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| eyre!("Failed to apply migrations: {e}"))?;
    tracing::info!("Applied {} migration(s)", applied.len());

    let actual = introspect_schema(&mut conn)?;
    compare_schemas(&expected_schema(), &actual)?;
    tracing::info!("Applied schema matches the expected schema");

    let reverted = conn
        .revert_all_migrations(MIGRATIONS)
        .map_err(|e| eyre!("Failed to revert migrations: {e}"))?;
    tracing::info!("Reverted {} migration(s)", reverted.len());

    let leftover = introspect_schema(&mut conn)?;
    if !leftover.tables.is_empty() {
        let names: Vec<&String> = leftover.tables.keys().collect();
        return Err(eyre!("Down migrations left tables behind: {names:?}"));
    }

    tracing::info!("Migration verification passed");
    Ok(())
}

/// Normalized schema representation
#[derive(Debug, Clone, PartialEq, Eq)]
struct Schema {
    tables: BTreeMap<String, Table>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Table {
    columns: BTreeMap<String, Column>,
    primary_keys: BTreeSet<String>,
    foreign_keys: BTreeSet<ForeignKey>,
    unique_constraints: BTreeSet<Vec<String>>,
    indexes: BTreeSet<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Column {
    normalized_type: String,
    nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ForeignKey {
    from_column: String,
    to_table: String,
    to_column: String,
}

impl Table {
    fn column(mut self, name: &str, normalized_type: &str, nullable: bool) -> Self {
        self.columns.insert(
            name.to_string(),
            Column {
                normalized_type: normalized_type.to_string(),
                nullable,
            },
        );
        self
    }

    fn primary_key(mut self, name: &str) -> Self {
        self.primary_keys.insert(name.to_string());
        self
    }

    fn foreign_key(mut self, from_column: &str, to_table: &str, to_column: &str) -> Self {
        self.foreign_keys.insert(ForeignKey {
            from_column: from_column.to_string(),
            to_table: to_table.to_string(),
            to_column: to_column.to_string(),
        });
        self
    }

    fn unique(mut self, columns: &[&str]) -> Self {
        self.unique_constraints
            .insert(columns.iter().map(ToString::to_string).collect());
        self
    }

    fn index(mut self, columns: &[&str]) -> Self {
        self.indexes
            .insert(columns.iter().map(ToString::to_string).collect());
        self
    }
}

/// The schema `rota-persistence` reads and writes.
fn expected_schema() -> Schema {
    let people = Table::default()
        .column("person_id", "text", false)
        .column("name", "text", false)
        .column("role", "text", false)
        .column("pool_position", "integer", true)
        .primary_key("person_id");

    let holidays = Table::default()
        .column("holiday_date", "text", false)
        .column("name", "text", false)
        .column("category", "text", false)
        .primary_key("holiday_date");

    let absences = Table::default()
        .column("absence_id", "integer", false)
        .column("person_id", "text", false)
        .column("start_date", "text", false)
        .column("length_days", "integer", false)
        .column("reason", "text", false)
        .primary_key("absence_id")
        .foreign_key("person_id", "people", "person_id")
        .index(&["person_id", "start_date"]);

    let assignments = Table::default()
        .column("assignment_id", "text", false)
        .column("assignment_date", "text", false)
        .column("person_id", "text", false)
        .column("status", "text", false)
        .column("note", "text", true)
        .primary_key("assignment_id")
        .unique(&["assignment_date", "person_id"])
        .index(&["assignment_date"]);

    Schema {
        tables: BTreeMap::from([
            ("absences".to_string(), absences),
            ("assignments".to_string(), assignments),
            ("holidays".to_string(), holidays),
            ("people".to_string(), people),
        ]),
    }
}

/// Introspect a `SQLite` schema
fn introspect_schema(conn: &mut SqliteConnection) -> Result<Schema> {
    #[derive(QueryableByName)]
    struct TableName {
        #[diesel(sql_type = Text)]
        name: String,
    }

    #[derive(QueryableByName)]
    struct ColumnInfo {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        r#type: String,
        #[diesel(sql_type = Integer)]
        notnull: i32,
        #[diesel(sql_type = Integer)]
        pk: i32,
    }

    #[derive(QueryableByName)]
    struct ForeignKeyInfo {
        #[diesel(sql_type = Text)]
        table: String,
        #[diesel(sql_type = Text)]
        from: String,
        #[diesel(sql_type = Text)]
        to: String,
    }

    #[derive(QueryableByName)]
    struct IndexInfo {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        origin: String,
    }

    #[derive(QueryableByName)]
    struct IndexColumnInfo {
        #[diesel(sql_type = Text)]
        name: String,
    }

    let mut schema = Schema {
        tables: BTreeMap::new(),
    };

    let tables: Vec<TableName> = diesel::sql_query(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name != '__diesel_schema_migrations' ORDER BY name"
    )
    .load(conn)
    .wrap_err("Failed to query SQLite tables")?;

    for table in tables {
        let mut table_info = Table::default();

        let columns: Vec<ColumnInfo> =
            diesel::sql_query(format!("PRAGMA table_info({})", table.name))
                .load(conn)
                .wrap_err(format!("Failed to get columns for table {}", table.name))?;

        for col in columns {
            if col.pk > 0 {
                table_info.primary_keys.insert(col.name.clone());
            }
            table_info.columns.insert(
                col.name,
                Column {
                    normalized_type: normalize_sqlite_type(&col.r#type),
                    nullable: col.notnull == 0,
                },
            );
        }

        let fks: Vec<ForeignKeyInfo> =
            diesel::sql_query(format!("PRAGMA foreign_key_list({})", table.name))
                .load(conn)
                .wrap_err(format!(
                    "Failed to get foreign keys for table {}",
                    table.name
                ))?;

        for fk in fks {
            table_info.foreign_keys.insert(ForeignKey {
                from_column: fk.from,
                to_table: fk.table,
                to_column: fk.to,
            });
        }

        let indexes: Vec<IndexInfo> =
            diesel::sql_query(format!("PRAGMA index_list({})", table.name))
                .load(conn)
                .wrap_err(format!("Failed to get indexes for table {}", table.name))?;

        for idx in indexes {
            let index_columns: Vec<IndexColumnInfo> =
                diesel::sql_query(format!("PRAGMA index_info({})", idx.name))
                    .load(conn)
                    .wrap_err(format!("Failed to get index columns for {}", idx.name))?;

            let column_names: Vec<String> = index_columns.into_iter().map(|c| c.name).collect();

            // origin 'u' is a UNIQUE constraint, 'pk' the primary key's autoindex
            if idx.origin == "u" {
                table_info.unique_constraints.insert(column_names);
            } else if idx.origin == "c" {
                table_info.indexes.insert(column_names);
            }
        }

        schema.tables.insert(table.name, table_info);
    }

    Ok(schema)
}

/// Normalize a `SQLite` declared type to its affinity
fn normalize_sqlite_type(sqlite_type: &str) -> String {
    let normalized = sqlite_type.to_uppercase();
    if normalized.contains("INT") {
        "integer".to_string()
    } else if normalized.contains("REAL")
        || normalized.contains("FLOA")
        || normalized.contains("DOUB")
    {
        "real".to_string()
    } else if normalized.contains("BLOB") {
        "blob".to_string()
    } else {
        "text".to_string()
    }
}

/// Compare schemas and fail on mismatch
fn compare_schemas(expected: &Schema, actual: &Schema) -> Result<()> {
    let expected_tables: BTreeSet<_> = expected.tables.keys().collect();
    let actual_tables: BTreeSet<_> = actual.tables.keys().collect();

    if expected_tables != actual_tables {
        let mut errors = Vec::new();

        for table in expected_tables.difference(&actual_tables) {
            errors.push(format!("  - Table '{table}' is missing"));
        }

        for table in actual_tables.difference(&expected_tables) {
            errors.push(format!("  - Table '{table}' is unexpected"));
        }

        return Err(eyre!(
            "Schema check FAILED: Table mismatch\n{}",
            errors.join("\n")
        ));
    }

    for (table_name, expected_table) in &expected.tables {
        let actual_table = &actual.tables[table_name];

        if expected_table.columns != actual_table.columns {
            return Err(eyre!(
                "Schema check FAILED: Column mismatch in table '{table_name}'\n  Expected: {:?}\n  Actual: {:?}",
                expected_table.columns,
                actual_table.columns
            ));
        }

        if expected_table.primary_keys != actual_table.primary_keys {
            return Err(eyre!(
                "Schema check FAILED: Primary key mismatch in table '{table_name}'\n  Expected: {:?}\n  Actual: {:?}",
                expected_table.primary_keys,
                actual_table.primary_keys
            ));
        }

        if expected_table.foreign_keys != actual_table.foreign_keys {
            return Err(eyre!(
                "Schema check FAILED: Foreign key mismatch in table '{table_name}'\n  Expected: {:?}\n  Actual: {:?}",
                expected_table.foreign_keys,
                actual_table.foreign_keys
            ));
        }

        if expected_table.unique_constraints != actual_table.unique_constraints {
            return Err(eyre!(
                "Schema check FAILED: Unique constraint mismatch in table '{table_name}'\n  Expected: {:?}\n  Actual: {:?}",
                expected_table.unique_constraints,
                actual_table.unique_constraints
            ));
        }

        if expected_table.indexes != actual_table.indexes {
            return Err(eyre!(
                "Schema check FAILED: Index mismatch in table '{table_name}'\n  Expected: {:?}\n  Actual: {:?}",
                expected_table.indexes,
                actual_table.indexes
            ));
        }
    }

    Ok(())
}

/// An extension trait for `duct::Expression` that logs the command being run
/// before running it.
trait ExpressionExt {
    /// Run the command and log the command being run
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            // The command that was run may have scrolled off the screen, so repeat it here
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}

//! Standing check that version-scoped indexes follow the score version, plus
//! fixtures showing the guard catches drift.

use cinescore_data::schema::{version_scoped_indexes, CURRENT_SCORE_VERSION, VERSION_SCOPED_INDEXES};
use cinescore_data::version_guard::{
    check_migrations, check_schema_source, latest_create_index, migration_files, verify,
    GuardViolation,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SCHEMA_SOURCE: &str = include_str!("../src/schema.rs");

fn migrations_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations")
}

/// Copy of the real migration history that fixtures can extend
fn migrations_copy() -> TempDir {
    let dir = TempDir::new().unwrap();
    for path in migration_files(&migrations_dir()).unwrap() {
        fs::copy(&path, dir.path().join(path.file_name().unwrap())).unwrap();
    }
    dir
}

fn scoped_statement(index: &str, column: &str, version: i16) -> String {
    format!(
        "CREATE INDEX \"{index}\" ON \"movies\" USING btree (\"{column}\") WHERE \"movies\".\"{column}\" is not null and \"movies\".\"score_version\" = {version};\n"
    )
}

#[test]
fn test_schema_and_migrations_agree_with_score_version() {
    let report = verify(SCHEMA_SOURCE, &migrations_dir()).unwrap();
    assert!(report.is_ok(), "{report}");
}

#[test]
fn test_latest_migration_matches_schema_definition() {
    for index in version_scoped_indexes() {
        let latest = latest_create_index(&migrations_dir(), index.name)
            .unwrap()
            .unwrap_or_else(|| panic!("no migration creates {}", index.name));
        assert_eq!(latest.statement, index.create_statement(), "{}", index.name);
    }
}

#[test]
fn test_migrations_are_read_in_numeric_order() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("10_late.sql"), "").unwrap();
    fs::write(dir.path().join("2_early.sql"), "").unwrap();
    fs::write(dir.path().join("notes.sql"), "").unwrap();
    fs::write(dir.path().join("0003_readme.md"), "").unwrap();

    let names: Vec<_> = migration_files(dir.path())
        .unwrap()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["2_early.sql", "10_late.sql"]);
}

#[test]
fn test_bumped_version_without_migration_fails() {
    let violations = check_migrations(&migrations_dir(), CURRENT_SCORE_VERSION + 1).unwrap();

    assert_eq!(violations.len(), VERSION_SCOPED_INDEXES.len());
    assert!(violations.iter().all(|v| matches!(
        v,
        GuardViolation::VersionMismatch { found, .. } if *found == i64::from(CURRENT_SCORE_VERSION)
    )));
}

#[test]
fn test_later_migration_with_old_literal_fails() {
    let dir = migrations_copy();
    fs::write(
        dir.path().join("0002_revert_top.sql"),
        scoped_statement("idx_movies_top", "overall_score", 1),
    )
    .unwrap();

    let violations = check_migrations(dir.path(), CURRENT_SCORE_VERSION).unwrap();
    assert_eq!(
        violations,
        vec![GuardViolation::VersionMismatch {
            index: "idx_movies_top".to_string(),
            file: "0002_revert_top.sql".to_string(),
            found: 1,
            expected: CURRENT_SCORE_VERSION,
        }]
    );
}

#[test]
fn test_unscoped_recreation_fails() {
    let dir = migrations_copy();
    fs::write(
        dir.path().join("0002_unscoped.sql"),
        "CREATE INDEX \"idx_movies_divisive\" ON \"movies\" USING btree (\"disagreement\");\n",
    )
    .unwrap();

    let violations = check_migrations(dir.path(), CURRENT_SCORE_VERSION).unwrap();
    assert_eq!(
        violations,
        vec![GuardViolation::UnscopedIndex {
            index: "idx_movies_divisive".to_string(),
            file: "0002_unscoped.sql".to_string(),
        }]
    );
}

#[test]
fn test_missing_migration_statement_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("0000_partial.sql"),
        scoped_statement("idx_movies_top", "overall_score", CURRENT_SCORE_VERSION),
    )
    .unwrap();

    let violations = check_migrations(dir.path(), CURRENT_SCORE_VERSION).unwrap();
    assert_eq!(violations.len(), VERSION_SCOPED_INDEXES.len() - 1);
    assert!(violations
        .iter()
        .all(|v| matches!(v, GuardViolation::MissingMigration { .. })));
}

#[test]
fn test_hardcoded_literal_in_schema_fails() {
    let tampered = format!("{SCHEMA_SOURCE}\nconst TOP_GATE: &str = \"\\\"movies\\\".\\\"score_version\\\" = 2\";\n");

    let violations = check_schema_source(&tampered).unwrap();
    assert!(matches!(
        violations.as_slice(),
        [GuardViolation::HardcodedVersion { .. }]
    ));
}

#[test]
fn test_gate_with_literal_version_in_schema_fails() {
    assert!(SCHEMA_SOURCE.contains("rank_quality_gate(CURRENT_SCORE_VERSION)"));
    let tampered = SCHEMA_SOURCE.replace(
        "rank_quality_gate(CURRENT_SCORE_VERSION)",
        "rank_quality_gate(2)",
    );

    let violations = check_schema_source(&tampered).unwrap();
    assert!(matches!(
        violations.as_slice(),
        [GuardViolation::GateArgument { argument, .. }] if argument == "2"
    ));
}

#[test]
fn test_unreadable_migration_directory_is_an_error() {
    let missing = Path::new(env!("CARGO_MANIFEST_DIR")).join("no_such_migrations");
    assert!(verify(SCHEMA_SOURCE, &missing).is_err());
}

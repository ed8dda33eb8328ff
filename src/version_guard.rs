//! # Score Version Guard
//!
//! Standing check that the version-scoped `movies` indexes and
//! [`CURRENT_SCORE_VERSION`] never drift apart:
//!
//! 1. The schema source must render every version-scoped predicate from the
//!    constant. A hand-written `score_version = <n>` literal is a violation,
//!    and so is a `rank_quality_gate(..)` call given anything else.
//! 2. For each version-scoped index, the most recent `CREATE INDEX` in the
//!    migration history must filter on `"score_version" = <current version>`.
//!
//! Runs from the test suite against `src/schema.rs` and `migrations/`, never
//! on the request path.

use crate::error::{DataLayerError, Result};
use crate::schema::{CURRENT_SCORE_VERSION, VERSION_SCOPED_INDEXES};
use regex::Regex;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// One way schema and migrations can disagree with the score version
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardViolation {
    #[error("Hardcoded score version at line {line}: `{text}`; render predicates from CURRENT_SCORE_VERSION")]
    HardcodedVersion { line: usize, text: String },

    #[error("rank_quality_gate called with `{argument}` at line {line}; pass CURRENT_SCORE_VERSION")]
    GateArgument { line: usize, argument: String },

    #[error("Schema source never references CURRENT_SCORE_VERSION")]
    MissingVersionConstant,

    #[error("Missing schema definition for {index}")]
    MissingIndexDefinition { index: String },

    #[error("Missing CREATE INDEX migration statement for {index}")]
    MissingMigration { index: String },

    #[error("Index {index} in {file} is not score_version scoped")]
    UnscopedIndex { index: String, file: String },

    #[error("Index {index} in {file} has score_version = {found}, but CURRENT_SCORE_VERSION is {expected}; add a migration that drops and recreates the version-scoped indexes")]
    VersionMismatch {
        index: String,
        file: String,
        found: i64,
        expected: i16,
    },
}

/// Everything one guard run found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuardReport {
    pub violations: Vec<GuardViolation>,
}

impl GuardReport {
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn into_result(self) -> Result<()> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(DataLayerError::VersionGuard(self.to_string()))
        }
    }
}

impl fmt::Display for GuardReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.violations.is_empty() {
            return write!(f, "score version guard passed");
        }
        writeln!(f, "{} score version violation(s):", self.violations.len())?;
        for violation in &self.violations {
            writeln!(f, "  - {violation}")?;
        }
        Ok(())
    }
}

/// Latest `CREATE INDEX` found for one index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexStatement {
    pub file: String,
    pub statement: String,
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| DataLayerError::VersionGuard(format!("Invalid guard pattern {pattern}: {e}")))
}

/// Scan schema source text for hand-written version literals and missing
/// index definitions
pub fn check_schema_source(source: &str) -> Result<Vec<GuardViolation>> {
    let hardcoded = compile(r#"score_version\\?"?\s*=\s*\d+"#)?;
    let gate_call = compile(r"rank_quality_gate\s*\(\s*([^)]*?)\s*\)")?;
    let mut violations = Vec::new();

    for (number, line) in source.lines().enumerate() {
        if let Some(found) = hardcoded.find(line) {
            violations.push(GuardViolation::HardcodedVersion {
                line: number + 1,
                text: found.as_str().to_string(),
            });
        }

        for call in gate_call.captures_iter(line) {
            let (Some(whole), Some(argument)) = (call.get(0), call.get(1)) else {
                continue;
            };
            // The definition itself takes a parameter, not an argument
            if line[..whole.start()].trim_end().ends_with("fn") {
                continue;
            }
            if argument.as_str() != "CURRENT_SCORE_VERSION" {
                violations.push(GuardViolation::GateArgument {
                    line: number + 1,
                    argument: argument.as_str().to_string(),
                });
            }
        }
    }

    if !source.contains("CURRENT_SCORE_VERSION") {
        violations.push(GuardViolation::MissingVersionConstant);
    }

    for index in VERSION_SCOPED_INDEXES {
        if !source.contains(&format!("\"{index}\"")) {
            violations.push(GuardViolation::MissingIndexDefinition {
                index: index.to_string(),
            });
        }
    }

    Ok(violations)
}

/// `NNNN_*.sql` files in numeric order
pub fn migration_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| {
        DataLayerError::VersionGuard(format!("Cannot read {}: {e}", dir.display()))
    })?;

    let mut numbered = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| DataLayerError::VersionGuard(e.to_string()))?
            .path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.ends_with(".sql") {
            continue;
        }
        let Some((prefix, _)) = name.split_once('_') else {
            continue;
        };
        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        if let Ok(order) = prefix.parse::<u64>() {
            numbered.push((order, path));
        }
    }

    numbered.sort();
    Ok(numbered.into_iter().map(|(_, path)| path).collect())
}

/// Most recent `CREATE INDEX "<index>" ... ;` across the migration history
pub fn latest_create_index(dir: &Path, index: &str) -> Result<Option<IndexStatement>> {
    let pattern = compile(&format!(
        r#"CREATE (?:UNIQUE )?INDEX (?:IF NOT EXISTS )?"{}"[\s\S]*?;"#,
        regex::escape(index)
    ))?;

    let mut latest = None;
    for path in migration_files(dir)? {
        let source = fs::read_to_string(&path).map_err(|e| {
            DataLayerError::VersionGuard(format!("Cannot read {}: {e}", path.display()))
        })?;
        if let Some(found) = pattern.find_iter(&source).last() {
            let file = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            latest = Some(IndexStatement {
                file,
                statement: found.as_str().to_string(),
            });
        }
    }

    Ok(latest)
}

/// Check the latest statement for every version-scoped index against `version`
pub fn check_migrations(dir: &Path, version: i16) -> Result<Vec<GuardViolation>> {
    let scoped = compile(r#""score_version"\s*=\s*(\d+)"#)?;
    let mut violations = Vec::new();

    for index in VERSION_SCOPED_INDEXES {
        let Some(latest) = latest_create_index(dir, index)? else {
            violations.push(GuardViolation::MissingMigration {
                index: index.to_string(),
            });
            continue;
        };

        let found = scoped
            .captures(&latest.statement)
            .and_then(|captures| captures.get(1))
            .and_then(|digits| digits.as_str().parse::<i64>().ok());

        match found {
            None => violations.push(GuardViolation::UnscopedIndex {
                index: index.to_string(),
                file: latest.file,
            }),
            Some(found) if found != i64::from(version) => {
                violations.push(GuardViolation::VersionMismatch {
                    index: index.to_string(),
                    file: latest.file,
                    found,
                    expected: version,
                })
            }
            Some(_) => {}
        }
    }

    Ok(violations)
}

/// Run both checks against [`CURRENT_SCORE_VERSION`]
pub fn verify(schema_source: &str, migrations_dir: &Path) -> Result<GuardReport> {
    let mut violations = check_schema_source(schema_source)?;
    violations.extend(check_migrations(migrations_dir, CURRENT_SCORE_VERSION)?);
    Ok(GuardReport { violations })
}

//! # Movies Schema Indexes
//!
//! Index definitions for the `movies` table. The ranked-list indexes are
//! partial indexes whose predicate includes a quality gate scoped to the
//! current score version, so rows persisted under an older scoring model
//! drop out of ranked queries until they are rescored.
//!
//! Predicates render the version from [`CURRENT_SCORE_VERSION`]; never write
//! the number into a predicate by hand. Bumping the constant requires a
//! migration that drops and recreates every version-scoped index (checked by
//! [`crate::version_guard`]).

/// Score version for persisted movie scores and version-scoped indexes
///
/// Bump only when weights or scoring behavior change, together with a
/// migration recreating the version-scoped indexes.
pub const CURRENT_SCORE_VERSION: i16 = 2;

pub const MOVIES_TABLE: &str = "movies";

/// Partial indexes whose predicate is scoped to the current score version
pub const VERSION_SCOPED_INDEXES: [&str; 5] = [
    "idx_movies_top",
    "idx_movies_divisive",
    "idx_movies_top_balanced",
    "idx_movies_top_mainstream",
    "idx_movies_year_overall_top",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexMethod {
    BTree,
    Gin,
}

impl IndexMethod {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::BTree => "btree",
            Self::Gin => "gin",
        }
    }
}

/// One index on the `movies` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDefinition {
    pub name: &'static str,
    pub unique: bool,
    pub method: IndexMethod,
    /// Rendered key expressions, e.g. `"overall_score" DESC`
    pub columns: Vec<String>,
    /// Rendered `WHERE` predicate for partial indexes
    pub predicate: Option<String>,
}

impl IndexDefinition {
    fn on(name: &'static str, method: IndexMethod, columns: Vec<String>) -> Self {
        Self {
            name,
            unique: false,
            method,
            columns,
            predicate: None,
        }
    }

    fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    fn filtered(mut self, predicate: String) -> Self {
        self.predicate = Some(predicate);
        self
    }

    pub fn is_version_scoped(&self) -> bool {
        VERSION_SCOPED_INDEXES.contains(&self.name)
    }

    /// `CREATE INDEX` DDL in the same shape the migrations use
    pub fn create_statement(&self) -> String {
        let unique = if self.unique { "UNIQUE " } else { "" };
        let mut statement = format!(
            "CREATE {}INDEX \"{}\" ON \"{}\" USING {} ({})",
            unique,
            self.name,
            MOVIES_TABLE,
            self.method.as_sql(),
            self.columns.join(","),
        );
        if let Some(predicate) = &self.predicate {
            statement.push_str(" WHERE ");
            statement.push_str(predicate);
        }
        statement.push(';');
        statement
    }

    pub fn drop_statement(&self) -> String {
        format!("DROP INDEX IF EXISTS \"{}\";", self.name)
    }
}

fn column(name: &str) -> String {
    format!("\"{}\"", name)
}

fn qualified(name: &str) -> String {
    format!("\"{}\".\"{}\"", MOVIES_TABLE, name)
}

/// Coverage threshold plus the score version scope shared by every ranked index
pub fn rank_quality_gate(version: i16) -> String {
    format!(
        "{} >= 0.70 and {} = {}",
        qualified("coverage"),
        qualified("score_version"),
        version
    )
}

fn ranked_predicate(not_null: &[&str]) -> String {
    let mut clauses: Vec<String> = not_null
        .iter()
        .map(|name| format!("{} is not null", qualified(name)))
        .collect();
    clauses.push(rank_quality_gate(CURRENT_SCORE_VERSION));
    clauses.join(" and ")
}

/// Every index on the `movies` table
pub fn movies_indexes() -> Vec<IndexDefinition> {
    use IndexMethod::{BTree, Gin};

    vec![
        IndexDefinition::on("idx_movies_year", BTree, vec![column("year")]),
        IndexDefinition::on("idx_movies_genres_gin", Gin, vec![column("genres")]),
        IndexDefinition::on("idx_movies_moods_gin", Gin, vec![column("moods")]),
        IndexDefinition::on(
            "idx_movies_watch_providers_gin",
            Gin,
            vec![column("watch_provider_ids")],
        ),
        IndexDefinition::on(
            "idx_movies_directors_coalesce_gin",
            Gin,
            vec![format!(
                "COALESCE({}, ARRAY[{}])",
                qualified("directors"),
                qualified("director")
            )],
        ),
        IndexDefinition::on("idx_movies_last_fetched", BTree, vec![column("last_fetched_at")]),
        IndexDefinition::on("idx_movies_score_version", BTree, vec![column("score_version")]),
        IndexDefinition::on("idx_movies_tmdb_id", BTree, vec![column("tmdb_id")])
            .unique()
            .filtered(format!("{} is not null", qualified("tmdb_id"))),
        // Ranked list indexes
        IndexDefinition::on("idx_movies_top", BTree, vec![column("overall_score")])
            .filtered(ranked_predicate(&["overall_score"])),
        IndexDefinition::on("idx_movies_divisive", BTree, vec![column("disagreement")])
            .filtered(ranked_predicate(&["overall_score"])),
        IndexDefinition::on("idx_movies_top_balanced", BTree, vec![column("score_balanced")])
            .filtered(ranked_predicate(&["score_balanced"])),
        IndexDefinition::on("idx_movies_top_mainstream", BTree, vec![column("score_mainstream")])
            .filtered(ranked_predicate(&["score_mainstream"])),
        IndexDefinition::on(
            "idx_movies_year_overall_top",
            BTree,
            vec![column("year"), format!("{} DESC", column("overall_score"))],
        )
        .filtered(ranked_predicate(&["year", "overall_score"])),
    ]
}

/// The version-scoped subset of [`movies_indexes`]
pub fn version_scoped_indexes() -> Vec<IndexDefinition> {
    movies_indexes()
        .into_iter()
        .filter(IndexDefinition::is_version_scoped)
        .collect()
}

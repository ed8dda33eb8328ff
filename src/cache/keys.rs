//! Cache key formats. These are shared with other deployments reading the
//! same store and must not change.

/// `score:<id>`
pub fn score_key(id: &str) -> String {
    format!("score:{id}")
}

/// `search:<lowercased-query>|<year-or-empty>`
pub fn search_key(query: &str, year: Option<i32>) -> String {
    let year = year.map(|y| y.to_string()).unwrap_or_default();
    format!("search:{}|{year}", query.to_lowercase())
}

/// `theme:<id>:<theme id>`
pub fn theme_key(id: &str, theme_id: &str) -> String {
    format!("theme:{id}:{theme_id}")
}

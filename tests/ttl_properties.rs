use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use cinescore_data::cache::ttl::{
    compute_ttl, LONG_TTL_SECONDS, MEDIUM_TTL_SECONDS, SHORT_TTL_SECONDS,
};
use proptest::prelude::*;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
}

fn released(age_days: i64) -> String {
    (now() - Duration::days(age_days)).to_rfc3339()
}

proptest! {
    /// Property: older content never expires sooner than newer content
    #[test]
    fn ttl_is_monotonic_in_release_age(a in -400i64..4000, b in -400i64..4000) {
        let (younger, older) = if a <= b { (a, b) } else { (b, a) };
        let young_ttl = compute_ttl(Some(&released(younger)), None, now()).unwrap();
        let old_ttl = compute_ttl(Some(&released(older)), None, now()).unwrap();
        prop_assert!(young_ttl <= old_ttl);
    }

    /// Property: a parseable date always yields one of the three tiers
    #[test]
    fn ttl_is_always_a_known_tier(age in -1000i64..20000) {
        let ttl = compute_ttl(Some(&released(age)), None, now());
        prop_assert!(matches!(
            ttl,
            Some(SHORT_TTL_SECONDS) | Some(MEDIUM_TTL_SECONDS) | Some(LONG_TTL_SECONDS)
        ));
    }

    /// Property: a parseable date wins over any year
    #[test]
    fn release_date_takes_precedence_over_year(age in 0i64..3000, year in 1900i32..2100) {
        let date = released(age);
        let year = year.to_string();
        prop_assert_eq!(
            compute_ttl(Some(&date), Some(&year), now()),
            compute_ttl(Some(&date), None, now())
        );
    }

    /// Property: year fallback is monotonic in calendar age
    #[test]
    fn year_fallback_is_monotonic(a in 1900i32..2100, b in 1900i32..2100) {
        let (older, younger) = if a <= b { (a, b) } else { (b, a) };
        let old_ttl = compute_ttl(None, Some(&older.to_string()), now()).unwrap();
        let young_ttl = compute_ttl(None, Some(&younger.to_string()), now()).unwrap();
        prop_assert!(young_ttl <= old_ttl);
    }

    /// Property: any year the parser accepts yields a tier or no caching, never a panic
    #[test]
    fn any_integer_year_is_handled(year in any::<i32>()) {
        let ttl = compute_ttl(None, Some(&year.to_string()), now());
        prop_assert!(matches!(
            ttl,
            None | Some(SHORT_TTL_SECONDS) | Some(MEDIUM_TTL_SECONDS) | Some(LONG_TTL_SECONDS)
        ));
    }

    /// Property: text without a leading number never caches
    #[test]
    fn non_numeric_year_means_no_caching(text in "[a-zA-Z ]{0,12}") {
        prop_assert_eq!(compute_ttl(None, Some(&text), now()), None);
    }
}

#[test]
fn year_equal_to_current_year_is_short() {
    let year = now().year().to_string();
    assert_eq!(compute_ttl(None, Some(&year), now()), Some(SHORT_TTL_SECONDS));
}

// Property-based tests for normalization and planning.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

mod helpers;

use std::collections::HashSet;

use helpers::sources_unique;
use profmerge::dedup::distance::distance;
use profmerge::dedup::names::{normalize, words_swapped};
use profmerge::dedup::{ActionKind, MatchConfig, NameRecord, classify, plan_roster, plan_self_merge};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

const GIVEN: &[&str] = &["John", "Jon", "Asel", "Erin", "Nehal", "Dana", "Асель"];
const FAMILY: &[&str] = &[
    "Smith",
    "Smyth",
    "Aitbayeva",
    "O'Brien",
    "Abu-Lail",
    "Nurkanat",
    "Li",
];
const TAGS: &[&str] = &["", "", "", " - CHIN", " -ENG", " – kz", "  - EN sec 2", " Vacancy"];

/// Free-form text with the separators normalization cares about.
fn arb_raw_text() -> impl Strategy<Value = String> {
    r"[A-Za-zа-яА-Я' \t\-–—]{0,40}"
}

/// A plausible professor name from a small pool, so collisions are common.
fn arb_name() -> impl Strategy<Value = String> {
    (
        prop::sample::select(GIVEN),
        prop::sample::select(FAMILY),
        prop::sample::select(TAGS),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(given, family, tag, swap, lower)| {
            let name = if swap {
                format!("{family} {given}{tag}")
            } else {
                format!("{given} {family}{tag}")
            };
            if lower { name.to_lowercase() } else { name }
        })
}

fn arb_records() -> impl Strategy<Value = Vec<NameRecord>> {
    prop::collection::vec(arb_name(), 0..16).prop_map(|names| {
        names
            .into_iter()
            .enumerate()
            .map(|(id, name)| NameRecord::new(id, name))
            .collect()
    })
}

fn arb_roster() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_name(), 0..8)
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn normalize_is_idempotent(raw in arb_raw_text()) {
        let once = normalize(&raw);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalize_output_is_trimmed_and_collapsed(raw in arb_raw_text()) {
        let out = normalize(&raw);
        prop_assert_eq!(out.trim(), out.as_str());
        prop_assert!(!out.contains("  "));
    }

    #[test]
    fn distance_is_symmetric(a in arb_raw_text(), b in arb_raw_text()) {
        prop_assert_eq!(distance(&a, &b), distance(&b, &a));
        prop_assert_eq!(distance(&a, &a), 0);
    }

    #[test]
    fn swapped_words_is_symmetric(a in arb_name(), b in arb_name()) {
        prop_assert_eq!(words_swapped(&a, &b), words_swapped(&b, &a));
    }

    #[test]
    fn classification_is_symmetric_in_outcome(a in arb_name(), b in arb_name()) {
        let config = MatchConfig::default();
        prop_assert_eq!(
            classify(&a, &b, &config).is_some(),
            classify(&b, &a, &config).is_some()
        );
    }

    #[test]
    fn self_merge_sources_are_unique(records in arb_records()) {
        let plan = plan_self_merge(&records, &MatchConfig::default()).unwrap();
        prop_assert!(sources_unique(&plan));
    }

    #[test]
    fn self_merge_targets_are_never_merged_away(records in arb_records()) {
        let plan = plan_self_merge(&records, &MatchConfig::default()).unwrap();
        let sources: HashSet<_> = plan.actions.iter().map(|a| &a.source_id).collect();
        for action in plan.actions_of(ActionKind::Merge) {
            let target = action.target_id.as_ref().unwrap();
            prop_assert!(!sources.contains(target));
        }
    }

    #[test]
    fn self_merge_is_deterministic(records in arb_records()) {
        let config = MatchConfig::default();
        prop_assert_eq!(
            plan_self_merge(&records, &config).unwrap(),
            plan_self_merge(&records, &config).unwrap()
        );
    }

    #[test]
    fn roster_sources_are_unique(records in arb_records(), roster in arb_roster()) {
        let plan = plan_roster(&records, &roster, &MatchConfig::default()).unwrap();
        prop_assert!(sources_unique(&plan));
    }

    #[test]
    fn roster_accounts_for_every_record(records in arb_records(), roster in arb_roster()) {
        let plan = plan_roster(&records, &roster, &MatchConfig::default()).unwrap();
        prop_assert_eq!(plan.actions.len() + plan.skipped.len(), records.len());
    }

    #[test]
    fn roster_is_deterministic(records in arb_records(), roster in arb_roster()) {
        let config = MatchConfig::default();
        prop_assert_eq!(
            plan_roster(&records, &roster, &config).unwrap(),
            plan_roster(&records, &roster, &config).unwrap()
        );
    }
}

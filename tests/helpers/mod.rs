#![allow(dead_code)]

use std::collections::HashSet;

use profmerge::dedup::{Action, ActionKind, MatchConfig, NameRecord, Plan, RecordId};

/// Build records with integer ids from `(id, name)` pairs.
pub fn records(names: &[(i64, &str)]) -> Vec<NameRecord> {
    names
        .iter()
        .map(|&(id, name)| NameRecord::new(id, name))
        .collect()
}

pub fn self_merge(names: &[(i64, &str)]) -> Plan {
    profmerge::dedup::plan_self_merge(&records(names), &MatchConfig::default())
        .expect("valid records")
}

pub fn reconcile(names: &[(i64, &str)], roster: &[&str]) -> Plan {
    profmerge::dedup::plan_roster(&records(names), roster, &MatchConfig::default())
        .expect("valid records")
}

/// Every action that touches `id` as source or target.
pub fn touching<'p>(plan: &'p Plan, id: i64) -> Vec<&'p Action> {
    let id = RecordId::from(id);
    plan.actions
        .iter()
        .filter(|a| a.source_id == id || a.target_id.as_ref() == Some(&id))
        .collect()
}

pub fn kinds(plan: &Plan) -> Vec<ActionKind> {
    plan.actions.iter().map(|a| a.kind).collect()
}

/// True when no record is the source of more than one action.
pub fn sources_unique(plan: &Plan) -> bool {
    let mut seen = HashSet::new();
    plan.actions.iter().all(|a| seen.insert(&a.source_id))
}

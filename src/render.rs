//! Rendering a [`Plan`] for human review.
//!
//! The SQL form is a single PL/pgSQL `DO` block meant to be read, edited, and
//! run by hand. Nothing here touches a database.

use std::fmt::Write as _;

use yansi::Paint;

use crate::dedup::{Action, ActionKind, Plan, SkipReason};

/// Target names for the generated SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlOptions {
    pub table: String,
    /// Atomic merge primitive, called as `fn(primary_id, duplicate_id)`.
    pub merge_function: String,
}

impl Default for SqlOptions {
    fn default() -> Self {
        Self {
            table: "public.professors".to_owned(),
            merge_function: "merge_professors".to_owned(),
        }
    }
}

/// Quote a value as a SQL string literal.
fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Flatten a value so it cannot break out of a `--` comment line.
fn comment_safe(s: &str) -> String {
    s.replace(['\r', '\n'], " ")
}

fn write_sql_action(out: &mut String, action: &Action, options: &SqlOptions) {
    let source = comment_safe(&action.source_name);
    let target = action.target_name.as_deref().map(comment_safe);
    let reason = comment_safe(&action.reason);

    match (action.kind, &action.target_id, target) {
        (ActionKind::Delete, _, _) => {
            let _ = writeln!(out, "    -- Deleting: \"{source}\"");
            let _ = writeln!(out, "    -- Reason: {reason}");
            let _ = writeln!(
                out,
                "    DELETE FROM {} WHERE id = {};",
                options.table,
                quote(action.source_id.as_str())
            );
        }
        (ActionKind::Merge, Some(target_id), Some(target)) => {
            let _ = writeln!(out, "    -- DB Name: \"{source}\" -> Merging into: \"{target}\"");
            let _ = writeln!(out, "    -- Reason: {reason}");
            let _ = writeln!(
                out,
                "    RAISE NOTICE 'Merging \"%\" into \"%\"', {}, {};",
                quote(&action.source_name),
                quote(action.target_name.as_deref().unwrap_or_default())
            );
            let _ = writeln!(
                out,
                "    PERFORM {}({}, {});",
                options.merge_function,
                quote(target_id.as_str()),
                quote(action.source_id.as_str())
            );
        }
        (ActionKind::Rename, _, Some(target)) => {
            let new_name = action.target_name.as_deref().unwrap_or_default();
            let _ = writeln!(out, "    -- DB Name: \"{source}\" -> Renaming to: \"{target}\"");
            let _ = writeln!(out, "    -- Reason: {reason}");
            let _ = writeln!(
                out,
                "    RAISE NOTICE 'Renaming \"%\" to \"%\"', {}, {};",
                quote(&action.source_name),
                quote(new_name)
            );
            let _ = writeln!(
                out,
                "    UPDATE {} SET name = {} WHERE id = {};",
                options.table,
                quote(new_name),
                quote(action.source_id.as_str())
            );
        }
        (kind, _, _) => {
            let _ = writeln!(
                out,
                "    -- Skipped incomplete {kind} action for id {}",
                comment_safe(action.source_id.as_str())
            );
        }
    }
    out.push('\n');
}

/// Render the plan as a reviewable PL/pgSQL script.
pub fn sql(plan: &Plan, options: &SqlOptions) -> String {
    let mut out = String::new();
    out.push_str(
        "-- ==============================================================================\n\
         -- AUTO-GENERATED PROFESSOR CLEANUP SCRIPT\n\
         -- ==============================================================================\n\
         -- Merges fold the duplicate into the primary; renames update the name in place.\n\
         --\n\
         -- PLEASE REVIEW ALL SUGGESTED CHANGES BEFORE RUNNING.\n\
         -- ==============================================================================\n\n",
    );
    let stats = &plan.stats;
    let _ = writeln!(
        out,
        "-- {} records: {} merges, {} renames, {} deletes, {} clean, {} ambiguous, {} unmatched\n",
        stats.total,
        stats.merges,
        stats.renames,
        stats.deletes,
        stats.clean,
        stats.ambiguous,
        stats.unmatched
    );
    out.push_str("DO $$\nBEGIN\n\n");
    for action in &plan.actions {
        write_sql_action(&mut out, action, options);
    }
    out.push_str("END $$;\n");
    out
}

/// Render the plan as pretty-printed JSON.
pub fn json(plan: &Plan) -> serde_json::Result<String> {
    serde_json::to_string_pretty(plan)
}

/// Render a colored, line-per-decision report for the terminal.
pub fn text(plan: &Plan) -> String {
    let mut out = String::new();
    for action in &plan.actions {
        let kind = match action.kind {
            ActionKind::Delete => "DELETE".red().bold().to_string(),
            ActionKind::Merge => "MERGE ".yellow().bold().to_string(),
            ActionKind::Rename => "RENAME".green().bold().to_string(),
        };
        let target = match (&action.target_id, &action.target_name) {
            (Some(id), Some(name)) => format!(" -> \"{name}\" [{id}]"),
            (None, Some(name)) => format!(" -> \"{name}\""),
            _ => String::new(),
        };
        let _ = writeln!(
            out,
            "{kind} \"{}\" [{}]{target}  {}",
            action.source_name,
            action.source_id,
            action.reason.dim()
        );
    }
    for skipped in plan.skipped.iter().filter(|s| s.reason != SkipReason::Clean) {
        let _ = writeln!(
            out,
            "{} \"{}\" [{}]  {}",
            "SKIP  ".dim(),
            skipped.name,
            skipped.id,
            skipped.reason.to_string().dim()
        );
    }
    let stats = &plan.stats;
    let _ = writeln!(
        out,
        "\n{} records, {} merges, {} renames, {} deletes, {} clean, {} ambiguous, {} unmatched",
        stats.total.bold(),
        stats.merges,
        stats.renames,
        stats.deletes,
        stats.clean,
        stats.ambiguous,
        stats.unmatched
    );
    out
}

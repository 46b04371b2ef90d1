//! Records, verdicts, and action plans exchanged with the engine.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// Opaque record identifier.
///
/// Deserializes from either a JSON string (UUIDs) or an integer, and always
/// serializes back as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(from = "RawId")]
pub struct RecordId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for RecordId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => Self(s),
            RawId::Number(n) => Self(n.to_string()),
        }
    }
}

impl RecordId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

macro_rules! record_id_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for RecordId {
            fn from(n: $t) -> Self {
                Self(n.to_string())
            }
        })*
    };
}

record_id_from_int!(i32, i64, u32, u64, usize);

/// A database row as seen by the engine: an id plus the raw, human-entered name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRecord {
    pub id: RecordId,
    pub name: String,
}

impl NameRecord {
    pub fn new(id: impl Into<RecordId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Which side of a compared pair a property refers to.
///
/// The left side is the primary in self-merge mode and the database name in
/// roster mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

/// Why two names were judged to refer to the same person.
///
/// Variants are declared in cascade priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchReason {
    /// Normalized forms are byte-identical.
    ExactNormalized,
    /// Raw or normalized forms are equal ignoring case.
    CaseInsensitiveExact,
    /// One normalized name contains the other; `longer` is the side with the
    /// extra words.
    ContainsExtraWords { longer: Side },
    /// Same tokens in a different order.
    SwappedWords,
    /// Small edit distance between the lowercased normalized forms.
    Typo { distance: usize },
    /// Subset of exactly one roster entry's tokens.
    UnambiguousPartial,
}

impl MatchReason {
    /// Reasons that settle a match outright, with no ambiguity check.
    pub fn is_decisive(self) -> bool {
        matches!(
            self,
            Self::ExactNormalized | Self::CaseInsensitiveExact | Self::SwappedWords
        )
    }

    pub fn score(self) -> usize {
        match self {
            Self::Typo { distance } => distance,
            _ => 0,
        }
    }
}

impl fmt::Display for MatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExactNormalized => f.write_str("exact normalized match"),
            Self::CaseInsensitiveExact => f.write_str("case-insensitive match"),
            Self::ContainsExtraWords { .. } => f.write_str("extra words/suffix"),
            Self::SwappedWords => f.write_str("swapped words"),
            Self::Typo { distance } => write!(f, "typo (distance {distance})"),
            Self::UnambiguousPartial => f.write_str("unambiguous partial name match"),
        }
    }
}

/// Outcome of a positive comparison. A negative comparison is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchVerdict {
    pub reason: MatchReason,
    /// Edit distance for [`MatchReason::Typo`], zero otherwise.
    pub score: usize,
}

impl From<MatchReason> for MatchVerdict {
    fn from(reason: MatchReason) -> Self {
        Self {
            reason,
            score: reason.score(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Delete,
    Merge,
    Rename,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Delete => "delete",
            Self::Merge => "merge",
            Self::Rename => "rename",
        })
    }
}

/// A proposed change to the external store.
///
/// - `Delete`: remove `source_id`.
/// - `Merge`: fold `source_id` (the duplicate) into `target_id` (the primary).
/// - `Rename`: set the name of `source_id` to `target_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub kind: ActionKind,
    pub source_id: RecordId,
    pub source_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<MatchVerdict>,
    /// Human-readable justification for audit logs.
    pub reason: String,
}

impl Action {
    pub fn delete(record: &NameRecord, reason: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::Delete,
            source_id: record.id.clone(),
            source_name: record.name.clone(),
            target_id: None,
            target_name: None,
            verdict: None,
            reason: reason.into(),
        }
    }

    pub fn merge(
        duplicate: &NameRecord,
        primary_id: &RecordId,
        primary_name: &str,
        verdict: MatchVerdict,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            kind: ActionKind::Merge,
            source_id: duplicate.id.clone(),
            source_name: duplicate.name.clone(),
            target_id: Some(primary_id.clone()),
            target_name: Some(primary_name.to_owned()),
            verdict: Some(verdict),
            reason: reason.into(),
        }
    }

    pub fn rename(
        record: &NameRecord,
        new_name: &str,
        verdict: MatchVerdict,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            kind: ActionKind::Rename,
            source_id: record.id.clone(),
            source_name: record.name.clone(),
            target_id: None,
            target_name: Some(new_name.to_owned()),
            verdict: Some(verdict),
            reason: reason.into(),
        }
    }
}

/// Why a record produced no action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// Name already present verbatim in the roster.
    Clean,
    /// Several roster entries fit equally well; left for manual review.
    Ambiguous { candidates: Vec<String> },
    NoConfidentMatch,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clean => f.write_str("already clean"),
            Self::Ambiguous { candidates } => {
                write!(f, "ambiguous ({} candidates)", candidates.len())
            }
            Self::NoConfidentMatch => f.write_str("no confident match"),
        }
    }
}

/// A roster-mode record that was left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skipped {
    pub id: RecordId,
    pub name: String,
    pub reason: SkipReason,
}

/// Counters for a single planning run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStats {
    /// Records supplied to the run.
    pub total: usize,
    pub merges: usize,
    pub renames: usize,
    pub deletes: usize,
    /// Roster mode: records whose name is already canonical.
    pub clean: usize,
    pub ambiguous: usize,
    /// Roster mode: records with no confident match.
    pub unmatched: usize,
}

/// The engine's output: actions in decision order plus a ledger of skipped records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub actions: Vec<Action>,
    pub skipped: Vec<Skipped>,
    pub stats: PlanStats,
}

impl Plan {
    pub(crate) fn push_action(&mut self, action: Action) {
        match action.kind {
            ActionKind::Delete => self.stats.deletes += 1,
            ActionKind::Merge => self.stats.merges += 1,
            ActionKind::Rename => self.stats.renames += 1,
        }
        self.actions.push(action);
    }

    pub(crate) fn push_skipped(&mut self, record: &NameRecord, reason: SkipReason) {
        match reason {
            SkipReason::Clean => self.stats.clean += 1,
            SkipReason::Ambiguous { .. } => self.stats.ambiguous += 1,
            SkipReason::NoConfidentMatch => self.stats.unmatched += 1,
        }
        self.skipped.push(Skipped {
            id: record.id.clone(),
            name: record.name.clone(),
            reason,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Actions of a single kind, in decision order.
    pub fn actions_of(&self, kind: ActionKind) -> impl Iterator<Item = &Action> {
        self.actions.iter().filter(move |a| a.kind == kind)
    }
}

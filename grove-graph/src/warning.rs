//! Non-fatal problems found while building the graph.

use grove_core::RelationKind;
use serde::Serialize;
use std::fmt;

/// Why a relationship target could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedReason {
    /// No catalog entry has this id.
    Missing,
    /// The target entry exists but is excluded from the graph.
    Excluded,
}

/// A build warning. The graph is still usable; the offending relationship
/// is skipped (or, for self-loops, kept and flagged).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", rename_all = "kebab-case")]
pub enum BuildWarning {
    UnresolvedRelationship {
        source: String,
        target: String,
        reason: UnresolvedReason,
    },
    DuplicateRelationship {
        source: String,
        target: String,
        kept: RelationKind,
        ignored: RelationKind,
    },
    SelfLoop {
        node: String,
    },
}

impl BuildWarning {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnresolvedRelationship { .. } => "unresolved-relationship",
            Self::DuplicateRelationship { .. } => "duplicate-relationship",
            Self::SelfLoop { .. } => "self-loop",
        }
    }

    /// The node that declared the offending relationship.
    pub fn source(&self) -> &str {
        match self {
            Self::UnresolvedRelationship { source, .. }
            | Self::DuplicateRelationship { source, .. } => source,
            Self::SelfLoop { node } => node,
        }
    }
}

impl fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedRelationship {
                source,
                target,
                reason: UnresolvedReason::Missing,
            } => write!(f, "'{}' depends on unknown entry '{}'", source, target),
            Self::UnresolvedRelationship {
                source,
                target,
                reason: UnresolvedReason::Excluded,
            } => write!(f, "'{}' depends on excluded entry '{}'", source, target),
            Self::DuplicateRelationship {
                source,
                target,
                kept,
                ignored,
            } => write!(
                f,
                "'{}' declares '{}' more than once; keeping '{}', ignoring '{}'",
                source, target, kept, ignored
            ),
            Self::SelfLoop { node } => write!(f, "'{}' depends on itself", node),
        }
    }
}

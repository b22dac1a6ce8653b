// crates/iec61850-scl/src/issues.rs

//! Diagnostics collected while resolving and validating a model.
//!
//! Resolution is best-effort: an undefined type or a malformed value becomes an
//! [`Issue`] and only the affected subtree is dropped.

use alloc::collections::BTreeSet;
use alloc::fmt;
use alloc::string::String;
use alloc::vec::Vec;
use log::{error, warn};

/// Category attached to every issue raised by the model checks.
pub const MODEL_INTEGRITY: &str = "Model integrity";

/// Severity of a reported [`Issue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("ERROR"),
            Severity::Warning => f.write_str("WARNING"),
        }
    }
}

/// A single diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Issue {
    pub severity: Severity,
    /// Broad classification, e.g. [`MODEL_INTEGRITY`].
    pub category: &'static str,
    /// Human readable description.
    pub message: String,
    /// The object the issue originates from (an objRef, or the element kind).
    pub object: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.severity, self.category, self.message)
    }
}

/// An ordered, de-duplicated collection of issues.
///
/// Two issues are duplicates when severity, category, message and object are
/// all equal; the first occurrence keeps its position.
#[derive(Debug, Default, Clone)]
pub struct IssueLog {
    issues: Vec<Issue>,
    seen: BTreeSet<Issue>,
}

impl IssueLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an issue unless an identical one is already present.
    /// Returns `true` if the issue was new.
    pub fn push(&mut self, issue: Issue) -> bool {
        if self.seen.contains(&issue) {
            return false;
        }
        match issue.severity {
            Severity::Error => error!("[SCL] {} ({})", issue.message, issue.object),
            Severity::Warning => warn!("[SCL] {} ({})", issue.message, issue.object),
        }
        self.seen.insert(issue.clone());
        self.issues.push(issue);
        true
    }

    /// Records a "Model integrity" ERROR.
    pub fn error(&mut self, object: impl Into<String>, message: impl Into<String>) -> bool {
        self.push(Issue {
            severity: Severity::Error,
            category: MODEL_INTEGRITY,
            message: message.into(),
            object: object.into(),
        })
    }

    /// Records a "Model integrity" WARNING.
    pub fn warning(&mut self, object: impl Into<String>, message: impl Into<String>) -> bool {
        self.push(Issue {
            severity: Severity::Warning,
            category: MODEL_INTEGRITY,
            message: message.into(),
            object: object.into(),
        })
    }

    /// Moves all issues of `other` into `self`, dropping duplicates.
    pub fn merge(&mut self, other: IssueLog) {
        for issue in other.issues {
            self.push(issue);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn into_vec(self) -> Vec<Issue> {
        self.issues
    }
}

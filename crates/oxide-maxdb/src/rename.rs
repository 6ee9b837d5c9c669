//! Table renames.
//!
//! Renaming a MaxDB table moves its sequence too, which takes four separate
//! statements. They are not atomic: each step can fail on its own, and a
//! failure leaves the steps before it applied. [`RenameProgress`] records how
//! far a rename got so callers can repair or resume.

use serde::Serialize;

/// One statement of a table rename, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenameStep {
    /// `RENAME TABLE old TO new`.
    RenameTable,
    /// Read (and advance) the old sequence.
    ReadSequence,
    /// Create the new sequence at the value read.
    CreateSequence,
    /// Drop the old sequence.
    DropSequence,
}

impl RenameStep {
    /// All steps, in execution order.
    pub const ALL: [Self; 4] = [
        Self::RenameTable,
        Self::ReadSequence,
        Self::CreateSequence,
        Self::DropSequence,
    ];
}

impl std::fmt::Display for RenameStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::RenameTable => "rename table",
            Self::ReadSequence => "read sequence",
            Self::CreateSequence => "create sequence",
            Self::DropSequence => "drop sequence",
        };
        f.write_str(name)
    }
}

/// How far a rename got.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameProgress {
    /// Table name before the rename.
    pub old_name: String,
    /// Table name after the rename.
    pub new_name: String,
    /// Steps that completed, in order.
    pub completed: Vec<RenameStep>,
    /// Value read from the old sequence, once step two has run. The new
    /// sequence starts here.
    pub sequence_start: Option<i64>,
}

impl RenameProgress {
    /// Starts tracking a rename.
    #[must_use]
    pub fn new(old_name: impl Into<String>, new_name: impl Into<String>) -> Self {
        Self {
            old_name: old_name.into(),
            new_name: new_name.into(),
            completed: Vec::new(),
            sequence_start: None,
        }
    }

    /// Records a completed step.
    pub fn complete(&mut self, step: RenameStep) {
        self.completed.push(step);
    }

    /// Returns true once `step` has completed.
    #[must_use]
    pub fn has_completed(&self, step: RenameStep) -> bool {
        self.completed.contains(&step)
    }

    /// Returns true when every step has completed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        RenameStep::ALL.iter().all(|s| self.has_completed(*s))
    }

    /// Returns the steps still to run, in order.
    #[must_use]
    pub fn remaining(&self) -> Vec<RenameStep> {
        RenameStep::ALL
            .into_iter()
            .filter(|s| !self.has_completed(*s))
            .collect()
    }
}

/// The outcome of a successful rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameReport {
    /// Table name before the rename.
    pub old_name: String,
    /// Table name after the rename.
    pub new_name: String,
    /// Steps run, in order.
    pub completed: Vec<RenameStep>,
    /// Value the new sequence starts at.
    pub sequence_start: i64,
}

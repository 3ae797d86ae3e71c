//! Pass/fail verdicts.
//!
//! Scripts report their own judgment by printing `FAIL`. Exit codes vary too much across
//! the script corpus to be authoritative, so they are recorded but never consulted here.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::executor::types::RunOutcome;

pub const FAIL_MARKER: &str = "FAIL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn classify(stdout: &str) -> Verdict {
    if stdout.contains(FAIL_MARKER) {
        Verdict::Fail
    } else {
        Verdict::Pass
    }
}

/// Verdict for a finished execution. Runs that never completed cannot pass.
pub fn verdict_for(outcome: &RunOutcome, stdout: &str) -> Verdict {
    if outcome.ran_to_completion() {
        classify(stdout)
    } else {
        Verdict::Fail
    }
}

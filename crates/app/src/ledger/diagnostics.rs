use std::collections::VecDeque;

use crate::error::{IssueKind, LedgerError};

const MAX_ISSUES: usize = 64;

/// Non-fatal problem the ledger absorbed instead of returning to its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerIssue {
    pub kind: IssueKind,
    pub message: String,
}

/// Most recent issues, oldest dropped first.
#[derive(Debug, Default)]
pub(crate) struct IssueLog {
    issues: VecDeque<LedgerIssue>,
}

impl IssueLog {
    pub(crate) fn record(&mut self, err: &LedgerError) {
        match err {
            // A missing file is the normal first-run state.
            LedgerError::StorageUnavailable(message) => {
                tracing::debug!(%message, "playtime ledger storage unavailable");
            }
            LedgerError::ReadFailure(message) => {
                tracing::warn!(%message, "failed to load play times");
            }
            LedgerError::WriteFailure(message) => {
                tracing::warn!(%message, "failed to save play times");
            }
        }
        if self.issues.len() == MAX_ISSUES {
            self.issues.pop_front();
        }
        self.issues.push_back(LedgerIssue {
            kind: err.kind(),
            message: err.to_string(),
        });
    }

    pub(crate) fn snapshot(&self) -> Vec<LedgerIssue> {
        self.issues.iter().cloned().collect()
    }

    pub(crate) fn drain(&mut self) -> Vec<LedgerIssue> {
        self.issues.drain(..).collect()
    }
}

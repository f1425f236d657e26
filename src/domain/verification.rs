//! Verification verdict returned to the session layer.

use serde::{Deserialize, Serialize};

use super::ActivityRecord;

/// Outcome of a verification call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// A recent UBI claim was found.
    Success,
    /// No claim was found, or the verification itself failed.
    Error,
}

impl VerificationStatus {
    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Aggregate counts over the activities of a successful verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationSummary {
    /// Number of activities found.
    pub total_activities: usize,
    /// Activities that represent tokens claimed into the wallet.
    pub claims: usize,
    /// Bookkeeping events.
    pub events: usize,
    /// Distinct contract addresses the activities are attributed to.
    pub contracts_involved: usize,
    /// The activity with the highest block number.
    pub latest_activity: ActivityRecord,
}

/// Verdict of a single verification call.
///
/// When `status` is [`VerificationStatus::Success`], `activities` is
/// non-empty, sorted by block descending, and `summary.latest_activity`
/// equals `activities[0]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    /// Success or error.
    pub status: VerificationStatus,
    /// Human-readable explanation shown to the user.
    pub message: String,
    /// Activities, newest first. Empty on error.
    pub activities: Vec<ActivityRecord>,
    /// Aggregate counts, present only on success.
    pub summary: Option<VerificationSummary>,
}

impl VerificationResult {
    /// Builds an error verdict with no activities.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: VerificationStatus::Error,
            message: message.into(),
            activities: Vec::new(),
            summary: None,
        }
    }

    /// The sole gate the session layer uses to authenticate a wallet.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == VerificationStatus::Success
    }

    /// The newest activity, if any.
    #[must_use]
    pub fn latest_activity(&self) -> Option<&ActivityRecord> {
        self.activities.first()
    }
}

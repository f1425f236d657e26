//! Turns aggregated activities into a [`VerificationResult`].

use std::collections::HashSet;
use std::fmt::Write as _;

use crate::domain::{ActivityRecord, VerificationResult, VerificationStatus, VerificationSummary};
use crate::error::GatewayError;

/// Activities listed individually in a success message.
pub const MESSAGE_LIST_LIMIT: usize = 5;

/// Builds verdicts and their user-facing messages.
#[derive(Debug, Clone, Copy)]
pub struct VerdictBuilder {
    search_hours: u64,
}

impl VerdictBuilder {
    /// Creates a builder for a lookback window of `search_hours`.
    #[must_use]
    pub const fn new(search_hours: u64) -> Self {
        Self { search_hours }
    }

    /// Success if any activity was found, otherwise the remediation error.
    ///
    /// Activities are stably sorted by block descending; records sharing a
    /// block keep their aggregation order.
    #[must_use]
    pub fn build(&self, mut activities: Vec<ActivityRecord>) -> VerificationResult {
        activities.sort_by(|a, b| b.block.cmp(&a.block));

        let Some(latest) = activities.first().cloned() else {
            return VerificationResult::error(self.no_claim_message());
        };

        let summary = VerificationSummary {
            total_activities: activities.len(),
            claims: activities.iter().filter(|a| a.activity_type.is_claim()).count(),
            events: activities.iter().filter(|a| a.activity_type.is_event()).count(),
            contracts_involved: activities
                .iter()
                .map(|a| a.contract_address)
                .collect::<HashSet<_>>()
                .len(),
            latest_activity: latest,
        };
        let message = self.success_message(&activities, &summary);

        VerificationResult {
            status: VerificationStatus::Success,
            message,
            activities,
            summary: Some(summary),
        }
    }

    /// Error verdict for a verification that could not be carried out.
    #[must_use]
    pub fn fault(&self, error: &GatewayError) -> VerificationResult {
        VerificationResult::error(format!("UBI verification failed: {error}"))
    }

    fn no_claim_message(&self) -> String {
        format!(
            "No recent UBI claim detected in the last {} hours.\n\n\
             Please:\n\
             1. Visit goodwallet.xyz or gooddapp.org\n\
             2. Claim your daily G$ (UBI)\n\
             3. Wait 2-3 minutes for blockchain confirmation\n\
             4. Try logging in again\n\n\
             Note: It may take a few minutes for your claim to be confirmed on the Celo blockchain.",
            self.search_hours
        )
    }

    fn success_message(&self, activities: &[ActivityRecord], summary: &VerificationSummary) -> String {
        let latest = &summary.latest_activity;
        let mut msg = String::from("UBI verification successful!\n\n");
        let _ = writeln!(
            msg,
            "Found {} UBI activities in the last {} hours",
            summary.total_activities, self.search_hours
        );
        let _ = writeln!(msg, "   UBI claims: {}", summary.claims);
        let _ = writeln!(msg, "   Events: {}", summary.events);
        let _ = writeln!(msg, "   Contracts involved: {}", summary.contracts_involved);

        msg.push_str("\nMost recent activity:\n");
        let _ = writeln!(msg, "   Contract: {}", latest.contract);
        let _ = writeln!(msg, "   Type: {}", latest.method);
        let _ = writeln!(msg, "   Amount: {}", latest.amount_display());
        let _ = writeln!(msg, "   Block: #{}", latest.block);
        let _ = writeln!(msg, "   Time: {}", latest.timestamp);
        let _ = writeln!(msg, "   Tx: {}...", latest.short_tx_hash());

        if activities.len() > 1 {
            let _ = writeln!(msg, "\nAll UBI activities (last {} hours):", self.search_hours);
            for (i, activity) in activities.iter().take(MESSAGE_LIST_LIMIT).enumerate() {
                let _ = writeln!(
                    msg,
                    "   {}. {} ({}) - {}",
                    i + 1,
                    activity.amount_display(),
                    activity.method,
                    activity.timestamp
                );
            }
            if activities.len() > MESSAGE_LIST_LIMIT {
                let _ = writeln!(
                    msg,
                    "   ... and {} more activities",
                    activities.len() - MESSAGE_LIST_LIMIT
                );
            }
        }
        msg
    }
}

//! Service layer: business logic orchestration.
//!
//! [`VerificationService`] resolves the block range, runs the
//! [`LogAggregator`] and turns its output into a verdict through the
//! [`VerdictBuilder`], consulting the shared result cache first.

pub mod log_aggregator;
pub mod verdict;
pub mod verification_service;

pub use log_aggregator::{Aggregation, LogAggregator, QueryOutcome};
pub use verdict::VerdictBuilder;
pub use verification_service::{
    ContractInfo, VerificationService, VerifierSettings, WalletBalance,
};

//! Domain layer: addresses, activity records, verdicts, the result cache,
//! and the static contract table.

pub mod activity;
pub mod clock;
pub mod contracts;
pub mod result_cache;
pub mod verification;
pub mod wallet;

pub use activity::{ActivityRecord, ActivityType, TokenAmount};
pub use clock::{Clock, ManualClock, SystemClock};
pub use contracts::{ContractSet, EventSignature, WalletFilter};
pub use result_cache::ResultCache;
pub use verification::{VerificationResult, VerificationStatus, VerificationSummary};
pub use wallet::WalletAddress;

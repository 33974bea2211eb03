// Commission module - tier resolution, payout computation and the
// per-period commission record lifecycle

pub mod errors;
pub mod ledger;
pub mod resolver;
pub mod types;
pub mod verification;

pub use errors::{CommissionError, ConfigurationError};
pub use ledger::{tally_validated_contracts, Commission, CommissionPeriod, CommissionStatus};
pub use resolver::{compute_amount, resolve_tier, CommissionResolver, Payout, TierTable};
pub use types::{Resolved, Tier, TierRule};
pub use verification::{verify_configuration, ExpectedTier, TierCheck, VerificationResult};

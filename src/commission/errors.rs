use thiserror::Error;

use super::types::Tier;

/// Problems with a tier rule set. These never escape the resolver as hard
/// failures: they become the reason attached to a fallback resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("no commission tiers are configured")]
    EmptyRuleSet,
    #[error("tier {tier} has min_contracts {min} above max_contracts {max}")]
    InvertedRange { tier: Tier, min: u32, max: u32 },
    #[error("tier {0} is configured more than once")]
    DuplicateTier(Tier),
    #[error("gap between {below} and {above}: expected {above} to start at {expected_min}, found {found_min}")]
    Gap {
        below: Tier,
        above: Tier,
        expected_min: u32,
        found_min: u32,
    },
    #[error("{below} and {above} overlap starting at {found_min}")]
    Overlap {
        below: Tier,
        above: Tier,
        found_min: u32,
    },
    #[error("tier {0} is unbounded but is not the top tier")]
    UnboundedInnerTier(Tier),
    #[error("top tier {0} must be unbounded above")]
    BoundedTopTier(Tier),
    #[error("tier {above} ranks below {below} but covers higher contract counts")]
    TierOrder { below: Tier, above: Tier },
    #[error("no tier covers a count of {0} contracts")]
    UncoveredCount(u32),
    #[error("tier {0} is not present in the configured rules")]
    MissingTier(Tier),
    #[error("payout for {contracts} contracts at {unit_amount} per contract overflows")]
    AmountOverflow { contracts: u32, unit_amount: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommissionError {
    #[error("period end {end} precedes period start {start}")]
    InvalidPeriod {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },
    #[error("user {actor} may not {action} on a commission owned by {owner}")]
    Forbidden {
        actor: String,
        owner: String,
        action: &'static str,
    },
    #[error("commission for {freelancer_id} was already paid")]
    AlreadyPaid { freelancer_id: String },
}

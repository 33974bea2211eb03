use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::errors::ConfigurationError;

/// Commission tiers, ordered from lowest to highest payout bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
}

impl Tier {
    pub const ALL: [Tier; 5] = [
        Tier::Bronze,
        Tier::Silver,
        Tier::Gold,
        Tier::Platinum,
        Tier::Diamond,
    ];

    /// The lowest tier, used when a stored value cannot be recognised
    pub const LOWEST: Tier = Tier::Bronze;

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Bronze => "BRONZE",
            Tier::Silver => "SILVER",
            Tier::Gold => "GOLD",
            Tier::Platinum => "PLATINUM",
            Tier::Diamond => "DIAMOND",
        }
    }

    /// Lenient conversion for tier strings read back from storage.
    ///
    /// Unrecognised values degrade to the lowest tier instead of failing, so a
    /// stale row never blocks a payout screen.
    pub fn from_stored(raw: &str) -> Self {
        raw.parse().unwrap_or_else(|_| {
            tracing::warn!(stored_tier = %raw, "Unknown commission tier, using lowest tier");
            Tier::LOWEST
        })
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown commission tier '{0}'")]
pub struct UnknownTier(pub String);

impl FromStr for Tier {
    type Err = UnknownTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BRONZE" => Ok(Tier::Bronze),
            "SILVER" => Ok(Tier::Silver),
            "GOLD" => Ok(Tier::Gold),
            "PLATINUM" => Ok(Tier::Platinum),
            "DIAMOND" => Ok(Tier::Diamond),
            _ => Err(UnknownTier(s.to_string())),
        }
    }
}

/// One bracket of the commission table.
///
/// `max_contracts` is inclusive; `None` means unbounded above and is only
/// valid on the top tier. `percentage` is a legacy field kept for
/// configuration audits and never enters the payout calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierRule {
    #[serde(deserialize_with = "deserialize_stored_tier")]
    pub tier: Tier,
    pub min_contracts: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_contracts: Option<u32>,
    pub unit_amount: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<u8>,
}

/// Configured tier names go through `Tier::from_stored`, so an unknown name
/// lands on the lowest tier and the table validation decides what happens next.
pub(crate) fn deserialize_stored_tier<'de, D>(deserializer: D) -> Result<Tier, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(Tier::from_stored(&raw))
}

impl TierRule {
    pub fn new(tier: Tier, min_contracts: u32, max_contracts: Option<u32>, unit_amount: u64) -> Self {
        Self {
            tier,
            min_contracts,
            max_contracts,
            unit_amount,
            percentage: None,
        }
    }

    pub fn with_percentage(mut self, percentage: u8) -> Self {
        self.percentage = Some(percentage);
        self
    }

    pub fn contains(&self, contracts: u32) -> bool {
        contracts >= self.min_contracts && self.max_contracts.map_or(true, |max| contracts <= max)
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_contracts.is_none()
    }
}

/// Outcome of a lookup that may have fallen back to the default tier table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved<T> {
    /// Computed from the live configuration
    Live(T),
    /// Computed from the fallback table because the live one could not answer
    Fallback { value: T, reason: ConfigurationError },
}

impl<T> Resolved<T> {
    pub fn value(&self) -> &T {
        match self {
            Resolved::Live(value) => value,
            Resolved::Fallback { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Resolved::Live(value) => value,
            Resolved::Fallback { value, .. } => value,
        }
    }

    pub fn using_fallback(&self) -> bool {
        matches!(self, Resolved::Fallback { .. })
    }

    pub fn fallback_reason(&self) -> Option<&ConfigurationError> {
        match self {
            Resolved::Live(_) => None,
            Resolved::Fallback { reason, .. } => Some(reason),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolved<U> {
        match self {
            Resolved::Live(value) => Resolved::Live(f(value)),
            Resolved::Fallback { value, reason } => Resolved::Fallback {
                value: f(value),
                reason,
            },
        }
    }
}

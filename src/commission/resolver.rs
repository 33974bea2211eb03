// Commission tier resolution
//
// Rule lists are validated once into a TierTable. Lookups against a table that
// cannot answer fall back to the built-in default table and say so through
// Resolved::Fallback rather than failing the caller.

use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, warn};

use super::errors::ConfigurationError;
use super::types::{Resolved, Tier, TierRule};

/// A validated, ascending, gap-free set of tier rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierTable {
    rules: Vec<TierRule>,
}

impl TierTable {
    /// Validate a rule list.
    ///
    /// Rules may arrive in any order; they are sorted by `min_contracts`. The
    /// table does not have to start at zero, but every adjacent pair must be
    /// contiguous and only the last rule may be unbounded.
    pub fn new(mut rules: Vec<TierRule>) -> Result<Self, ConfigurationError> {
        if rules.is_empty() {
            return Err(ConfigurationError::EmptyRuleSet);
        }

        rules.sort_by_key(|rule| rule.min_contracts);

        let mut seen = HashSet::new();
        for rule in &rules {
            if !seen.insert(rule.tier) {
                return Err(ConfigurationError::DuplicateTier(rule.tier));
            }
            if let Some(max) = rule.max_contracts {
                if max < rule.min_contracts {
                    return Err(ConfigurationError::InvertedRange {
                        tier: rule.tier,
                        min: rule.min_contracts,
                        max,
                    });
                }
            }
        }

        for pair in rules.windows(2) {
            let (below, above) = (&pair[0], &pair[1]);
            let Some(max) = below.max_contracts else {
                return Err(ConfigurationError::UnboundedInnerTier(below.tier));
            };
            if above.tier <= below.tier {
                return Err(ConfigurationError::TierOrder {
                    below: below.tier,
                    above: above.tier,
                });
            }
            match max.checked_add(1) {
                Some(expected_min) if above.min_contracts == expected_min => {}
                Some(expected_min) if above.min_contracts > expected_min => {
                    return Err(ConfigurationError::Gap {
                        below: below.tier,
                        above: above.tier,
                        expected_min,
                        found_min: above.min_contracts,
                    });
                }
                _ => {
                    return Err(ConfigurationError::Overlap {
                        below: below.tier,
                        above: above.tier,
                        found_min: above.min_contracts,
                    });
                }
            }
        }

        if let Some(top) = rules.last() {
            if !top.is_unbounded() {
                return Err(ConfigurationError::BoundedTopTier(top.tier));
            }
        }

        Ok(Self { rules })
    }

    /// Built-in table used whenever the configured one is missing or broken:
    ///
    /// | tier     | contracts | per contract |
    /// |----------|-----------|--------------|
    /// | BRONZE   | 0 - 10    | 500          |
    /// | SILVER   | 11 - 20   | 1000         |
    /// | GOLD     | 21 - 30   | 1500         |
    /// | PLATINUM | 31 +      | 2000         |
    pub fn fallback() -> Self {
        Self {
            rules: vec![
                TierRule::new(Tier::Bronze, 0, Some(10), 500),
                TierRule::new(Tier::Silver, 11, Some(20), 1000),
                TierRule::new(Tier::Gold, 21, Some(30), 1500),
                TierRule::new(Tier::Platinum, 31, None, 2000),
            ],
        }
    }

    pub fn rules(&self) -> &[TierRule] {
        &self.rules
    }

    /// First rule, in ascending order, whose inclusive range holds `contracts`
    pub fn lookup(&self, contracts: u32) -> Result<&TierRule, ConfigurationError> {
        self.rules
            .iter()
            .find(|rule| rule.contains(contracts))
            .ok_or(ConfigurationError::UncoveredCount(contracts))
    }

    pub fn rule_for(&self, tier: Tier) -> Result<&TierRule, ConfigurationError> {
        self.rules
            .iter()
            .find(|rule| rule.tier == tier)
            .ok_or(ConfigurationError::MissingTier(tier))
    }

    pub fn amount_for(&self, contracts: u32, tier: Tier) -> Result<u64, ConfigurationError> {
        let rule = self.rule_for(tier)?;
        rule.unit_amount
            .checked_mul(u64::from(contracts))
            .ok_or(ConfigurationError::AmountOverflow {
                contracts,
                unit_amount: rule.unit_amount,
            })
    }
}

/// Tier and payout for one contract count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payout {
    pub tier: Tier,
    pub contracts: u32,
    pub unit_amount: u64,
    pub amount: u64,
}

/// Resolves tiers and payouts against a configured table, with the built-in
/// table standing in whenever the configured one cannot answer.
///
/// Holds no mutable state, so one instance can be shared across tasks.
#[derive(Debug, Clone)]
pub struct CommissionResolver {
    table: Resolved<TierTable>,
    fallback: TierTable,
}

impl CommissionResolver {
    pub fn from_rules(rules: Vec<TierRule>) -> Self {
        let table = match TierTable::new(rules) {
            Ok(table) => Resolved::Live(table),
            Err(reason) => {
                warn!(%reason, "Commission tier configuration rejected, using fallback tiers");
                Resolved::Fallback {
                    value: TierTable::fallback(),
                    reason,
                }
            }
        };

        Self {
            table,
            fallback: TierTable::fallback(),
        }
    }

    pub fn from_table(table: TierTable) -> Self {
        Self {
            table: Resolved::Live(table),
            fallback: TierTable::fallback(),
        }
    }

    /// True when the configured rules were rejected outright
    pub fn using_fallback(&self) -> bool {
        self.table.using_fallback()
    }

    pub fn configuration_error(&self) -> Option<&ConfigurationError> {
        self.table.fallback_reason()
    }

    /// Rules currently in effect (configured or fallback)
    pub fn rules(&self) -> &[TierRule] {
        self.table.value().rules()
    }

    pub fn resolve_rule(&self, contracts: u32) -> Resolved<&TierRule> {
        let table = match &self.table {
            Resolved::Live(table) => table,
            Resolved::Fallback { value, reason } => {
                return Resolved::Fallback {
                    value: self.fallback_rule(value, contracts),
                    reason: reason.clone(),
                };
            }
        };

        match table.lookup(contracts) {
            Ok(rule) => Resolved::Live(rule),
            Err(reason) => {
                warn!(contracts, %reason, "Configured tiers do not cover contract count, using fallback tiers");
                Resolved::Fallback {
                    value: self.fallback_rule(&self.fallback, contracts),
                    reason,
                }
            }
        }
    }

    pub fn resolve_tier(&self, contracts: u32) -> Resolved<Tier> {
        let resolved = self.resolve_rule(contracts).map(|rule| rule.tier);
        debug!(
            contracts,
            tier = %resolved.value(),
            using_fallback = resolved.using_fallback(),
            "Resolved commission tier"
        );
        resolved
    }

    /// `unit_amount(tier) * contracts`. The legacy percentage is never consulted.
    pub fn compute_amount(&self, contracts: u32, tier: Tier) -> Resolved<u64> {
        let table = match &self.table {
            Resolved::Live(table) => table,
            Resolved::Fallback { value, reason } => {
                return Resolved::Fallback {
                    value: self.fallback_amount(value, contracts, tier),
                    reason: reason.clone(),
                };
            }
        };

        match table.amount_for(contracts, tier) {
            Ok(amount) => Resolved::Live(amount),
            Err(reason) => {
                warn!(contracts, %tier, %reason, "Payout not computable from configured tiers, using fallback tiers");
                Resolved::Fallback {
                    value: self.fallback_amount(&self.fallback, contracts, tier),
                    reason,
                }
            }
        }
    }

    /// Tier and amount together, both taken from the same table
    pub fn payout(&self, contracts: u32) -> Resolved<Payout> {
        self.resolve_rule(contracts).map(|rule| Payout {
            tier: rule.tier,
            contracts,
            unit_amount: rule.unit_amount,
            amount: rule.unit_amount.saturating_mul(u64::from(contracts)),
        })
    }

    fn fallback_rule<'a>(&self, table: &'a TierTable, contracts: u32) -> &'a TierRule {
        // The fallback table starts at zero and ends unbounded, so every count matches.
        table
            .lookup(contracts)
            .unwrap_or(&table.rules[table.rules.len() - 1])
    }

    fn fallback_amount(&self, table: &TierTable, contracts: u32, tier: Tier) -> u64 {
        let rule = table
            .rule_for(tier)
            .unwrap_or_else(|_| self.fallback_rule(table, contracts));
        rule.unit_amount.saturating_mul(u64::from(contracts))
    }
}

impl Default for CommissionResolver {
    fn default() -> Self {
        Self::from_rules(Vec::new())
    }
}

/// Tier for `contracts` under `rules`, falling back to the built-in table when
/// the rules are invalid or do not cover the count.
pub fn resolve_tier(contracts: u32, rules: &[TierRule]) -> Resolved<Tier> {
    CommissionResolver::from_rules(rules.to_vec()).resolve_tier(contracts)
}

/// Payout for `contracts` validated contracts at `tier` under `rules`
pub fn compute_amount(contracts: u32, tier: Tier, rules: &[TierRule]) -> Resolved<u64> {
    CommissionResolver::from_rules(rules.to_vec()).compute_amount(contracts, tier)
}

// Read-only audit of a commission tier configuration

use serde::{Deserialize, Serialize};

use super::types::{deserialize_stored_tier, Tier, TierRule};

/// What a healthy configuration is expected to contain for one tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedTier {
    #[serde(deserialize_with = "deserialize_stored_tier")]
    pub tier: Tier,
    pub min_percentage: u8,
    pub max_percentage: u8,
    pub min_amount: u64,
    pub max_amount: u64,
}

impl ExpectedTier {
    /// Percentage band when the rule tracks the legacy percentage, amount band otherwise
    pub fn accepts(&self, rule: &TierRule) -> bool {
        match rule.percentage {
            Some(pct) => (self.min_percentage..=self.max_percentage).contains(&pct),
            None => (self.min_amount..=self.max_amount).contains(&rule.unit_amount),
        }
    }

    pub fn defaults() -> Vec<ExpectedTier> {
        vec![
            ExpectedTier {
                tier: Tier::Bronze,
                min_percentage: 5,
                max_percentage: 10,
                min_amount: 250,
                max_amount: 750,
            },
            ExpectedTier {
                tier: Tier::Silver,
                min_percentage: 10,
                max_percentage: 15,
                min_amount: 750,
                max_amount: 1250,
            },
            ExpectedTier {
                tier: Tier::Gold,
                min_percentage: 15,
                max_percentage: 20,
                min_amount: 1250,
                max_amount: 1750,
            },
            ExpectedTier {
                tier: Tier::Platinum,
                min_percentage: 20,
                max_percentage: 25,
                min_amount: 1750,
                max_amount: 2500,
            },
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierCheck {
    pub tier: Tier,
    pub exists: bool,
    pub unit_amount: Option<u64>,
    pub percentage: Option<u8>,
    pub min_contracts: Option<u32>,
    pub max_contracts: Option<u32>,
    pub within_band: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationResult {
    /// 0-100
    pub score: u8,
    pub expected: usize,
    pub present: usize,
    pub within_band: usize,
    pub tiers: Vec<TierCheck>,
}

impl VerificationResult {
    pub fn is_complete(&self) -> bool {
        self.expected > 0 && self.present == self.expected && self.within_band == self.expected
    }

    pub fn missing_tiers(&self) -> Vec<Tier> {
        self.tiers
            .iter()
            .filter(|check| !check.exists)
            .map(|check| check.tier)
            .collect()
    }
}

/// Audit `rules` against the default expectations
pub fn verify_configuration(rules: &[TierRule]) -> VerificationResult {
    verify_against(rules, &ExpectedTier::defaults())
}

/// Audit `rules` against explicit expectations.
///
/// score = 50 * present / expected + 50 * within_band / expected, rounded
/// half up. An empty expectation list scores 0.
pub fn verify_against(rules: &[TierRule], expected: &[ExpectedTier]) -> VerificationResult {
    let tiers: Vec<TierCheck> = expected
        .iter()
        .map(|expectation| {
            let rule = rules.iter().find(|rule| rule.tier == expectation.tier);
            TierCheck {
                tier: expectation.tier,
                exists: rule.is_some(),
                unit_amount: rule.map(|r| r.unit_amount),
                percentage: rule.and_then(|r| r.percentage),
                min_contracts: rule.map(|r| r.min_contracts),
                max_contracts: rule.and_then(|r| r.max_contracts),
                within_band: rule.is_some_and(|r| expectation.accepts(r)),
            }
        })
        .collect();

    let present = tiers.iter().filter(|check| check.exists).count();
    let within_band = tiers.iter().filter(|check| check.within_band).count();
    let score = if expected.is_empty() {
        0
    } else {
        let n = expected.len();
        ((100 * (present + within_band) + n) / (2 * n)) as u8
    };

    tracing::debug!(score, present, within_band, expected = expected.len(), "Verified commission configuration");

    VerificationResult {
        score,
        expected: expected.len(),
        present,
        within_band,
        tiers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_rules() -> Vec<TierRule> {
        vec![
            TierRule::new(Tier::Bronze, 1, Some(10), 500),
            TierRule::new(Tier::Silver, 11, Some(20), 1000),
            TierRule::new(Tier::Gold, 21, Some(30), 1500),
            TierRule::new(Tier::Platinum, 31, None, 2000),
        ]
    }

    #[test]
    fn test_complete_configuration_scores_100() {
        let result = verify_configuration(&full_rules());
        assert_eq!(result.score, 100);
        assert!(result.is_complete());
        assert!(result.missing_tiers().is_empty());
    }

    #[test]
    fn test_missing_platinum_scores_75() {
        let mut rules = full_rules();
        rules.pop();
        let result = verify_configuration(&rules);

        assert_eq!(result.score, 75);
        assert_eq!(result.missing_tiers(), vec![Tier::Platinum]);
        let platinum = result.tiers.iter().find(|c| c.tier == Tier::Platinum).unwrap();
        assert!(!platinum.exists);
        assert_eq!(platinum.unit_amount, None);

        let gold = result.tiers.iter().find(|c| c.tier == Tier::Gold).unwrap();
        assert!(gold.exists);
        assert_eq!(gold.unit_amount, Some(1500));
        assert_eq!(gold.min_contracts, Some(21));
        assert_eq!(gold.max_contracts, Some(30));
    }

    #[test]
    fn test_out_of_band_values_lower_the_score() {
        let mut rules = full_rules();
        rules[0].unit_amount = 5000;
        let result = verify_configuration(&rules);
        // present 4/4, within band 3/4 -> 50 + 37.5
        assert_eq!(result.score, 88);
        assert!(!result.is_complete());
    }

    #[test]
    fn test_percentage_band_takes_precedence_when_tracked() {
        let rules: Vec<TierRule> = full_rules()
            .into_iter()
            .map(|rule| rule.with_percentage(50))
            .collect();
        let result = verify_configuration(&rules);
        assert_eq!(result.within_band, 0);
        assert_eq!(result.score, 50);
        assert_eq!(result.tiers[0].percentage, Some(50));
    }

    #[test]
    fn test_empty_rules_and_empty_expectations() {
        assert_eq!(verify_configuration(&[]).score, 0);
        assert_eq!(verify_against(&full_rules(), &[]).score, 0);
    }
}

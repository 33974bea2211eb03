use anyhow::Result;

use super::Command;
use crate::commission::{verification::verify_against, ExpectedTier, TierRule};

pub struct VerifyCommand {
    pub rules: Vec<TierRule>,
    pub expected: Vec<ExpectedTier>,
    pub json: bool,
}

impl VerifyCommand {
    pub fn new(rules: Vec<TierRule>, expected: Vec<ExpectedTier>, json: bool) -> Self {
        Self { rules, expected, json }
    }
}

impl Command for VerifyCommand {
    async fn execute(&self) -> Result<()> {
        let result = verify_against(&self.rules, &self.expected);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
            return Ok(());
        }

        println!("🔍 COMMISSION CONFIGURATION AUDIT");
        println!("=================================");
        println!();
        if self.rules.is_empty() {
            println!("⚠️  No tiers configured, the fallback table is in effect");
            println!();
        }
        for check in &result.tiers {
            if !check.exists {
                println!("❌ {:<9} missing", check.tier.as_str());
                continue;
            }
            let marker = if check.within_band { "✅" } else { "⚠️ " };
            let range = match (check.min_contracts, check.max_contracts) {
                (Some(min), Some(max)) => format!("{min}-{max}"),
                (Some(min), None) => format!("{min}+"),
                _ => "-".to_string(),
            };
            let percentage = check
                .percentage
                .map(|p| format!(" ({p}%)"))
                .unwrap_or_default();
            println!(
                "{marker} {:<9} contracts {range:<8} unit {}{percentage}",
                check.tier.as_str(),
                check.unit_amount.unwrap_or_default(),
            );
        }
        println!();
        println!(
            "📊 Score: {}% ({} of {} tiers present, {} within band)",
            result.score, result.present, result.expected, result.within_band
        );
        Ok(())
    }
}

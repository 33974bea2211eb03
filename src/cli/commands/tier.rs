use anyhow::Result;

use super::Command;
use crate::commission::CommissionResolver;

pub struct TierCommand {
    pub contracts: u32,
    pub resolver: CommissionResolver,
}

impl TierCommand {
    pub fn new(contracts: u32, resolver: CommissionResolver) -> Self {
        Self { contracts, resolver }
    }
}

impl Command for TierCommand {
    async fn execute(&self) -> Result<()> {
        let payout = self.resolver.payout(self.contracts);

        if let Some(reason) = payout.fallback_reason() {
            println!("⚠️  Using fallback tiers: {reason}");
            println!();
        }

        let payout = payout.value();
        println!("🏅 Contracts:   {}", payout.contracts);
        println!("   Tier:        {}", payout.tier);
        println!("   Unit amount: {}", payout.unit_amount);
        println!("   Amount:      {}", payout.amount);
        Ok(())
    }
}

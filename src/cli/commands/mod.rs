use anyhow::Result;

pub mod replay;
pub mod tier;
pub mod verify;

#[allow(async_fn_in_trait)]
pub trait Command {
    async fn execute(&self) -> Result<()>;
}

pub fn show_usage() {
    println!("🧮 AdLab Hub - Commissions and Contact Pipeline");
    println!();
    println!("Commands:");
    println!("  🏅 adlab tier --contracts N   # Resolve a tier and payout");
    println!("  🔍 adlab verify               # Audit the commission tier configuration");
    println!("  🔁 adlab replay --events FILE # Replay contact events through the pipeline");
    println!();
    println!("💡 Pass --config FILE to use a configuration other than ./adlab.toml");
}

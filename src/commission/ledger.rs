// Per-period commission records and their payment workflow

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::errors::CommissionError;
use super::resolver::CommissionResolver;
use super::types::Tier;
use crate::activity::Quote;
use crate::roles::{Role, UserContext};
use crate::telemetry::{create_commission_span, generate_correlation_id};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommissionStatus {
    Pending,
    Paid,
}

/// Inclusive date range a commission is computed over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl CommissionPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CommissionError> {
        if end < start {
            return Err(CommissionError::InvalidPeriod { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        let day = at.date_naive();
        day >= self.start && day <= self.end
    }
}

/// Validated contracts for `freelancer_id` in `period`: accepted quotes they
/// own whose acceptance date falls inside the period.
pub fn tally_validated_contracts(quotes: &[Quote], freelancer_id: &str, period: &CommissionPeriod) -> u32 {
    let count = quotes
        .iter()
        .filter(|quote| quote.is_validated_contract())
        .filter(|quote| quote.freelancer_id.as_deref() == Some(freelancer_id))
        .filter(|quote| quote.accepted_at.is_some_and(|at| period.contains(at)))
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commission {
    pub freelancer_id: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub contracts_count: u32,
    pub tier: Tier,
    pub amount: u64,
    pub status: CommissionStatus,
    pub payment_requested: bool,
    pub paid_date: Option<DateTime<Utc>>,
    /// Tier and amount came from the built-in fallback table
    pub using_fallback: bool,
}

impl Commission {
    /// Close a period: derive tier and amount from the tallied contract count
    pub fn close_period(
        freelancer_id: impl Into<String>,
        period: CommissionPeriod,
        contracts_count: u32,
        resolver: &CommissionResolver,
    ) -> Self {
        let freelancer_id = freelancer_id.into();
        let correlation_id = generate_correlation_id();
        let _span = create_commission_span(&freelancer_id, Some(&correlation_id)).entered();
        let payout = resolver.payout(contracts_count);
        if let Some(reason) = payout.fallback_reason() {
            warn!(
                freelancer_id = %freelancer_id,
                contracts_count,
                %reason,
                "Commission computed from fallback tiers"
            );
        }
        let using_fallback = payout.using_fallback();
        let payout = payout.into_value();

        info!(
            freelancer_id = %freelancer_id,
            contracts_count,
            tier = %payout.tier,
            amount = payout.amount,
            "Commission period closed"
        );

        Self {
            freelancer_id,
            period_start: period.start,
            period_end: period.end,
            contracts_count,
            tier: payout.tier,
            amount: payout.amount,
            status: CommissionStatus::Pending,
            payment_requested: false,
            paid_date: None,
            using_fallback,
        }
    }

    /// Flag the commission for payout. Only the owning freelancer may ask.
    pub fn request_payment(&mut self, actor: &UserContext) -> Result<(), CommissionError> {
        self.ensure_pending()?;
        if actor.role != Role::Freelancer || !actor.owns(&self.freelancer_id) {
            return Err(self.forbidden(actor, "request payment"));
        }
        if !self.payment_requested {
            self.payment_requested = true;
            info!(freelancer_id = %self.freelancer_id, "Commission payment requested");
        }
        Ok(())
    }

    /// Record the payout. Admin roles only; a paid commission is frozen.
    pub fn mark_paid(&mut self, actor: &UserContext, at: DateTime<Utc>) -> Result<(), CommissionError> {
        if !actor.is_admin() {
            return Err(self.forbidden(actor, "mark paid"));
        }
        self.ensure_pending()?;
        self.status = CommissionStatus::Paid;
        self.paid_date = Some(at);
        info!(
            freelancer_id = %self.freelancer_id,
            amount = self.amount,
            paid_by = %actor.user_id,
            "Commission marked paid"
        );
        Ok(())
    }

    pub fn is_paid(&self) -> bool {
        self.status == CommissionStatus::Paid
    }

    fn ensure_pending(&self) -> Result<(), CommissionError> {
        if self.is_paid() {
            return Err(CommissionError::AlreadyPaid {
                freelancer_id: self.freelancer_id.clone(),
            });
        }
        Ok(())
    }

    fn forbidden(&self, actor: &UserContext, action: &'static str) -> CommissionError {
        warn!(actor = %actor.user_id, role = %actor.role, action, "Commission action refused");
        CommissionError::Forbidden {
            actor: actor.user_id.clone(),
            owner: self.freelancer_id.clone(),
            action,
        }
    }
}

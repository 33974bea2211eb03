use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::contacts::{ContactEvent, ContactId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    Draft,
    Sent,
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActivityError {
    #[error("quote {0} was rejected and cannot be accepted")]
    QuoteRejected(Uuid),
    #[error("quote {0} was accepted and cannot be rejected")]
    QuoteAccepted(Uuid),
    #[error("appointment {0} is {1:?} and can no longer change")]
    AppointmentClosed(Uuid, super::AppointmentStatus),
}

/// A quote issued to a contact. Accepted quotes count as validated
/// contracts for the owning freelancer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub id: Uuid,
    pub contact_id: ContactId,
    pub freelancer_id: Option<String>,
    pub amount: u64,
    pub status: QuoteStatus,
    pub created_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
}

impl Quote {
    /// Create a draft quote together with the event it implies for the contact
    pub fn create(
        contact_id: ContactId,
        freelancer_id: Option<String>,
        amount: u64,
    ) -> (Self, ContactEvent) {
        let quote = Self {
            id: Uuid::new_v4(),
            contact_id,
            freelancer_id,
            amount,
            status: QuoteStatus::Draft,
            created_at: Utc::now(),
            accepted_at: None,
        };
        (quote, ContactEvent::QuoteCreated { contact_id })
    }

    pub fn send(&mut self) {
        if self.status == QuoteStatus::Draft {
            self.status = QuoteStatus::Sent;
        }
    }

    /// Accept the quote. Accepting twice yields no second event.
    pub fn accept(&mut self, at: DateTime<Utc>) -> Result<Option<ContactEvent>, ActivityError> {
        match self.status {
            QuoteStatus::Accepted => Ok(None),
            QuoteStatus::Rejected => Err(ActivityError::QuoteRejected(self.id)),
            QuoteStatus::Draft | QuoteStatus::Sent => {
                self.status = QuoteStatus::Accepted;
                self.accepted_at = Some(at);
                Ok(Some(ContactEvent::QuoteAccepted {
                    contact_id: self.contact_id,
                }))
            }
        }
    }

    pub fn reject(&mut self) -> Result<(), ActivityError> {
        if self.status == QuoteStatus::Accepted {
            return Err(ActivityError::QuoteAccepted(self.id));
        }
        self.status = QuoteStatus::Rejected;
        Ok(())
    }

    pub fn is_validated_contract(&self) -> bool {
        self.status == QuoteStatus::Accepted && self.accepted_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_lifecycle_events() {
        let contact_id = Uuid::new_v4();
        let (mut quote, created) = Quote::create(contact_id, Some("fl-1".to_string()), 1200);
        assert_eq!(created, ContactEvent::QuoteCreated { contact_id });
        assert_eq!(quote.status, QuoteStatus::Draft);

        quote.send();
        assert_eq!(quote.status, QuoteStatus::Sent);

        let accepted = quote.accept(Utc::now()).unwrap();
        assert_eq!(accepted, Some(ContactEvent::QuoteAccepted { contact_id }));
        assert!(quote.is_validated_contract());

        assert_eq!(quote.accept(Utc::now()).unwrap(), None);
        assert_eq!(quote.reject(), Err(ActivityError::QuoteAccepted(quote.id)));
    }

    #[test]
    fn test_rejected_quote_cannot_be_accepted() {
        let (mut quote, _) = Quote::create(Uuid::new_v4(), None, 300);
        quote.reject().unwrap();
        assert_eq!(quote.accept(Utc::now()), Err(ActivityError::QuoteRejected(quote.id)));
        assert!(!quote.is_validated_contract());
    }
}

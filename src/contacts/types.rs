// Core types for the contact pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::errors::MalformedEventError;

pub type ContactId = Uuid;

/// Sales pipeline status of a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    /// Freshly captured, no confirmed appointment yet
    Lead,
    /// An appointment has been confirmed
    Prospect,
    /// A quote has been issued
    Negotiation,
    /// A quote was accepted (terminal)
    Signed,
    /// Dropped out of the pipeline (terminal)
    Lost,
}

impl ContactStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ContactStatus::Lead => "lead",
            ContactStatus::Prospect => "prospect",
            ContactStatus::Negotiation => "negotiation",
            ContactStatus::Signed => "signed",
            ContactStatus::Lost => "lost",
        }
    }

    /// Position along lead -> prospect -> negotiation -> signed; `None` for lost
    pub fn progress(self) -> Option<u8> {
        match self {
            ContactStatus::Lead => Some(0),
            ContactStatus::Prospect => Some(1),
            ContactStatus::Negotiation => Some(2),
            ContactStatus::Signed => Some(3),
            ContactStatus::Lost => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ContactStatus::Signed | ContactStatus::Lost)
    }
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactStatus {
    type Err = MalformedEventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lead" => Ok(ContactStatus::Lead),
            "prospect" => Ok(ContactStatus::Prospect),
            "negotiation" => Ok(ContactStatus::Negotiation),
            "signed" => Ok(ContactStatus::Signed),
            "lost" => Ok(ContactStatus::Lost),
            other => Err(MalformedEventError::UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub email: String,
    pub status: ContactStatus,
    pub assigned_to: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contact {
    /// New contacts always enter the pipeline as leads
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            status: ContactStatus::Lead,
            assigned_to: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn assigned(mut self, user_id: impl Into<String>) -> Self {
        self.assigned_to = Some(user_id.into());
        self
    }
}

/// A contact as it comes back from the hosted backend, status still untyped
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactRow {
    pub id: ContactId,
    pub name: String,
    pub email: String,
    pub status: String,
    pub assigned_to: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ContactRow> for Contact {
    type Error = MalformedEventError;

    fn try_from(row: ContactRow) -> Result<Self, Self::Error> {
        Ok(Contact {
            id: row.id,
            name: row.name,
            email: row.email,
            status: row.status.parse()?,
            assigned_to: row.assigned_to,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Business events that may advance a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContactEvent {
    AppointmentConfirmed { contact_id: ContactId },
    QuoteCreated { contact_id: ContactId },
    QuoteAccepted { contact_id: ContactId },
    MarkLost { contact_id: ContactId },
}

impl ContactEvent {
    pub fn contact_id(&self) -> ContactId {
        match self {
            ContactEvent::AppointmentConfirmed { contact_id }
            | ContactEvent::QuoteCreated { contact_id }
            | ContactEvent::QuoteAccepted { contact_id }
            | ContactEvent::MarkLost { contact_id } => *contact_id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ContactEvent::AppointmentConfirmed { .. } => "appointment_confirmed",
            ContactEvent::QuoteCreated { .. } => "quote_created",
            ContactEvent::QuoteAccepted { .. } => "quote_accepted",
            ContactEvent::MarkLost { .. } => "mark_lost",
        }
    }
}

/// Untyped event as delivered by webhooks or the realtime feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawContactEvent {
    pub kind: String,
    pub contact_id: String,
}

impl TryFrom<RawContactEvent> for ContactEvent {
    type Error = MalformedEventError;

    fn try_from(raw: RawContactEvent) -> Result<Self, Self::Error> {
        let contact_id = Uuid::parse_str(raw.contact_id.trim()).map_err(|_| {
            MalformedEventError::InvalidContactId {
                raw: raw.contact_id.clone(),
            }
        })?;

        match raw.kind.as_str() {
            "appointment_confirmed" => Ok(ContactEvent::AppointmentConfirmed { contact_id }),
            "quote_created" => Ok(ContactEvent::QuoteCreated { contact_id }),
            "quote_accepted" => Ok(ContactEvent::QuoteAccepted { contact_id }),
            "mark_lost" => Ok(ContactEvent::MarkLost { contact_id }),
            other => Err(MalformedEventError::UnknownKind(other.to_string())),
        }
    }
}

/// Notification emitted for every accepted status transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChanged {
    pub contact_id: ContactId,
    pub previous_status: ContactStatus,
    pub new_status: ContactStatus,
    pub timestamp: DateTime<Utc>,
}

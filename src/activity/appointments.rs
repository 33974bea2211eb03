use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::quotes::ActivityError;
use crate::contacts::{ContactEvent, ContactId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub contact_id: ContactId,
    pub scheduled_for: DateTime<Utc>,
    pub status: AppointmentStatus,
}

impl Appointment {
    pub fn schedule(contact_id: ContactId, scheduled_for: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            contact_id,
            scheduled_for,
            status: AppointmentStatus::Scheduled,
        }
    }

    /// Change the appointment status, returning the contact event the change
    /// implies. Only the move into `Confirmed` produces one.
    pub fn set_status(&mut self, status: AppointmentStatus) -> Result<Option<ContactEvent>, ActivityError> {
        if matches!(self.status, AppointmentStatus::Completed | AppointmentStatus::Cancelled)
            && status != self.status
        {
            return Err(ActivityError::AppointmentClosed(self.id, self.status));
        }

        let previous = std::mem::replace(&mut self.status, status);
        let event = (status == AppointmentStatus::Confirmed && previous != AppointmentStatus::Confirmed)
            .then_some(ContactEvent::AppointmentConfirmed {
                contact_id: self.contact_id,
            });
        Ok(event)
    }
}

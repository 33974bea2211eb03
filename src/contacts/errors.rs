use thiserror::Error;

use super::types::{ContactId, ContactStatus};

/// Input that could not be turned into a typed event or status
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedEventError {
    #[error("unknown contact event kind '{0}'")]
    UnknownKind(String),
    #[error("invalid contact id '{raw}'")]
    InvalidContactId { raw: String },
    #[error("unknown contact status '{0}'")]
    UnknownStatus(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("contact {0} not found")]
    NotFound(ContactId),
    #[error("contact {0} already exists")]
    Duplicate(ContactId),
    #[error("contact {contact_id} is {actual}, expected {expected}")]
    Conflict {
        contact_id: ContactId,
        expected: ContactStatus,
        actual: ContactStatus,
    },
    #[error("stored contact is malformed: {0}")]
    Malformed(#[from] MalformedEventError),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Malformed(#[from] MalformedEventError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

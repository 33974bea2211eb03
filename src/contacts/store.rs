// Storage seam for contacts. The hosted backend implements this trait in
// production; the in-memory store backs tests and the replay command.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::errors::StoreError;
use super::types::{Contact, ContactId, ContactStatus};

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn insert(&self, contact: Contact) -> Result<(), StoreError>;

    async fn load(&self, id: ContactId) -> Result<Contact, StoreError>;

    /// Write `new` only if the stored status still equals `expected`
    async fn update_status(
        &self,
        id: ContactId,
        expected: ContactStatus,
        new: ContactStatus,
        at: DateTime<Utc>,
    ) -> Result<Contact, StoreError>;

    async fn list(&self) -> Result<Vec<Contact>, StoreError>;
}

#[derive(Debug, Default)]
pub struct InMemoryContactStore {
    contacts: RwLock<HashMap<ContactId, Contact>>,
}

impl InMemoryContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contacts(contacts: impl IntoIterator<Item = Contact>) -> Self {
        Self {
            contacts: RwLock::new(contacts.into_iter().map(|c| (c.id, c)).collect()),
        }
    }
}

#[async_trait]
impl ContactStore for InMemoryContactStore {
    async fn insert(&self, contact: Contact) -> Result<(), StoreError> {
        let mut contacts = self.contacts.write().await;
        if contacts.contains_key(&contact.id) {
            return Err(StoreError::Duplicate(contact.id));
        }
        contacts.insert(contact.id, contact);
        Ok(())
    }

    async fn load(&self, id: ContactId) -> Result<Contact, StoreError> {
        self.contacts
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn update_status(
        &self,
        id: ContactId,
        expected: ContactStatus,
        new: ContactStatus,
        at: DateTime<Utc>,
    ) -> Result<Contact, StoreError> {
        let mut contacts = self.contacts.write().await;
        let contact = contacts.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if contact.status != expected {
            return Err(StoreError::Conflict {
                contact_id: id,
                expected,
                actual: contact.status,
            });
        }
        contact.status = new;
        contact.updated_at = at;
        Ok(contact.clone())
    }

    async fn list(&self) -> Result<Vec<Contact>, StoreError> {
        let mut contacts: Vec<Contact> = self.contacts.read().await.values().cloned().collect();
        contacts.sort_by_key(|c| c.created_at);
        Ok(contacts)
    }
}

// Applies contact events against the store, one contact at a time

use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use tokio::sync::{broadcast, Mutex};
use tracing::Instrument;

use super::errors::{PipelineError, StoreError};
use super::notifier::StatusNotifier;
use super::state_machine::next_status;
use super::store::ContactStore;
use super::types::{ContactEvent, ContactId, ContactStatus, RawContactEvent, StatusChanged};
use crate::telemetry::{create_transition_span, generate_correlation_id};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The guard held; the new status was persisted and announced
    Applied(StatusChanged),
    /// The guard did not hold; nothing changed
    Ignored {
        contact_id: ContactId,
        status: ContactStatus,
    },
}

impl TransitionOutcome {
    pub fn status(&self) -> ContactStatus {
        match self {
            TransitionOutcome::Applied(change) => change.new_status,
            TransitionOutcome::Ignored { status, .. } => *status,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, TransitionOutcome::Applied(_))
    }
}

/// Single writer per contact: the guard check and the status write for one
/// contact never interleave with another event for the same contact.
pub struct ContactPipeline<S: ContactStore> {
    store: Arc<S>,
    notifier: StatusNotifier,
    locks: LockTable,
}

type LockTable = StdMutex<HashMap<ContactId, Arc<Mutex<()>>>>;

/// A claim on one contact's lock. Dropping it prunes the table entry once no
/// other lease remains, including when the owning future is cancelled.
struct LockLease<'a> {
    table: &'a LockTable,
    contact_id: ContactId,
    lock: Arc<Mutex<()>>,
}

impl<'a> LockLease<'a> {
    fn acquire(table: &'a LockTable, contact_id: ContactId) -> Self {
        let lock = table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(contact_id)
            .or_default()
            .clone();
        Self {
            table,
            contact_id,
            lock,
        }
    }
}

impl Drop for LockLease<'_> {
    fn drop(&mut self) {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        // One reference in the table, one held by this lease
        if table
            .get(&self.contact_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 2)
        {
            table.remove(&self.contact_id);
        }
    }
}

impl<S: ContactStore> ContactPipeline<S> {
    pub fn new(store: Arc<S>, notifier: StatusNotifier) -> Self {
        Self {
            store,
            notifier,
            locks: StdMutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StatusChanged> {
        self.notifier.subscribe()
    }

    /// Validate an untyped event, then apply it
    pub async fn apply_raw(&self, raw: RawContactEvent) -> Result<TransitionOutcome, PipelineError> {
        let event = ContactEvent::try_from(raw).inspect_err(|e| {
            tracing::warn!(error = %e, "Rejected malformed contact event");
        })?;
        self.apply(event).await
    }

    pub async fn apply(&self, event: ContactEvent) -> Result<TransitionOutcome, PipelineError> {
        let contact_id = event.contact_id();
        let correlation_id = generate_correlation_id();
        let span = create_transition_span(event.kind(), &contact_id.to_string(), Some(&correlation_id));

        async {
            let lease = LockLease::acquire(&self.locks, contact_id);
            let _guard = lease.lock.lock().await;
            self.apply_locked(contact_id, &event).await
        }
        .instrument(span)
        .await
    }

    async fn apply_locked(
        &self,
        contact_id: ContactId,
        event: &ContactEvent,
    ) -> Result<TransitionOutcome, PipelineError> {
        let contact = self.store.load(contact_id).await?;

        let Some(transition) = next_status(contact_id, contact.status, event) else {
            return Ok(TransitionOutcome::Ignored {
                contact_id,
                status: contact.status,
            });
        };

        let timestamp = Utc::now();
        self.store
            .update_status(contact_id, transition.from, transition.to, timestamp)
            .await
            .inspect_err(|e| {
                if let StoreError::Conflict { .. } = e {
                    tracing::warn!(error = %e, "Contact changed outside the pipeline");
                }
            })?;

        let change = StatusChanged {
            contact_id,
            previous_status: transition.from,
            new_status: transition.to,
            timestamp,
        };
        let delivered = self.notifier.publish(change.clone());
        tracing::info!(
            previous_status = %change.previous_status,
            new_status = %change.new_status,
            subscribers = delivered,
            "Contact status changed"
        );

        Ok(TransitionOutcome::Applied(change))
    }

    #[cfg(test)]
    fn tracked_locks(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

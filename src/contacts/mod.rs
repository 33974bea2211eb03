// Contact lifecycle - typed statuses, the status state machine and the
// per-contact pipeline that applies business events to stored contacts

pub mod errors;
pub mod notifier;
pub mod pipeline;
pub mod state_machine;
pub mod store;
pub mod types;

pub use errors::{MalformedEventError, PipelineError, StoreError};
pub use notifier::StatusNotifier;
pub use pipeline::{ContactPipeline, TransitionOutcome};
pub use state_machine::{next_status, ContactLifecycle, StatusTransition};
pub use store::{ContactStore, InMemoryContactStore};
pub use types::{Contact, ContactEvent, ContactId, ContactRow, ContactStatus, RawContactEvent, StatusChanged};

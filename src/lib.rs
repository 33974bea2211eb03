// AdLab Hub Library - commission tiers and the contact status pipeline
// This exposes the core components for the CLI, hosts and integration tests

pub mod activity;
pub mod cli;
pub mod commission;
pub mod config;
pub mod contacts;
pub mod roles;
pub mod telemetry;

// Re-export key types for easy access
pub use activity::{Appointment, AppointmentStatus, Quote, QuoteStatus};
pub use commission::{
    compute_amount, resolve_tier, tally_validated_contracts, verify_configuration, Commission,
    CommissionPeriod, CommissionResolver, ConfigurationError, Resolved, Tier, TierRule, TierTable,
    VerificationResult,
};
pub use config::AdlabConfig;
pub use contacts::{
    Contact, ContactEvent, ContactPipeline, ContactStatus, ContactStore, InMemoryContactStore,
    StatusChanged, StatusNotifier, TransitionOutcome,
};
pub use roles::{Role, UserContext};
pub use telemetry::{create_transition_span, generate_correlation_id, init_telemetry};

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use crate::config::ObservabilityConfig;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set. JSON output carries
/// the current span and span list so transitions can be correlated.
pub fn init_telemetry(config: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;

    let registry = tracing_subscriber::registry().with(filter);
    if config.json_logs {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()?;
    }

    tracing::debug!(log_level = %config.log_level, json = config.json_logs, "AdLab telemetry initialized");
    Ok(())
}

/// Generate a correlation ID for linking related operations
pub fn generate_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span wrapping one contact event from ingress to notification
pub fn create_transition_span(
    event_kind: &str,
    contact_id: &str,
    correlation_id: Option<&str>,
) -> tracing::Span {
    tracing::info_span!(
        "contact_transition",
        event.kind = event_kind,
        contact.id = contact_id,
        correlation.id = correlation_id,
        otel.kind = "internal"
    )
}

/// Span wrapping a commission period close
pub fn create_commission_span(freelancer_id: &str, correlation_id: Option<&str>) -> tracing::Span {
    tracing::info_span!(
        "commission_close",
        freelancer.id = freelancer_id,
        correlation.id = correlation_id,
        otel.kind = "internal"
    )
}

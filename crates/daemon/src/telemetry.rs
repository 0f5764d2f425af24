//! Logging and optional OpenTelemetry export
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: filter directives (default: `upkeep=info`)
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP endpoint (e.g., http://localhost:4317)
//! - `OTEL_SERVICE_NAME`: Service name (default: upkeep-scheduler)
//!
//! ```text
//! OTEL_EXPORTER_OTLP_ENDPOINT=http://localhost:4317 \
//! OTEL_SERVICE_NAME=upkeep-dev \
//!     ./upkeep-scheduler
//! ```

use crate::config::LogFormat;
use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "upkeep=info";

/// Install the global subscriber
pub fn init_logging(format: LogFormat) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))?;

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(otel_layer());

    match format {
        // Production: JSON structured logging
        LogFormat::Json => registry.with(fmt::layer().json()).try_init()?,
        // Development: Pretty formatting with colors
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init()?,
    }

    report_telemetry_state();
    Ok(())
}

fn otlp_endpoint() -> Option<String> {
    std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
        .ok()
        .filter(|e| !e.trim().is_empty())
}

#[cfg(not(feature = "telemetry"))]
fn otel_layer() -> Option<tracing_subscriber::layer::Identity> {
    None
}

#[cfg(not(feature = "telemetry"))]
fn report_telemetry_state() {
    if otlp_endpoint().is_some() {
        tracing::warn!("OpenTelemetry endpoint set but feature 'telemetry' not enabled");
        tracing::warn!("Rebuild with: cargo build --features telemetry");
    } else {
        tracing::debug!("OpenTelemetry not configured (OTEL_EXPORTER_OTLP_ENDPOINT not set)");
    }
}

/// Flush pending spans before exit
#[cfg(not(feature = "telemetry"))]
pub fn shutdown() {}

#[cfg(feature = "telemetry")]
static OTEL_INIT_ERROR: std::sync::OnceLock<String> = std::sync::OnceLock::new();

#[cfg(feature = "telemetry")]
type OtelLayer<S> = tracing_opentelemetry::OpenTelemetryLayer<S, opentelemetry_sdk::trace::Tracer>;

#[cfg(feature = "telemetry")]
fn otel_layer<S>() -> Option<OtelLayer<S>>
where
    S: tracing::Subscriber + for<'span> tracing_subscriber::registry::LookupSpan<'span>,
{
    let endpoint = otlp_endpoint()?;
    match build_tracer(&endpoint) {
        Ok(tracer) => Some(tracing_opentelemetry::layer().with_tracer(tracer)),
        Err(e) => {
            // Subscriber is not installed yet; reported once it is
            let _ = OTEL_INIT_ERROR.set(e.to_string());
            None
        }
    }
}

#[cfg(feature = "telemetry")]
fn build_tracer(endpoint: &str) -> Result<opentelemetry_sdk::trace::Tracer> {
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry::KeyValue;
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::trace::TracerProvider;
    use opentelemetry_sdk::Resource;

    let service_name =
        std::env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| "upkeep-scheduler".to_string());

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;

    let provider = TracerProvider::builder()
        .with_batch_exporter(exporter, opentelemetry_sdk::runtime::Tokio)
        .with_resource(Resource::new(vec![KeyValue::new(
            "service.name",
            service_name.clone(),
        )]))
        .build();

    let tracer = provider.tracer(service_name);
    opentelemetry::global::set_tracer_provider(provider);
    Ok(tracer)
}

#[cfg(feature = "telemetry")]
fn report_telemetry_state() {
    match (otlp_endpoint(), OTEL_INIT_ERROR.get()) {
        (Some(_), Some(e)) => {
            tracing::warn!(error = %e, "Failed to initialize OpenTelemetry (continuing without it)")
        }
        (Some(endpoint), None) => {
            tracing::info!(endpoint = %endpoint, "OpenTelemetry initialized successfully")
        }
        (None, _) => {
            tracing::debug!("OpenTelemetry not configured (OTEL_EXPORTER_OTLP_ENDPOINT not set)")
        }
    }
}

/// Flush pending spans before exit
#[cfg(feature = "telemetry")]
pub fn shutdown() {
    opentelemetry::global::shutdown_tracer_provider();
}

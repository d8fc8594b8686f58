//! Observability infrastructure for the exporter
//!
//! Provides:
//! - Prometheus metrics (cycle latency, decoded objects, emitted series, skips)
//! - Structured logging of diagnostics with tracing

use crate::diagnostics::Diagnostic;
use prometheus::{
    register_histogram, register_int_counter, register_int_gauge, Histogram, IntCounter, IntGauge,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Default histogram buckets for cycle latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<ExporterMetricsInner> = OnceLock::new();

struct ExporterMetricsInner {
    cycle_latency_seconds: Histogram,
    hpas_decoded: IntGauge,
    series_emitted: IntGauge,
    members_skipped: IntCounter,
    duplicates_skipped: IntCounter,
    unconfigured_skipped: IntCounter,
    source_errors: IntCounter,
    cycles_completed: IntCounter,
}

impl ExporterMetricsInner {
    fn new() -> Self {
        Self {
            cycle_latency_seconds: register_histogram!(
                "hpa_exporter_cycle_latency_seconds",
                "Time spent decoding payloads and deriving series in one cycle",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register cycle_latency_seconds"),

            hpas_decoded: register_int_gauge!(
                "hpa_exporter_hpas_decoded",
                "Canonical autoscalers decoded in the last cycle"
            )
            .expect("Failed to register hpas_decoded"),

            series_emitted: register_int_gauge!(
                "hpa_exporter_series_emitted",
                "Time series emitted in the last cycle"
            )
            .expect("Failed to register series_emitted"),

            members_skipped: register_int_counter!(
                "hpa_exporter_members_skipped_total",
                "List members skipped because they failed to decode"
            )
            .expect("Failed to register members_skipped"),

            duplicates_skipped: register_int_counter!(
                "hpa_exporter_duplicates_skipped_total",
                "Autoscaler metrics skipped because the target already had a series"
            )
            .expect("Failed to register duplicates_skipped"),

            unconfigured_skipped: register_int_counter!(
                "hpa_exporter_unconfigured_skipped_total",
                "Autoscalers skipped because neither CPU nor memory target is set"
            )
            .expect("Failed to register unconfigured_skipped"),

            source_errors: register_int_counter!(
                "hpa_exporter_source_errors_total",
                "Payload sources that could not be read"
            )
            .expect("Failed to register source_errors"),

            cycles_completed: register_int_counter!(
                "hpa_exporter_cycles_completed_total",
                "Export cycles completed"
            )
            .expect("Failed to register cycles_completed"),
        }
    }
}

/// Exporter metrics for Prometheus exposition
///
/// Lightweight handle to the global metrics instance; clones share it.
#[derive(Clone)]
pub struct ExporterMetrics {
    _private: (),
}

impl Default for ExporterMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ExporterMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(ExporterMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &ExporterMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    pub fn observe_cycle_latency(&self, duration_secs: f64) {
        self.inner().cycle_latency_seconds.observe(duration_secs);
    }

    pub fn set_cycle_totals(&self, hpas_decoded: usize, series_emitted: usize) {
        self.inner().hpas_decoded.set(hpas_decoded as i64);
        self.inner().series_emitted.set(series_emitted as i64);
        self.inner().cycles_completed.inc();
    }

    pub fn inc_source_errors(&self) {
        self.inner().source_errors.inc();
    }

    /// Count a diagnostic under its skip counter
    pub fn record_diagnostic(&self, diagnostic: &Diagnostic) {
        match diagnostic {
            Diagnostic::ListRejected { .. } => self.inner().source_errors.inc(),
            Diagnostic::MemberSkipped { .. } => self.inner().members_skipped.inc(),
            Diagnostic::DuplicateTarget { .. } => self.inner().duplicates_skipped.inc(),
            Diagnostic::NoTargetsConfigured { .. } => self.inner().unconfigured_skipped.inc(),
        }
    }

    pub fn cycles_completed(&self) -> u64 {
        self.inner().cycles_completed.get()
    }
}

/// Structured logger for exporter events
#[derive(Clone)]
pub struct StructuredLogger {
    cluster_name: String,
}

impl StructuredLogger {
    pub fn new(cluster_name: impl Into<String>) -> Self {
        Self {
            cluster_name: cluster_name.into(),
        }
    }

    /// Log one diagnostic; decode failures at warn, policy skips at info
    pub fn log_diagnostic(&self, diagnostic: &Diagnostic) {
        match diagnostic {
            Diagnostic::ListRejected { revision, cause } => {
                warn!(
                    event = diagnostic.event(),
                    cluster = %self.cluster_name,
                    revision = %revision,
                    cause = %cause,
                    "Unable to decode autoscaler list"
                );
            }
            Diagnostic::MemberSkipped {
                index,
                gvk,
                namespace,
                name,
                cause,
            } => {
                warn!(
                    event = diagnostic.event(),
                    cluster = %self.cluster_name,
                    index = index,
                    gvk = %gvk,
                    namespace = namespace.as_deref().unwrap_or(""),
                    name = name.as_deref().unwrap_or(""),
                    cause = %cause,
                    "Unable to decode autoscaler, skipping"
                );
            }
            Diagnostic::DuplicateTarget {
                key,
                skipped,
                retained,
            } => {
                info!(
                    event = diagnostic.event(),
                    cluster = %self.cluster_name,
                    metric = %key.metric,
                    target_kind = %key.kind,
                    namespace = %key.namespace,
                    target_name = %key.name,
                    skipped = %skipped,
                    retained = %retained,
                    "Skipping autoscaler, target already has a series"
                );
            }
            Diagnostic::NoTargetsConfigured { object, target } => {
                info!(
                    event = diagnostic.event(),
                    cluster = %self.cluster_name,
                    namespace = %object.namespace,
                    name = %object.name,
                    target_kind = %target.kind,
                    target_name = %target.name,
                    "Skipping autoscaler without CPU or memory target"
                );
            }
        }
    }

    pub fn log_diagnostics(&self, diagnostics: &[Diagnostic]) {
        for diagnostic in diagnostics {
            self.log_diagnostic(diagnostic);
        }
    }

    pub fn log_source_error(&self, source: &str, error: &str) {
        warn!(
            event = "source_failed",
            cluster = %self.cluster_name,
            source = %source,
            error = %error,
            "Failed to read autoscaler payload"
        );
    }

    pub fn log_cycle(&self, hpas_decoded: usize, series_emitted: usize, skipped: usize, elapsed_ms: u128) {
        info!(
            event = "cycle_complete",
            cluster = %self.cluster_name,
            hpas_decoded = hpas_decoded,
            series_emitted = series_emitted,
            skipped = skipped,
            elapsed_ms = elapsed_ms,
            "Export cycle complete"
        );
    }

    pub fn log_startup(&self, version: &str, sources: usize) {
        info!(
            event = "exporter_started",
            cluster = %self.cluster_name,
            exporter_version = %version,
            sources = sources,
            "HPA exporter started"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "exporter_shutdown",
            cluster = %self.cluster_name,
            reason = %reason,
            "HPA exporter shutting down"
        );
    }
}

//! Derive command: list decode followed by series derivation

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use exporter_lib::timeseries::{metric_labels, resource_labels, StaticEnvironment};
use exporter_lib::{Decoder, Diagnostic, MetricDeriver, MetricTypes, SchemaRevision, TimeSeries};
use serde::Serialize;
use std::path::PathBuf;
use tabled::Tabled;

use super::read_payload;
use crate::config::Config;
use crate::output::{print_diagnostics, print_json, print_success, print_table, OutputFormat};

/// Arguments for `hpactl derive`
#[derive(Debug, Clone)]
pub struct DeriveArgs {
    pub file: PathBuf,
    pub revision: SchemaRevision,
    pub now: Option<String>,
    pub project_id: Option<String>,
    pub location: Option<String>,
    pub cluster_name: Option<String>,
}

/// Row for the derived series table
#[derive(Tabled)]
struct SeriesRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Namespace")]
    namespace: String,
    #[tabled(rename = "Workload")]
    workload: String,
    #[tabled(rename = "HPA")]
    object: String,
    #[tabled(rename = "Target %")]
    value: String,
}

impl SeriesRow {
    fn new(series: &TimeSeries, metric_types: &MetricTypes) -> Self {
        let label = |labels: &std::collections::BTreeMap<String, String>, key: &str| {
            labels.get(key).cloned().unwrap_or_default()
        };
        let metric = if series.metric.type_ == metric_types.cpu {
            "cpu".to_string()
        } else if series.metric.type_ == metric_types.memory {
            "memory".to_string()
        } else {
            series.metric.type_.clone()
        };

        Self {
            metric,
            namespace: label(&series.resource.labels, resource_labels::NAMESPACE_NAME),
            workload: format!(
                "{}/{}",
                label(&series.metric.labels, metric_labels::TARGETREF_KIND),
                label(&series.metric.labels, metric_labels::TARGETREF_NAME)
            ),
            object: label(&series.metric.labels, metric_labels::OBJECT_NAME),
            value: series
                .value()
                .map(|value| value.to_string())
                .unwrap_or_default(),
        }
    }
}

#[derive(Serialize)]
struct DeriveOutput<'a> {
    end_time: &'a str,
    series: &'a [TimeSeries],
    diagnostics: &'a [Diagnostic],
}

/// Resolve `--now`, defaulting to the current time. A supplied value is
/// validated and then passed through as written.
fn resolve_now(now: Option<&str>) -> Result<String> {
    match now {
        Some(value) => {
            DateTime::parse_from_rfc3339(value)
                .with_context(|| format!("Invalid RFC 3339 timestamp: {}", value))?;
            Ok(value.to_string())
        }
        None => Ok(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
    }
}

/// Flags win over the config file; unset labels are empty
fn environment(args: &DeriveArgs, config: &Config) -> StaticEnvironment {
    let pick = |flag: &Option<String>, configured: &Option<String>| {
        flag.clone().or_else(|| configured.clone()).unwrap_or_default()
    };

    StaticEnvironment::new(
        pick(&args.project_id, &config.project_id),
        pick(&args.location, &config.cluster_location),
        pick(&args.cluster_name, &config.cluster_name),
    )
}

fn metric_types(config: &Config) -> MetricTypes {
    let defaults = MetricTypes::default();
    MetricTypes {
        cpu: config.cpu_metric_type.clone().unwrap_or(defaults.cpu),
        memory: config.memory_metric_type.clone().unwrap_or(defaults.memory),
    }
}

pub fn derive(args: &DeriveArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let now = resolve_now(args.now.as_deref())?;
    let payload = read_payload(&args.file)?;

    let list = Decoder::default().decode_list(&payload, args.revision);
    let deriver = MetricDeriver::from_provider(metric_types(config), &environment(args, config));
    let derivation = deriver.derive(&list.items, &now);

    let mut diagnostics = list.diagnostics;
    diagnostics.extend(derivation.diagnostics);

    match format {
        OutputFormat::Json => print_json(&DeriveOutput {
            end_time: &now,
            series: &derivation.series,
            diagnostics: &diagnostics,
        })?,
        OutputFormat::Table => {
            let rows: Vec<SeriesRow> = derivation
                .series
                .iter()
                .map(|series| SeriesRow::new(series, deriver.metric_types()))
                .collect();
            print_table(&rows);
            print_diagnostics(&diagnostics);
            print_success(&format!(
                "Derived {} series from {} autoscalers at {}",
                derivation.series.len(),
                list.items.len(),
                now
            ));
        }
    }

    Ok(())
}

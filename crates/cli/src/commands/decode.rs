//! Decode commands: single objects and list payloads

use anyhow::{Context, Result};
use colored::Colorize;
use exporter_lib::{Decoder, Diagnostic, GroupVersionKind, Hpa, SchemaRevision};
use serde::Serialize;
use std::path::Path;
use tabled::Tabled;

use super::read_payload;
use crate::output::{color_percentage, print_diagnostics, print_json, print_success, print_table, OutputFormat};

/// Row for the canonical autoscaler table
#[derive(Tabled)]
pub struct HpaRow {
    #[tabled(rename = "Namespace")]
    namespace: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Min")]
    min_replicas: i32,
    #[tabled(rename = "Max")]
    max_replicas: i32,
    #[tabled(rename = "CPU")]
    cpu: String,
    #[tabled(rename = "Memory")]
    memory: String,
}

impl From<&Hpa> for HpaRow {
    fn from(hpa: &Hpa) -> Self {
        Self {
            namespace: hpa.namespace.clone(),
            name: hpa.name.clone(),
            target: format!("{}/{}", hpa.target_ref.kind, hpa.target_ref.name),
            min_replicas: hpa.min_replicas,
            max_replicas: hpa.max_replicas,
            cpu: color_percentage(hpa.target_cpu_percentage),
            memory: color_percentage(hpa.target_memory_percentage),
        }
    }
}

#[derive(Serialize)]
struct DecodeOutput<'a> {
    gvk: &'a GroupVersionKind,
    hpa: &'a Hpa,
}

#[derive(Serialize)]
struct ListOutput<'a> {
    revision: SchemaRevision,
    items: &'a [Hpa],
    diagnostics: &'a [Diagnostic],
}

/// Decode one object, detecting its revision from the payload
pub fn decode(file: &Path, format: OutputFormat) -> Result<()> {
    let payload = read_payload(file)?;
    let (object, gvk) = Decoder::default()
        .decode(&payload)
        .with_context(|| format!("Failed to decode {}", file.display()))?;
    let hpa = object.normalize();

    match format {
        OutputFormat::Json => print_json(&DecodeOutput {
            gvk: &gvk,
            hpa: &hpa,
        })?,
        OutputFormat::Table => {
            println!("{} {}", "Detected:".bold(), gvk.to_string().cyan());
            print_table(&[HpaRow::from(&hpa)]);
        }
    }

    Ok(())
}

/// Decode a list payload of a known revision
pub fn list(file: &Path, revision: SchemaRevision, format: OutputFormat) -> Result<()> {
    let payload = read_payload(file)?;
    let result = Decoder::default().decode_list(&payload, revision);

    match format {
        OutputFormat::Json => print_json(&ListOutput {
            revision: result.revision,
            items: &result.items,
            diagnostics: &result.diagnostics,
        })?,
        OutputFormat::Table => {
            let rows: Vec<HpaRow> = result.items.iter().map(HpaRow::from).collect();
            print_table(&rows);
            print_diagnostics(&result.diagnostics);

            if !result.is_rejected() {
                print_success(&format!(
                    "Decoded {} autoscalers ({}), skipped {}",
                    result.items.len(),
                    revision,
                    result.skipped()
                ));
            }
        }
    }

    Ok(())
}

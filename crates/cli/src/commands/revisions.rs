//! Revisions command: registry contents

use anyhow::Result;
use exporter_lib::{builtin_registry, SchemaRevision};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{print_json, print_table, OutputFormat};

#[derive(Tabled, Serialize)]
struct RevisionRow {
    #[tabled(rename = "Revision")]
    revision: SchemaRevision,
    #[tabled(rename = "API Version")]
    api_version: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "List Kind")]
    list_kind: String,
}

pub fn show_revisions(format: OutputFormat) -> Result<()> {
    let rows: Vec<RevisionRow> = builtin_registry()
        .iter()
        .map(|(gvk, shape)| RevisionRow {
            revision: shape.revision,
            api_version: gvk.api_version(),
            kind: gvk.kind.clone(),
            list_kind: shape.revision.list_gvk().kind,
        })
        .collect();

    match format {
        OutputFormat::Json => print_json(&rows)?,
        OutputFormat::Table => print_table(&rows),
    }

    Ok(())
}

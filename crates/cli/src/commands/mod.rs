//! Subcommand implementations

pub mod decode;
pub mod derive;
pub mod revisions;

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

/// Read a payload from a file, or from stdin when the path is `-`
pub fn read_payload(path: &Path) -> Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut payload = Vec::new();
        std::io::stdin()
            .read_to_end(&mut payload)
            .context("Failed to read payload from stdin")?;
        return Ok(payload);
    }

    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

//! Loads the YAML content table.
//!
//! The engine core only sees [`ContentRegistry`]; this module is the thin
//! adapter that fills a [`ContentTable`] from `content/anomalies.yaml`.
//!
//! [`ContentRegistry`]: containment_settlement::ContentRegistry

use std::path::Path;

use containment_settlement::ContentTable;
use tracing::info;

use crate::error::EngineError;

/// Default location of the content file, relative to the working directory.
pub const DEFAULT_CONTENT_PATH: &str = "content/anomalies.yaml";

/// Parse and validate a content table from YAML.
pub fn parse_content(yaml: &str) -> Result<ContentTable, EngineError> {
    let table: ContentTable = serde_yml::from_str(yaml).map_err(|e| EngineError::ContentFile {
        message: format!("failed to parse content YAML: {e}"),
    })?;
    table.validate()?;
    Ok(table)
}

/// Read, parse and validate the content table at `path`.
pub fn load_content(path: &Path) -> Result<ContentTable, EngineError> {
    let contents = std::fs::read_to_string(path).map_err(|e| EngineError::ContentFile {
        message: format!("failed to read {}: {e}", path.display()),
    })?;
    let table = parse_content(&contents)?;
    info!(
        path = %path.display(),
        anomalies = table.anomalies.len(),
        schedule_steps = table.spawn_schedule.len(),
        "Content loaded"
    );
    Ok(table)
}

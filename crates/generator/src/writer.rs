//! Serializing a finished document to disk

use pve_openapi_generator_common::{GeneratorError, OpenApiDocument, Result};
use std::fs;
use std::path::Path;
use tracing::info;

/// On-disk representation of a document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl OutputFormat {
    /// Guess the format from a file extension, defaulting to YAML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => OutputFormat::Json,
            _ => OutputFormat::Yaml,
        }
    }

    pub fn render(self, document: &OpenApiDocument) -> Result<String> {
        match self {
            OutputFormat::Yaml => document.to_yaml(),
            OutputFormat::Json => document.to_json(),
        }
    }
}

/// Writes documents to files
pub struct DocumentWriter;

impl DocumentWriter {
    /// Render `document` and write it to `path`, creating parent directories
    pub fn write(document: &OpenApiDocument, path: &Path, format: OutputFormat) -> Result<()> {
        let rendered = format.render(document)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                GeneratorError::Generation(format!("Failed to create output directory: {}", e))
            })?;
        }

        fs::write(path, rendered).map_err(|e| {
            GeneratorError::Generation(format!("Failed to write {}: {}", path.display(), e))
        })?;

        info!(path = %path.display(), ?format, "wrote document");
        Ok(())
    }
}

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub source_url: String,
    pub markup: String,
}

pub fn load_document(path: &Path, source_url: Option<&str>) -> Result<LoadedDocument> {
    let bytes = if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("failed to read markup from stdin")?;
        buf
    } else {
        std::fs::read(path).with_context(|| format!("failed to read markup file {}", path.display()))?
    };

    info!(file = %path.display(), bytes = bytes.len(), "loaded page markup");

    let source_url = source_url
        .map(ToString::to_string)
        .unwrap_or_else(|| format!("file://{}", path.display()));

    Ok(LoadedDocument {
        source_url,
        markup: String::from_utf8_lossy(&bytes).to_string(),
    })
}

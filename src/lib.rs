use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

pub mod cli;
pub mod field;
pub mod formatting;
pub mod input;
pub mod options;
pub mod prefix;
pub mod reduce;
pub mod report;
pub mod summary;

pub async fn write_output_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    fs::write(path, bytes)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;

    Ok(())
}

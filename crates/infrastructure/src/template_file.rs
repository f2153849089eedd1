//! Writes downloaded import templates to disk.

use std::path::Path;

use chronopay_core::{AppError, AppResult};
use tracing::info;

/// Writes template bytes to `path`, creating missing parent directories.
pub async fn save_template(path: &Path, bytes: &[u8]) -> AppResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await.map_err(|error| {
            AppError::Internal(format!(
                "failed to create directory '{}': {error}",
                parent.display()
            ))
        })?;
    }

    tokio::fs::write(path, bytes).await.map_err(|error| {
        AppError::Internal(format!(
            "failed to write template '{}': {error}",
            path.display()
        ))
    })?;

    info!(path = %path.display(), bytes = bytes.len(), "template saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use chronopay_core::{AppError, AppResult};

    use super::save_template;

    #[tokio::test]
    async fn writes_into_new_directory() -> AppResult<()> {
        let path = std::env::temp_dir()
            .join(format!("chronopay-templates-{}", std::process::id()))
            .join("nested")
            .join("Employee Masterfile.xlsx");

        save_template(&path, b"PK\x03\x04").await?;

        let written = tokio::fs::read(&path)
            .await
            .map_err(|error| AppError::Internal(error.to_string()))?;
        assert_eq!(written, b"PK\x03\x04");
        Ok(())
    }
}

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::instrument;

use crate::domain::DomainError;

/// File extensions read as knowledge-base documents.
pub const SOURCE_EXTENSIONS: &[&str] = &["txt", "md"];

/// Reads every `.txt` / `.md` file directly under `dir` as `(file name,
/// content)`, ordered by path. Subdirectories are not descended into.
#[instrument(skip(dir), fields(dir = %dir.display()))]
pub async fn collect_sources(dir: &Path) -> Result<Vec<(String, String)>, DomainError> {
    let mut entries = tokio::fs::read_dir(dir).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => {
            DomainError::not_found(format!("source directory {}", dir.display()))
        }
        _ => DomainError::internal(format!("reading {}: {e}", dir.display())),
    })?;

    let mut paths: Vec<PathBuf> = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| DomainError::internal(format!("reading {}: {e}", dir.display())))?
    {
        let path = entry.path();
        let is_source = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext));
        let is_file = entry.file_type().await.is_ok_and(|t| t.is_file());
        if is_source && is_file {
            paths.push(path);
        }
    }
    paths.sort();

    if paths.is_empty() {
        return Err(DomainError::validation(format!(
            "no .txt or .md files in {}",
            dir.display()
        )));
    }

    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| DomainError::internal(format!("reading {}: {e}", path.display())))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        sources.push((name, content));
    }

    tracing::debug!(files = sources.len(), "sources collected");
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    async fn temp_dir(files: &[(&str, &str)]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("health-assistant-kb-{}", Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        for (name, content) in files {
            tokio::fs::write(dir.join(name), content).await.unwrap();
        }
        dir
    }

    #[tokio::test]
    async fn test_collects_text_and_markdown_sorted() {
        let dir = temp_dir(&[
            ("water.txt", "Drink water."),
            ("notes.pdf", "binary"),
            ("sleep.md", "# Sleep"),
            ("README", "no extension"),
        ])
        .await;
        tokio::fs::create_dir_all(dir.join("nested.md")).await.unwrap();

        let sources = collect_sources(&dir).await.unwrap();

        assert_eq!(
            sources,
            vec![
                ("sleep.md".to_string(), "# Sleep".to_string()),
                ("water.txt".to_string(), "Drink water.".to_string()),
            ]
        );
        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn test_directory_without_sources_is_rejected() {
        let dir = temp_dir(&[("image.png", "png")]).await;

        let err = collect_sources(&dir).await.unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn test_missing_directory_is_not_found() {
        let dir =
            std::env::temp_dir().join(format!("health-assistant-absent-{}", Uuid::new_v4()));

        let err = collect_sources(&dir).await.unwrap_err();

        assert!(matches!(err, DomainError::NotFound(_)));
    }
}

// src/groups/repository.rs

use crate::error::{AppError, Result, StorageOperation};
use crate::groups::GroupsDocument;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Read/overwrite access to the groups document.
///
/// There is no coordination between writers: two concurrent saves both
/// succeed and whichever finishes last is what ends up on disk.
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Reads and parses the whole document.
    async fn load(&self) -> Result<GroupsDocument>;

    /// Replaces the whole document. On failure the previous contents stay authoritative.
    async fn save(&self, document: &GroupsDocument) -> Result<()>;
}

/// Stores the document as a 4-space indented JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Serializes with the same layout the editor has always produced.
pub fn to_pretty_json(document: &GroupsDocument) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    document
        .serialize(&mut serializer)
        .map_err(|e| AppError::Internal(format!("Failed to serialize groups document: {e}")))?;
    Ok(buf)
}

/// Writes `contents` next to `target` and renames it into place.
fn replace_file(target: &Path, contents: &[u8]) -> std::io::Result<()> {
    let dir = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.flush()?;

    // Keep the mode of the file being replaced; temp files are created 0600.
    if let Ok(metadata) = std::fs::metadata(target) {
        tmp.as_file().set_permissions(metadata.permissions())?;
    }

    tmp.as_file().sync_all()?;
    tmp.persist(target).map_err(|e| e.error)?;
    Ok(())
}

#[async_trait]
impl GroupRepository for JsonFileRepository {
    async fn load(&self) -> Result<GroupsDocument> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| AppError::storage(StorageOperation::Read, &self.path, e))?;

        let document: GroupsDocument =
            serde_json::from_slice(&bytes).map_err(|source| AppError::Format {
                path: self.path.clone(),
                source,
            })?;

        debug!(
            groups.path = %self.path.display(),
            groups.count = document.groups.len(),
            "Groups document loaded"
        );
        Ok(document)
    }

    async fn save(&self, document: &GroupsDocument) -> Result<()> {
        let contents = to_pretty_json(document)?;
        let target = self.path.clone();

        tokio::task::spawn_blocking(move || replace_file(&target, &contents))
            .await
            .map_err(|e| AppError::Internal(format!("Save task failed: {e}")))?
            .map_err(|e| AppError::storage(StorageOperation::Write, &self.path, e))?;

        info!(
            groups.path = %self.path.display(),
            groups.count = document.groups.len(),
            "Groups document saved"
        );
        Ok(())
    }
}

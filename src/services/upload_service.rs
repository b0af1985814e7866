use crate::error::{Error, Result};
use crate::models::upload::{UploadCategory, UploadedFile};
use std::path::PathBuf;
use tokio::fs;

#[derive(Clone, Debug)]
pub struct UploadService {
    root: PathBuf,
}

impl UploadService {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn category_dir(&self, category: UploadCategory) -> PathBuf {
        self.root.join(category.as_str())
    }

    /// Writes every file into its category directory, replacing same-named
    /// files. `category` only names what was expected when `files` is empty.
    /// Returns the written paths in input order.
    pub async fn save(
        &self,
        category: UploadCategory,
        files: &[UploadedFile],
    ) -> Result<Vec<PathBuf>> {
        if files.is_empty() {
            return Err(Error::MissingFile(category.missing_message().to_string()));
        }

        let mut saved = Vec::with_capacity(files.len());
        for file in files {
            let dir = self.category_dir(file.category);
            fs::create_dir_all(&dir).await.map_err(|e| {
                tracing::error!(dir = %dir.display(), "Failed to create upload directory: {}", e);
                Error::Io(e)
            })?;

            let path = dir.join(&file.filename);
            fs::write(&path, &file.content).await.map_err(|e| {
                tracing::error!(path = %path.display(), "Failed to write upload: {}", e);
                Error::Io(e)
            })?;
            tracing::info!(
                category = %file.category,
                path = %path.display(),
                bytes = file.content.len(),
                "Upload saved"
            );
            saved.push(path);
        }

        Ok(saved)
    }
}

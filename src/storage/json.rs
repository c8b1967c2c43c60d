#[cfg(test)]
#[path = "json_test.rs"]
mod tests;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;

use super::{Storage, StoreDocument, StoreError};

/// Keeps the whole state in one pretty-printed JSON file.
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(suffix);
        PathBuf::from(name)
    }

    /// Move an unreadable file out of the way so the next save does not
    /// overwrite it.
    async fn quarantine(&self) {
        let target = self.sibling(".corrupt");
        match tokio::fs::rename(&self.path, &target).await {
            Ok(_) => log::warn!("Moved unreadable state file to {}", target.display()),
            Err(err) => log::error!(
                "Failed to move unreadable state file {}: {}",
                self.display_path(),
                err
            ),
        }
    }
}

#[async_trait]
impl Storage for JsonFileStorage {
    fn name(&self) -> &str {
        "json-file"
    }

    async fn load(&self) -> Result<StoreDocument, StoreError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("State file {} does not exist yet", self.display_path());
                return Ok(StoreDocument::default());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.display_path(),
                    source,
                });
            }
        };

        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(StoreDocument::default());
        }

        // Bytes that are not UTF-8 are corrupt content, not a read failure.
        let parsed = serde_json::from_slice::<Value>(&raw)
            .map_err(|err| err.to_string())
            .and_then(|value| StoreDocument::from_value(value).map_err(|err| err.to_string()));

        match parsed {
            Ok(document) => Ok(document),
            Err(err) => {
                log::error!(
                    "State file {} is corrupt, starting empty: {}",
                    self.display_path(),
                    err
                );
                self.quarantine().await;
                Ok(StoreDocument::default())
            }
        }
    }

    async fn save(&self, document: &StoreDocument) -> Result<(), StoreError> {
        let payload = serde_json::to_string_pretty(document)?;
        let tmp = self.sibling(".tmp");

        tokio::fs::write(&tmp, payload)
            .await
            .map_err(|source| StoreError::Write {
                path: tmp.display().to_string(),
                source,
            })?;

        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|source| StoreError::Write {
                path: self.display_path(),
                source,
            })?;

        log::trace!(
            "Saved {} conversations to {}",
            document.len(),
            self.display_path()
        );
        Ok(())
    }
}

//! Input manager for loading record files

use crate::error::{MatcherError, Result};
use crate::input::decoder::{JsonDecoder, RecordDecoder, TomlDecoder};
use crate::input::file_detector::FileType;
use log::info;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;

pub struct InputManager {
    cache: HashMap<String, String>,
    enable_cache: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    /// Load a single record (candidate, job, questions) from a JSON or TOML file.
    pub async fn load<T: DeserializeOwned>(&mut self, path: &Path) -> Result<T> {
        let file_type = self.detect_file_type(path)?;
        let content = self.read(path).await?;

        match file_type {
            FileType::Json => JsonDecoder.decode(&content),
            FileType::Toml => TomlDecoder.decode(&content),
            FileType::Unknown => Err(unsupported(path)),
        }
    }

    /// Load a list of records. JSON files may hold a bare array; TOML files
    /// keep the list under `key` (`[[jobs]]`, `[[applications]]`, ...).
    pub async fn load_list<T: DeserializeOwned>(&mut self, path: &Path, key: &str) -> Result<Vec<T>> {
        let file_type = self.detect_file_type(path)?;
        let content = self.read(path).await?;

        let records: Vec<T> = match file_type {
            FileType::Json => JsonDecoder.decode_list(&content, key)?,
            FileType::Toml => TomlDecoder.decode_list(&content, key)?,
            FileType::Unknown => return Err(unsupported(path)),
        };

        info!("Loaded {} {} from {}", records.len(), key, path.display());
        Ok(records)
    }

    async fn read(&mut self, path: &Path) -> Result<String> {
        let path_str = path.to_string_lossy().to_string();

        if self.enable_cache {
            if let Some(cached) = self.cache.get(&path_str) {
                info!("Using cached content for: {}", path.display());
                return Ok(cached.clone());
            }
        }

        if !path.exists() {
            return Err(MatcherError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path).await?;

        if self.enable_cache {
            self.cache.insert(path_str, content.clone());
        }

        Ok(content)
    }

    fn detect_file_type(&self, path: &Path) -> Result<FileType> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                MatcherError::InvalidInput(format!("File has no extension: {}", path.display()))
            })?;

        Ok(FileType::from_extension(extension))
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

fn unsupported(path: &Path) -> MatcherError {
    MatcherError::UnsupportedFormat(format!(
        "Expected a .json or .toml record file: {}",
        path.display()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::records::{CandidateRecord, JobRecord};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_json_and_toml_records() {
        let dir = TempDir::new().unwrap();
        let json_path = dir.path().join("candidate.json");
        std::fs::write(&json_path, r#"{"id":"c1","skills":["Rust"]}"#).unwrap();
        let toml_path = dir.path().join("jobs.toml");
        std::fs::write(
            &toml_path,
            "[[jobs]]\nid = \"j1\"\ntitle = \"Engineer\"\nrequirements = [\"Rust\"]\n",
        )
        .unwrap();

        let mut manager = InputManager::new();
        let candidate: CandidateRecord = manager.load(&json_path).await.unwrap();
        let jobs: Vec<JobRecord> = manager.load_list(&toml_path, "jobs").await.unwrap();

        assert_eq!(candidate.id, "c1");
        assert_eq!(jobs[0].title, "Engineer");
        assert_eq!(manager.cache_size(), 2);
    }

    #[tokio::test]
    async fn test_rejects_missing_and_unsupported_files() {
        let dir = TempDir::new().unwrap();
        let pdf = dir.path().join("resume.pdf");
        std::fs::write(&pdf, "binary").unwrap();

        let mut manager = InputManager::new().with_cache(false);
        let missing = manager.load::<CandidateRecord>(&dir.path().join("nope.json")).await;
        assert!(matches!(missing, Err(MatcherError::InvalidInput(_))));

        let unsupported = manager.load::<CandidateRecord>(&pdf).await;
        assert!(matches!(unsupported, Err(MatcherError::UnsupportedFormat(_))));
        assert_eq!(manager.cache_size(), 0);
    }
}

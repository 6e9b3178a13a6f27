//! Report document files.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{StorageConfig, StorageError};
use crate::models::ReportDocument;

/// Reads and writes report documents in the converted directory.
#[derive(Debug, Clone)]
pub struct ReportStore {
    dir: PathBuf,
}

impl ReportStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.converted_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load a report document from `path`.
    pub fn load(path: &Path) -> Result<ReportDocument, StorageError> {
        if !path.exists() {
            return Err(StorageError::PathNotFound(path.to_path_buf()));
        }
        let contents = fs::read_to_string(path)?;
        let document: ReportDocument = serde_json::from_str(&contents)?;
        debug!(
            "Loaded report {:?} with {} players",
            path,
            document.players.len()
        );
        Ok(document)
    }

    /// Path of the newest report: the lexicographically last
    /// `report_*.json`, which is the newest for timestamped names.
    pub fn latest_path(&self) -> Result<PathBuf, StorageError> {
        if !self.dir.exists() {
            return Err(StorageError::PathNotFound(self.dir.clone()));
        }
        let pattern = self.dir.join("report_*.json");
        let pattern = pattern.to_string_lossy();

        glob::glob(&pattern)?
            .filter_map(Result::ok)
            .filter(|p| p.is_file())
            .max()
            .ok_or_else(|| StorageError::NoReports(self.dir.clone()))
    }

    /// Load the newest report in the store.
    pub fn latest(&self) -> Result<(PathBuf, ReportDocument), StorageError> {
        let path = self.latest_path()?;
        let document = Self::load(&path)?;
        Ok((path, document))
    }

    /// Write a document as pretty JSON, creating parent directories.
    pub fn write(path: &Path, document: &ReportDocument) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(document)?;
        fs::write(path, json)?;
        info!(
            "Wrote report with {} players to {:?}",
            document.players.len(),
            path
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventInfo, Player};
    use tempfile::TempDir;

    fn document(generated_at: &str) -> ReportDocument {
        ReportDocument {
            event: Some(EventInfo {
                id: "spring".to_string(),
                date: "2025-04-12".to_string(),
            }),
            generated_at: generated_at.to_string(),
            players: vec![Player::new("player-01", "Mamoru")],
            ..Default::default()
        }
    }

    #[test]
    fn test_write_creates_dirs_and_loads_back() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/converted/report_20250412.json");

        ReportStore::write(&path, &document("2025-04-12T09:00:00Z")).unwrap();
        let loaded = ReportStore::load(&path).unwrap();

        assert_eq!(loaded.generated_at, "2025-04-12T09:00:00Z");
        assert_eq!(loaded.players.len(), 1);
        assert_eq!(loaded.event_or_placeholder().id, "spring");
    }

    #[test]
    fn test_latest_picks_last_name() {
        let temp = TempDir::new().unwrap();
        let config = StorageConfig::new(temp.path().to_path_buf());
        let store = ReportStore::from_config(&config);

        ReportStore::write(&store.dir().join("report_20250301.json"), &document("a")).unwrap();
        ReportStore::write(&store.dir().join("report_20250412.json"), &document("b")).unwrap();
        fs::write(store.dir().join("notes.json"), "{}").unwrap();

        let (path, latest) = store.latest().unwrap();
        assert!(path.ends_with("report_20250412.json"));
        assert_eq!(latest.generated_at, "b");
    }

    #[test]
    fn test_latest_without_reports() {
        let temp = TempDir::new().unwrap();
        let store = ReportStore::new(temp.path().to_path_buf());

        assert!(matches!(store.latest(), Err(StorageError::NoReports(_))));
    }

    #[test]
    fn test_missing_paths() {
        let temp = TempDir::new().unwrap();
        let store = ReportStore::new(temp.path().join("absent"));

        assert!(matches!(store.latest(), Err(StorageError::PathNotFound(_))));
        assert!(matches!(
            ReportStore::load(&temp.path().join("report_x.json")),
            Err(StorageError::PathNotFound(_))
        ));
    }

    #[test]
    fn test_load_invalid_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("report_bad.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(ReportStore::load(&path), Err(StorageError::Json(_))));
    }
}

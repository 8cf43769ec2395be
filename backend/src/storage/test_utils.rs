//! Test environment with one fresh store per backend.
//!
//! The CSV files live in a `TempDir` that is removed when the environment is
//! dropped, even if the test panics. SQLite runs in memory.

use tempfile::TempDir;

use super::csv::{CsvPaths, CsvStorage};
use super::sqlite::SqliteStorage;
use super::Storage;

pub struct TestEnvironment {
    _temp_dir: TempDir,
    pub csv_paths: CsvPaths,
    pub csv: CsvStorage,
    pub sqlite: SqliteStorage,
}

impl TestEnvironment {
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let csv_paths = CsvPaths::in_directory(temp_dir.path());
        let csv = CsvStorage::open(csv_paths.clone()).expect("open CSV storage");
        let sqlite = SqliteStorage::open_in_memory()
            .await
            .expect("open in-memory SQLite");

        Self {
            _temp_dir: temp_dir,
            csv_paths,
            csv,
            sqlite,
        }
    }

    /// A second CSV storage over the same files
    pub fn open_csv(&self) -> CsvStorage {
        CsvStorage::open(self.csv_paths.clone()).expect("reopen CSV storage")
    }

    /// Every backend that runs without external services
    pub fn backends(&self) -> Vec<&dyn Storage> {
        vec![&self.csv, &self.sqlite]
    }
}

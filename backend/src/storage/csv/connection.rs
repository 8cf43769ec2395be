use std::fs::{self, OpenOptions};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard};
use tracing::info;

use crate::domain::models::DropdownList;
use crate::storage::StorageResult;

pub const ENTRY_HEADER: &[&str] = &[
    "id",
    "date",
    "month",
    "origin_country",
    "main_impact_country",
    "relevant_exchange",
    "event_type",
    "who_input",
    "when_input",
    "details",
];

pub const DROPDOWN_HEADER: &[&str] = &["value", "order_index"];

pub const EVENT_HEADER: &[&str] = &[
    "id",
    "event_name",
    "event_type",
    "origin_country",
    "main_impact_country",
    "relevant_exchange",
    "month",
    "year",
    "description",
    "created_at",
];

/// Locations of the five CSV files
#[derive(Debug, Clone, PartialEq)]
pub struct CsvPaths {
    pub entries: PathBuf,
    pub countries: PathBuf,
    pub exchanges: PathBuf,
    pub event_types: PathBuf,
    pub events: PathBuf,
}

impl CsvPaths {
    /// The standard file names inside `directory`
    pub fn in_directory<P: AsRef<Path>>(directory: P) -> Self {
        let dir = directory.as_ref();
        Self {
            entries: dir.join("data.csv"),
            countries: dir.join("countries.csv"),
            exchanges: dir.join("exchanges.csv"),
            event_types: dir.join("event_types.csv"),
            events: dir.join("events.csv"),
        }
    }
}

/// One CSV file and the lock that serializes its writers.
///
/// Writers hold the guard from [`CsvFile::lock`] across the whole
/// read-modify-write cycle. Readers never lock: every rewrite lands through
/// a rename, so a reader sees either the old file or the new one.
#[derive(Debug)]
pub struct CsvFile {
    path: PathBuf,
    header: &'static [&'static str],
    lock: Mutex<()>,
}

impl CsvFile {
    fn new(path: PathBuf, header: &'static [&'static str]) -> Self {
        Self {
            path,
            header,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn lock(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().await
    }

    /// Create the file with its header row if it does not exist yet
    fn ensure_exists(&self) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        if !self.path.exists() {
            self.write_rows::<()>(&[])?;
            info!("Created {}", self.path.display());
        }
        Ok(())
    }

    pub fn read_rows<T: DeserializeOwned>(&self) -> StorageResult<Vec<T>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_path(&self.path)?;
        let mut rows = Vec::new();
        for row in reader.deserialize() {
            rows.push(row?);
        }
        Ok(rows)
    }

    /// Replace the file contents with `rows`, through a temp file and a rename
    pub fn write_rows<T: Serialize>(&self, rows: &[T]) -> StorageResult<()> {
        let temp_path = self.path.with_extension("csv.tmp");
        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(BufWriter::new(file));
            writer.write_record(self.header)?;
            for row in rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

/// CsvConnection owns the five CSV files and makes sure they exist
#[derive(Debug)]
pub struct CsvConnection {
    paths: CsvPaths,
    entries: CsvFile,
    countries: CsvFile,
    exchanges: CsvFile,
    event_types: CsvFile,
    events: CsvFile,
}

impl CsvConnection {
    pub fn new(paths: CsvPaths) -> StorageResult<Self> {
        let connection = Self {
            entries: CsvFile::new(paths.entries.clone(), ENTRY_HEADER),
            countries: CsvFile::new(paths.countries.clone(), DROPDOWN_HEADER),
            exchanges: CsvFile::new(paths.exchanges.clone(), DROPDOWN_HEADER),
            event_types: CsvFile::new(paths.event_types.clone(), DROPDOWN_HEADER),
            events: CsvFile::new(paths.events.clone(), EVENT_HEADER),
            paths,
        };
        for file in connection.files() {
            file.ensure_exists()?;
        }
        Ok(connection)
    }

    pub fn paths(&self) -> &CsvPaths {
        &self.paths
    }

    pub fn entries(&self) -> &CsvFile {
        &self.entries
    }

    pub fn events(&self) -> &CsvFile {
        &self.events
    }

    pub fn dropdown(&self, list: DropdownList) -> &CsvFile {
        match list {
            DropdownList::Countries => &self.countries,
            DropdownList::Exchanges => &self.exchanges,
            DropdownList::EventTypes => &self.event_types,
        }
    }

    fn files(&self) -> [&CsvFile; 5] {
        [
            &self.entries,
            &self.countries,
            &self.exchanges,
            &self.event_types,
            &self.events,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Pair {
        value: String,
        order_index: i64,
    }

    #[test]
    fn test_new_creates_every_file_with_its_header() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CsvPaths::in_directory(temp_dir.path().join("nested"));
        CsvConnection::new(paths.clone()).unwrap();

        let data = fs::read_to_string(&paths.entries).unwrap();
        assert_eq!(data.trim_end(), ENTRY_HEADER.join(","));
        let countries = fs::read_to_string(&paths.countries).unwrap();
        assert_eq!(countries.trim_end(), "value,order_index");
        let events = fs::read_to_string(&paths.events).unwrap();
        assert!(events.starts_with("id,event_name,"));
    }

    #[test]
    fn test_existing_files_are_left_alone() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CsvPaths::in_directory(temp_dir.path());
        fs::write(&paths.countries, "value,order_index\nUSA,0\n").unwrap();

        let connection = CsvConnection::new(paths).unwrap();
        let rows: Vec<Pair> = connection.dropdown(DropdownList::Countries).read_rows().unwrap();
        assert_eq!(
            rows,
            vec![Pair {
                value: "USA".to_string(),
                order_index: 0
            }]
        );
    }

    #[test]
    fn test_write_rows_replaces_contents_and_quotes_commas() {
        let temp_dir = TempDir::new().unwrap();
        let connection = CsvConnection::new(CsvPaths::in_directory(temp_dir.path())).unwrap();
        let file = connection.dropdown(DropdownList::EventTypes);

        let rows = vec![Pair {
            value: "Mergers, Acquisitions".to_string(),
            order_index: 3,
        }];
        file.write_rows(&rows).unwrap();

        let raw = fs::read_to_string(file.path()).unwrap();
        assert!(raw.contains("\"Mergers, Acquisitions\",3"));
        assert_eq!(file.read_rows::<Pair>().unwrap(), rows);
        assert!(!file.path().with_extension("csv.tmp").exists());
    }
}

use std::{
    future::Future,
    io::ErrorKind,
    ops::Deref,
    path::{Path, PathBuf},
};

use tracing::{debug, trace};

use super::{
    entities::{ActivityRecord, RawActivityRow, COLUMNS},
    error::StoreError,
};

/// Result of reading the activity file.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LoadedRecords {
    pub records: Vec<ActivityRecord>,
    /// Rows that were present but couldn't be turned into a record.
    pub dropped: usize,
}

/// Interface for abstracting storage of activity records. The whole collection is always read
/// and written at once.
pub trait ActivityStorage {
    /// Reads every stored record. Returns [None] if nothing has been stored yet.
    fn load(&self) -> impl Future<Output = Result<Option<LoadedRecords>, StoreError>>;

    /// Replaces stored data with `records`, keeping their order.
    fn persist(&self, records: &[ActivityRecord]) -> impl Future<Output = Result<(), StoreError>>;
}

impl<T: Deref> ActivityStorage for T
where
    T::Target: ActivityStorage,
{
    fn load(&self) -> impl Future<Output = Result<Option<LoadedRecords>, StoreError>> {
        self.deref().load()
    }

    fn persist(&self, records: &[ActivityRecord]) -> impl Future<Output = Result<(), StoreError>> {
        self.deref().persist(records)
    }
}

/// The main realization of [ActivityStorage]. Keeps records in a comma separated file with a
/// header row, so the file stays editable by hand.
pub struct CsvActivityStorage {
    path: PathBuf,
}

impl CsvActivityStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ActivityStorage for CsvActivityStorage {
    async fn load(&self) -> Result<Option<LoadedRecords>, StoreError> {
        debug!("Loading activities from {:?}", self.path);
        let content = match tokio::fs::read(&self.path).await {
            Ok(v) => v,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => Err(e)?,
        };
        parse_activities(&content).map(Some)
    }

    async fn persist(&self, records: &[ActivityRecord]) -> Result<(), StoreError> {
        let buffer = serialize_activities(records)?;
        tokio::fs::write(&self.path, buffer).await?;
        debug!("Saved {} activities into {:?}", records.len(), self.path);
        Ok(())
    }
}

fn parse_activities(content: &[u8]) -> Result<LoadedRecords, StoreError> {
    if content.iter().all(u8::is_ascii_whitespace) {
        return Ok(LoadedRecords::default());
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content);

    let headers = reader.headers()?.clone();
    for column in COLUMNS {
        if !headers.iter().any(|header| header == column) {
            return Err(StoreError::MissingColumn(column));
        }
    }

    let mut loaded = LoadedRecords::default();
    for (index, row) in reader.records().enumerate() {
        // Row numbers are 1-based and skip the header.
        let line = index + 2;
        let row = match row {
            Ok(row) if row.len() == headers.len() => row,
            Ok(row) => {
                trace!("Dropping row {line} with {} fields", row.len());
                loaded.dropped += 1;
                continue;
            }
            Err(e) => {
                trace!("Dropping unreadable row {line}: {e}");
                loaded.dropped += 1;
                continue;
            }
        };
        match row
            .deserialize::<RawActivityRow>(Some(&headers))
            .map(RawActivityRow::coerce)
        {
            Ok(Some(record)) => loaded.records.push(record),
            Ok(None) => {
                trace!("Dropping incomplete row {line}");
                loaded.dropped += 1;
            }
            Err(e) => {
                trace!("Dropping unreadable row {line}: {e}");
                loaded.dropped += 1;
            }
        }
    }
    Ok(loaded)
}

fn serialize_activities(records: &[ActivityRecord]) -> Result<Vec<u8>, StoreError> {
    // Header is written by hand so an empty log still produces a valid file.
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::<u8>::new());
    writer.write_record(COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer
        .into_inner()
        .map_err(|e| StoreError::Io(e.into_error()))
}

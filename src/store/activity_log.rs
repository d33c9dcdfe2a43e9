use tracing::{error, info, warn};

use super::{
    entities::{ActivityRecord, NewActivity},
    error::{AddError, StoreError},
    record_storage::{ActivityStorage, LoadedRecords},
};

/// What happened when the log was opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// There was no stored data, the log starts empty.
    Fresh,
    Loaded { kept: usize, dropped: usize },
    /// Stored data couldn't be read. The log starts empty and the next save overwrites it.
    Failed(String),
}

/// Ordered, append-only collection of activities backed by an [ActivityStorage]. Every mutation
/// is followed by a full save.
pub struct ActivityLog<S: ActivityStorage> {
    storage: S,
    records: Vec<ActivityRecord>,
    status: LoadStatus,
}

impl<S: ActivityStorage> ActivityLog<S> {
    /// Loads everything from `storage`. Never fails: unreadable data results in an empty log
    /// and [LoadStatus::Failed].
    pub async fn open(storage: S) -> Self {
        let (records, status) = match storage.load().await {
            Ok(None) => {
                info!("No stored activities found. Starting new tracker");
                (vec![], LoadStatus::Fresh)
            }
            Ok(Some(LoadedRecords { records, dropped })) => {
                info!("Loaded {} activities, dropped {dropped} rows", records.len());
                let kept = records.len();
                (records, LoadStatus::Loaded { kept, dropped })
            }
            Err(e) => {
                error!("Failed to load activities {e:?}");
                (vec![], LoadStatus::Failed(e.to_string()))
            }
        };
        Self {
            storage,
            records,
            status,
        }
    }

    pub fn records(&self) -> &[ActivityRecord] {
        &self.records
    }

    pub fn load_status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Writes the whole log into storage.
    pub async fn persist(&self) -> Result<(), StoreError> {
        self.storage
            .persist(&self.records)
            .await
            .inspect_err(|e| warn!("Failed to save activities {e:?}"))
    }

    /// Appends `record` and saves the log. The record stays in memory even if saving fails, so
    /// a later successful save will still include it.
    pub async fn add(&mut self, record: ActivityRecord) -> Result<(), StoreError> {
        info!("Adding activity {:?}", record);
        self.records.push(record);
        self.persist().await
    }

    /// Validates raw input and adds it. Invalid input leaves the log untouched.
    pub async fn add_activity(
        &mut self,
        activity: NewActivity,
    ) -> Result<ActivityRecord, AddError> {
        let record = ActivityRecord::try_from(activity)?;
        self.add(record.clone()).await?;
        Ok(record)
    }
}

use crate::validation::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed activity file: {0}")]
    Csv(#[from] csv::Error),

    #[error("activity file is missing the {0:?} column")]
    MissingColumn(&'static str),
}

#[derive(Debug, Error)]
pub enum AddError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("activity was recorded but couldn't be saved: {0}")]
    Persist(#[from] StoreError),
}

use chrono::NaiveTime;
use thiserror::Error;

use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum AvailabilityError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Work window start {start} is after end {end}")]
    InvalidWindow { start: NaiveTime, end: NaiveTime },

    #[error("Failed to read occupied slots: {0}")]
    OccupiedRead(#[from] anyhow::Error),
}

impl From<AvailabilityError> for AppError {
    fn from(err: AvailabilityError) -> Self {
        match err {
            AvailabilityError::InvalidInput(_) | AvailabilityError::InvalidWindow { .. } => {
                AppError::ValidationError(err.to_string())
            }
            AvailabilityError::OccupiedRead(_) => AppError::ExternalService(err.to_string()),
        }
    }
}

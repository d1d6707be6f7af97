use crate::models::TribeId;
use thiserror::Error;

/// All possible errors raised by the slot store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Tribe {0} not found")]
    TribeNotFound(TribeId),

    #[error("Tribe {0} is already stored")]
    TribeAlreadyExists(TribeId),

    #[error("Slot timers of tribe {tribe_id} are malformed: {len} bytes is not a whole number of timers")]
    MalformedTimers { tribe_id: TribeId, len: usize },

    #[error("Slot timers of tribe {tribe_id} hold an unsupported {kind} value")]
    UnsupportedTimerValue { tribe_id: TribeId, kind: &'static str },

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    /// Map an insert failure, turning key violations into `TribeAlreadyExists`.
    pub(crate) fn from_insert(err: rusqlite::Error, tribe_id: TribeId) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(sqlite_err, _)
                if sqlite_err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                    || sqlite_err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                StoreError::TribeAlreadyExists(tribe_id)
            }
            _ => StoreError::Db(err),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::ffi;

    fn sqlite_failure(extended_code: i32) -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(
            ffi::Error {
                code: rusqlite::ErrorCode::ConstraintViolation,
                extended_code,
            },
            None,
        )
    }

    #[test]
    fn test_primary_key_violation_maps_to_already_exists() {
        let err = StoreError::from_insert(sqlite_failure(ffi::SQLITE_CONSTRAINT_PRIMARYKEY), 7);
        assert!(matches!(err, StoreError::TribeAlreadyExists(7)));
    }

    #[test]
    fn test_unique_violation_maps_to_already_exists() {
        let err = StoreError::from_insert(sqlite_failure(ffi::SQLITE_CONSTRAINT_UNIQUE), 3);
        assert!(matches!(err, StoreError::TribeAlreadyExists(3)));
    }

    #[test]
    fn test_other_errors_stay_db_errors() {
        let err = StoreError::from_insert(rusqlite::Error::QueryReturnedNoRows, 1);
        assert!(matches!(err, StoreError::Db(_)));
    }

    #[test]
    fn test_malformed_message() {
        let err = StoreError::MalformedTimers { tribe_id: 9, len: 5 };
        assert_eq!(
            err.to_string(),
            "Slot timers of tribe 9 are malformed: 5 bytes is not a whole number of timers"
        );
    }
}

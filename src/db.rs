use crate::error::{Result, StoreError};
use crate::models::{SlotTimers, TribeId, TribeRecord};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

/// Database handle
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database connection
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Database { conn })
    }

    /// Open an in-memory database for testing
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Database { conn })
    }

    /// Switch to WAL journaling, returning the mode SQLite reports.
    ///
    /// In-memory databases answer `memory`.
    pub fn enable_wal(&self) -> Result<String> {
        let mode = self
            .conn
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))?;
        Ok(mode)
    }

    /// Initialize the database schema
    pub fn init(&self) -> Result<()> {
        // Older files declare TribeId as AUTOINCREMENT; IF NOT EXISTS leaves them alone.
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS TribeSlots (
                TribeId INTEGER PRIMARY KEY NOT NULL,
                SlotsTimer BLOB
            )",
            [],
        )?;
        Ok(())
    }

    /// Check if database is initialized
    pub fn is_initialized(&self) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='TribeSlots'",
            [],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    // ==================== Tribe Operations ====================

    pub fn insert_tribe(&self, tribe_id: TribeId, timers: &SlotTimers) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO TribeSlots (TribeId, SlotsTimer) VALUES (?1, ?2)",
                (tribe_id, timers.to_blob()),
            )
            .map_err(|e| StoreError::from_insert(e, tribe_id))?;
        Ok(())
    }

    pub fn get_slot_timers(&self, tribe_id: TribeId) -> Result<Option<SlotTimers>> {
        let value = self
            .conn
            .query_row(
                "SELECT SlotsTimer FROM TribeSlots WHERE TribeId = ?1",
                [tribe_id],
                |row| row.get::<_, Value>(0),
            )
            .optional()?;

        value.map(|v| decode_timers(tribe_id, v)).transpose()
    }

    /// Replace the timers of a tribe, returning the number of rows touched.
    pub fn update_slot_timers(&self, tribe_id: TribeId, timers: &SlotTimers) -> Result<usize> {
        let changed = self.conn.execute(
            "UPDATE TribeSlots SET SlotsTimer = ?1 WHERE TribeId = ?2",
            (timers.to_blob(), tribe_id),
        )?;
        Ok(changed)
    }

    pub fn count_tribe(&self, tribe_id: TribeId) -> Result<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(1) FROM TribeSlots WHERE TribeId = ?1",
            [tribe_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Delete a tribe, returning the number of rows removed.
    pub fn delete_tribe(&self, tribe_id: TribeId) -> Result<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM TribeSlots WHERE TribeId = ?1", [tribe_id])?;
        Ok(removed)
    }

    pub fn list_tribes(&self) -> Result<Vec<TribeRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT TribeId, SlotsTimer FROM TribeSlots ORDER BY TribeId")?;

        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, TribeId>(0)?, row.get::<_, Value>(1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(tribe_id, value)| {
                Ok(TribeRecord {
                    tribe_id,
                    slot_timers: decode_timers(tribe_id, value)?,
                })
            })
            .collect()
    }

    /// Checkpoint the write-ahead log and close the connection.
    pub fn close(self) -> Result<()> {
        self.conn
            .query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))?;
        self.conn.close().map_err(|(_, e)| StoreError::Db(e))
    }

    #[cfg(test)]
    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }
}

/// Turn a stored `SlotsTimer` column into timers.
///
/// NULL reads as no timers. A bare integer is what the first plugin release
/// wrote on insert and reads as a single timer.
fn decode_timers(tribe_id: TribeId, value: Value) -> Result<SlotTimers> {
    match value {
        Value::Null => Ok(SlotTimers::default()),
        Value::Blob(bytes) => {
            SlotTimers::from_blob(&bytes).ok_or(StoreError::MalformedTimers {
                tribe_id,
                len: bytes.len(),
            })
        }
        Value::Integer(n) => i32::try_from(n)
            .map(|t| SlotTimers::new(vec![t]))
            .map_err(|_| StoreError::UnsupportedTimerValue {
                tribe_id,
                kind: "out-of-range integer",
            }),
        Value::Real(_) => Err(StoreError::UnsupportedTimerValue {
            tribe_id,
            kind: "real",
        }),
        Value::Text(_) => Err(StoreError::UnsupportedTimerValue {
            tribe_id,
            kind: "text",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_test_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.init().unwrap();
        db
    }

    #[test]
    fn test_init_is_idempotent() {
        let db = Database::open_in_memory().unwrap();
        assert!(!db.is_initialized().unwrap());

        db.init().unwrap();
        db.init().unwrap();
        assert!(db.is_initialized().unwrap());
    }

    #[test]
    fn test_enable_wal_on_memory_db() {
        let db = Database::open_in_memory().unwrap();
        let mode = db.enable_wal().unwrap().to_lowercase();
        assert!(mode == "wal" || mode == "memory");
    }

    #[test]
    fn test_insert_and_get() {
        let db = setup_test_db();
        db.insert_tribe(5, &SlotTimers::initial()).unwrap();

        let timers = db.get_slot_timers(5).unwrap().unwrap();
        assert_eq!(timers.as_slice(), &[0]);
        assert!(db.get_slot_timers(6).unwrap().is_none());
    }

    #[test]
    fn test_insert_duplicate() {
        let db = setup_test_db();
        db.insert_tribe(5, &SlotTimers::initial()).unwrap();

        let err = db.insert_tribe(5, &SlotTimers::initial()).unwrap_err();
        assert!(matches!(err, StoreError::TribeAlreadyExists(5)));
        assert_eq!(db.count_tribe(5).unwrap(), 1);
    }

    #[test]
    fn test_update_reports_rows() {
        let db = setup_test_db();
        db.insert_tribe(1, &SlotTimers::initial()).unwrap();

        let timers = SlotTimers::new(vec![120, 45, 0]);
        assert_eq!(db.update_slot_timers(1, &timers).unwrap(), 1);
        assert_eq!(db.update_slot_timers(2, &timers).unwrap(), 0);
        assert_eq!(db.get_slot_timers(1).unwrap().unwrap(), timers);
        assert_eq!(db.count_tribe(2).unwrap(), 0);
    }

    #[test]
    fn test_delete() {
        let db = setup_test_db();
        db.insert_tribe(1, &SlotTimers::initial()).unwrap();

        assert_eq!(db.delete_tribe(1).unwrap(), 1);
        assert_eq!(db.delete_tribe(1).unwrap(), 0);
        assert_eq!(db.count_tribe(1).unwrap(), 0);
    }

    #[test]
    fn test_list_ordered_by_id() {
        let db = setup_test_db();
        db.insert_tribe(30, &SlotTimers::new(vec![1])).unwrap();
        db.insert_tribe(10, &SlotTimers::new(vec![2, 3])).unwrap();

        let records = db.list_tribes().unwrap();
        assert_eq!(
            records.iter().map(|r| r.tribe_id).collect::<Vec<_>>(),
            vec![10, 30]
        );
        assert_eq!(records[0].slot_timers.as_slice(), &[2, 3]);
    }

    #[test]
    fn test_legacy_integer_value() {
        let db = setup_test_db();
        db.conn()
            .execute("INSERT INTO TribeSlots VALUES (?1, ?2)", (4i64, 0i64))
            .unwrap();

        assert_eq!(db.get_slot_timers(4).unwrap().unwrap().as_slice(), &[0]);
    }

    #[test]
    fn test_null_value_is_empty() {
        let db = setup_test_db();
        db.conn()
            .execute("INSERT INTO TribeSlots (TribeId) VALUES (?1)", [8i64])
            .unwrap();

        assert!(db.get_slot_timers(8).unwrap().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_blob() {
        let db = setup_test_db();
        db.conn()
            .execute(
                "INSERT INTO TribeSlots VALUES (?1, ?2)",
                (2i64, vec![1u8, 2, 3]),
            )
            .unwrap();

        let err = db.get_slot_timers(2).unwrap_err();
        assert!(matches!(
            err,
            StoreError::MalformedTimers { tribe_id: 2, len: 3 }
        ));
    }

    #[test]
    fn test_text_value_rejected() {
        let db = setup_test_db();
        db.conn()
            .execute("INSERT INTO TribeSlots VALUES (?1, ?2)", (3i64, "0"))
            .unwrap();

        assert!(matches!(
            db.get_slot_timers(3).unwrap_err(),
            StoreError::UnsupportedTimerValue { tribe_id: 3, kind: "text" }
        ));
    }

    #[test]
    fn test_queries_fail_without_schema() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.count_tribe(1).is_err());
        assert!(db.get_slot_timers(1).is_err());
    }

    #[test]
    fn test_close() {
        let db = setup_test_db();
        db.close().unwrap();
    }
}

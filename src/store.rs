//! Tribe slot store.
//!
//! Two layers over the same table. The `try_*` methods report every outcome
//! through [`Result`]. The plugin-facing methods ([`TribeSlotStore::add_tribe`],
//! [`TribeSlotStore::get_tribe_slots_timer`], [`TribeSlotStore::update_slot_timer`],
//! [`TribeSlotStore::is_tribe_in_database`], [`TribeSlotStore::delete_tribe`])
//! never fail: errors are logged and collapse to an empty or `false` answer.

use crate::config::StoreConfig;
use crate::db::Database;
use crate::error::{Result, StoreError};
use crate::models::{SlotTimers, TribeId, TribeRecord};
use std::fs;
use std::path::Path;
use tracing::{debug, error, info};

/// Durable slot timers keyed by tribe.
///
/// Callers assume a single writer per tribe; a read followed by an update is
/// not atomic.
pub struct TribeSlotStore {
    db: Database,
    ready: bool,
}

impl TribeSlotStore {
    /// Open the store described by `config`.
    ///
    /// Only failing to open the file is an error. A schema that cannot be
    /// created is logged and leaves the store unusable (see [`Self::is_ready`]).
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let path = config.resolve()?;
        Self::open_path(&path)
    }

    /// Open the store at an explicit file path.
    pub fn open_path(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let db = Database::open(path)?;
        let store = Self::prepare(db);
        info!(path = %path.display(), ready = store.ready, "opened tribe slot store");
        Ok(store)
    }

    /// Open an in-memory store for testing
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::prepare(Database::open_in_memory()?))
    }

    fn prepare(db: Database) -> Self {
        let setup = db.enable_wal().and_then(|mode| {
            debug!(journal_mode = %mode, "journal mode set");
            db.init()
        });

        let ready = match setup {
            Ok(()) => true,
            Err(e) => {
                error!(operation = "open", error = %e, "unexpected DB error");
                false
            }
        };

        TribeSlotStore { db, ready }
    }

    /// Whether the schema was created on open
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Checkpoint and close, reporting any failure.
    pub fn close(self) -> Result<()> {
        self.db.close()
    }

    // ==================== Fallible API ====================

    pub fn try_add_tribe(&self, tribe_id: TribeId) -> Result<()> {
        self.db.insert_tribe(tribe_id, &SlotTimers::initial())?;
        debug!(tribe_id, "tribe added");
        Ok(())
    }

    /// Timers of a tribe, `None` when it has no row.
    pub fn try_get_slot_timers(&self, tribe_id: TribeId) -> Result<Option<SlotTimers>> {
        self.db.get_slot_timers(tribe_id)
    }

    /// Replace the timers of an existing tribe.
    pub fn try_update_slot_timers(&self, tribe_id: TribeId, timers: &SlotTimers) -> Result<()> {
        match self.db.update_slot_timers(tribe_id, timers)? {
            0 => Err(StoreError::TribeNotFound(tribe_id)),
            _ => {
                debug!(tribe_id, slots = timers.len(), "slot timers updated");
                Ok(())
            }
        }
    }

    pub fn try_contains(&self, tribe_id: TribeId) -> Result<bool> {
        Ok(self.db.count_tribe(tribe_id)? != 0)
    }

    /// Delete a tribe, returning whether it was stored.
    pub fn try_delete_tribe(&self, tribe_id: TribeId) -> Result<bool> {
        let removed = self.db.delete_tribe(tribe_id)? > 0;
        if removed {
            debug!(tribe_id, "tribe deleted");
        }
        Ok(removed)
    }

    /// Add the tribe unless it is already stored. Returns whether a row was created.
    pub fn ensure_tribe(&self, tribe_id: TribeId) -> Result<bool> {
        if self.try_contains(tribe_id)? {
            return Ok(false);
        }
        self.try_add_tribe(tribe_id)?;
        Ok(true)
    }

    pub fn list_tribes(&self) -> Result<Vec<TribeRecord>> {
        self.db.list_tribes()
    }

    // ==================== Plugin API ====================

    /// Insert a tribe with the initial timers. Callers check
    /// [`Self::is_tribe_in_database`] first; a duplicate is only logged.
    pub fn add_tribe(&self, tribe_id: TribeId) {
        if let Err(e) = self.try_add_tribe(tribe_id) {
            error!(operation = "add_tribe", tribe_id, error = %e, "unexpected DB error");
        }
    }

    /// Timers of a tribe. Missing rows and errors both read as empty.
    pub fn get_tribe_slots_timer(&self, tribe_id: TribeId) -> Vec<i32> {
        match self.try_get_slot_timers(tribe_id) {
            Ok(timers) => timers.map(SlotTimers::into_vec).unwrap_or_default(),
            Err(e) => {
                error!(operation = "get_tribe_slots_timer", tribe_id, error = %e, "unexpected DB error");
                Vec::new()
            }
        }
    }

    /// Replace the timers of a tribe.
    ///
    /// Returns `false` only on a storage error. Updating a tribe with no row
    /// changes nothing and still returns `true`.
    pub fn update_slot_timer(&self, tribe_id: TribeId, timers: &[i32]) -> bool {
        let timers = SlotTimers::new(timers.to_vec());
        match self.db.update_slot_timers(tribe_id, &timers) {
            Ok(_) => true,
            Err(e) => {
                error!(operation = "update_slot_timer", tribe_id, error = %e, "unexpected DB error");
                false
            }
        }
    }

    /// Whether a row exists. Errors read as `false`.
    pub fn is_tribe_in_database(&self, tribe_id: TribeId) -> bool {
        self.try_contains(tribe_id).unwrap_or_else(|e| {
            error!(operation = "is_tribe_in_database", tribe_id, error = %e, "unexpected DB error");
            false
        })
    }

    /// Remove a tribe; absent tribes are a no-op.
    pub fn delete_tribe(&self, tribe_id: TribeId) {
        if let Err(e) = self.try_delete_tribe(tribe_id) {
            error!(operation = "delete_tribe", tribe_id, error = %e, "unexpected DB error");
        }
    }
}

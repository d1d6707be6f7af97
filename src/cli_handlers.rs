use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::models::{SlotTimers, TribeId, TribeRecord};
use crate::store::TribeSlotStore;
use serde_json::json;
use std::path::PathBuf;

/// How command results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Text,
    Json,
}

/// Build the store location from the command line flags.
///
/// `--install-dir` wins over `--db`, so it still applies when
/// `TRIBE_SLOTS_DB` is exported.
pub fn store_config(db: Option<PathBuf>, install_dir: Option<PathBuf>) -> StoreConfig {
    match (db, install_dir) {
        (_, Some(dir)) => StoreConfig::with_path(StoreConfig::default().resolve_in(dir)),
        (Some(path), None) => StoreConfig::with_path(path),
        (None, None) => StoreConfig::default(),
    }
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Handle the init command
pub fn handle_init(config: &StoreConfig, output: Output) -> Result<()> {
    let path = config.resolve()?;
    let store = TribeSlotStore::open(config)?;
    let ready = store.is_ready();
    store.close()?;

    match output {
        Output::Json => print_json(&json!({ "path": path.display().to_string(), "ready": ready }))?,
        Output::Text => println!("Initialized tribe slot store at {}", path.display()),
    }
    Ok(())
}

/// Handle the add command
pub fn handle_add(config: &StoreConfig, tribe_id: TribeId, output: Output) -> Result<()> {
    let store = TribeSlotStore::open(config)?;
    store.try_add_tribe(tribe_id)?;

    match output {
        Output::Json => print_json(&serde_json::to_value(TribeRecord {
            tribe_id,
            slot_timers: SlotTimers::initial(),
        })?)?,
        Output::Text => println!("Added tribe {tribe_id}"),
    }
    Ok(())
}

/// Handle the get command
pub fn handle_get(config: &StoreConfig, tribe_id: TribeId, output: Output) -> Result<()> {
    let store = TribeSlotStore::open(config)?;
    let slot_timers = store
        .try_get_slot_timers(tribe_id)?
        .ok_or(StoreError::TribeNotFound(tribe_id))?;

    match output {
        Output::Json => print_json(&serde_json::to_value(TribeRecord {
            tribe_id,
            slot_timers,
        })?)?,
        Output::Text => println!("{slot_timers}"),
    }
    Ok(())
}

/// Handle the set command
pub fn handle_set(
    config: &StoreConfig,
    tribe_id: TribeId,
    timers: Vec<i32>,
    output: Output,
) -> Result<()> {
    let store = TribeSlotStore::open(config)?;
    let slot_timers = SlotTimers::new(timers);
    store.try_update_slot_timers(tribe_id, &slot_timers)?;

    match output {
        Output::Json => print_json(&serde_json::to_value(TribeRecord {
            tribe_id,
            slot_timers,
        })?)?,
        Output::Text => println!(
            "Updated tribe {tribe_id}: {} slot(s)",
            slot_timers.len()
        ),
    }
    Ok(())
}

/// Handle the exists command
pub fn handle_exists(config: &StoreConfig, tribe_id: TribeId, output: Output) -> Result<()> {
    let store = TribeSlotStore::open(config)?;
    let exists = store.try_contains(tribe_id)?;

    match output {
        Output::Json => print_json(&json!({ "tribe_id": tribe_id, "exists": exists }))?,
        Output::Text => println!("{exists}"),
    }
    Ok(())
}

/// Handle the delete command
pub fn handle_delete(config: &StoreConfig, tribe_id: TribeId, output: Output) -> Result<()> {
    let store = TribeSlotStore::open(config)?;
    if !store.try_delete_tribe(tribe_id)? {
        return Err(StoreError::TribeNotFound(tribe_id));
    }

    match output {
        Output::Json => print_json(&json!({ "tribe_id": tribe_id, "deleted": true }))?,
        Output::Text => println!("Deleted tribe {tribe_id}"),
    }
    Ok(())
}

/// Handle the list command
pub fn handle_list(config: &StoreConfig, output: Output) -> Result<()> {
    let store = TribeSlotStore::open(config)?;
    let records = store.list_tribes()?;

    match output {
        Output::Json => print_json(&serde_json::to_value(&records)?)?,
        Output::Text => {
            if records.is_empty() {
                println!("No tribes stored");
            }
            for record in &records {
                println!("{}: {}", record.tribe_id, record.slot_timers);
            }
        }
    }
    Ok(())
}

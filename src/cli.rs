use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tribe-slots")]
#[command(about = "Inspect and edit persisted tribe slot cooldowns")]
#[command(version)]
pub struct Cli {
    /// Database file (defaults to <install-dir>/ArkApi/Plugins/TribeSlotCooldown/Slots.db)
    #[arg(long, global = true, env = "TRIBE_SLOTS_DB")]
    pub db: Option<PathBuf>,

    /// Server install directory used for the default database location; overrides --db
    #[arg(long, global = true)]
    pub install_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the database file and schema
    Init,

    /// Add a tribe with the initial timers
    Add {
        /// Tribe ID
        #[arg(allow_negative_numbers = true)]
        tribe_id: i64,
    },

    /// Show the timers of a tribe
    Get {
        /// Tribe ID
        #[arg(allow_negative_numbers = true)]
        tribe_id: i64,
    },

    /// Replace the timers of a tribe
    Set {
        /// Tribe ID
        #[arg(allow_negative_numbers = true)]
        tribe_id: i64,
        /// New timers, one per slot
        #[arg(allow_negative_numbers = true)]
        timers: Vec<i32>,
    },

    /// Check whether a tribe is stored
    Exists {
        /// Tribe ID
        #[arg(allow_negative_numbers = true)]
        tribe_id: i64,
    },

    /// Remove a tribe
    Delete {
        /// Tribe ID
        #[arg(allow_negative_numbers = true)]
        tribe_id: i64,
    },

    /// List all stored tribes
    List,
}

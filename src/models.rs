use serde::{Deserialize, Serialize};
use std::fmt;

/// The game's own tribe identifier
pub type TribeId = i64;

/// Byte width of one encoded timer
const TIMER_WIDTH: usize = std::mem::size_of::<i32>();

/// Ordered cooldown timers, one per slot.
///
/// The store never interprets the values or the length; the slot count is a
/// caller convention.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotTimers(Vec<i32>);

impl SlotTimers {
    pub fn new(timers: Vec<i32>) -> Self {
        SlotTimers(timers)
    }

    /// Timers written for a freshly added tribe
    pub fn initial() -> Self {
        SlotTimers(vec![0])
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<i32> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Encode as little-endian 32-bit integers laid end to end
    pub fn to_blob(&self) -> Vec<u8> {
        self.0.iter().flat_map(|t| t.to_le_bytes()).collect()
    }

    /// Decode a blob written by [`SlotTimers::to_blob`].
    ///
    /// Returns `None` when the length is not a multiple of four bytes.
    pub fn from_blob(bytes: &[u8]) -> Option<Self> {
        if bytes.len() % TIMER_WIDTH != 0 {
            return None;
        }

        let timers = bytes
            .chunks_exact(TIMER_WIDTH)
            .map(|chunk| i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();
        Some(SlotTimers(timers))
    }
}

impl From<Vec<i32>> for SlotTimers {
    fn from(timers: Vec<i32>) -> Self {
        SlotTimers(timers)
    }
}

impl From<SlotTimers> for Vec<i32> {
    fn from(timers: SlotTimers) -> Self {
        timers.0
    }
}

impl fmt::Display for SlotTimers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        write!(f, "{joined}")
    }
}

/// One stored row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TribeRecord {
    pub tribe_id: TribeId,
    pub slot_timers: SlotTimers,
}

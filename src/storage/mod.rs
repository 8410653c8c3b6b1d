//! Storage module
//!
//! Load/save contract for foods, the daily log and the profile, with a JSON
//! file backend and an in-memory backend.

mod json;
mod memory;

use thiserror::Error;

use crate::models::{BasicFood, CompositeFood, DailyLog, UserProfile};

pub use json::JsonStorage;
pub use memory::{MemorySnapshot, MemoryStorage};

/// Storage error types
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Persistence backend for the tracker.
///
/// Loads never fail: missing or unreadable data comes back empty/default.
pub trait Storage: Send {
    fn load_foods(&self) -> (Vec<BasicFood>, Vec<CompositeFood>);
    fn load_daily_log(&self) -> DailyLog;
    fn load_profile(&self) -> UserProfile;

    fn save_basic_foods(&self, foods: &[BasicFood]) -> StorageResult<()>;
    fn save_composite_foods(&self, foods: &[CompositeFood]) -> StorageResult<()>;
    fn save_daily_log(&self, log: &DailyLog) -> StorageResult<()>;
    fn save_profile(&self, profile: &UserProfile) -> StorageResult<()>;

    /// Where the data lives, for status output
    fn describe(&self) -> String;
}

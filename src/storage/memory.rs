//! In-memory storage
//!
//! Keeps the last saved copy of each aggregate. Clones share state, so a
//! caller can keep a handle and inspect what the tracker saved.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::models::{BasicFood, CompositeFood, DailyLog, UserProfile};
use super::{Storage, StorageError, StorageResult};

/// Everything a `MemoryStorage` holds
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshot {
    pub basic_foods: Vec<BasicFood>,
    pub composite_foods: Vec<CompositeFood>,
    pub daily_log: DailyLog,
    pub profile: UserProfile,
    /// Number of successful saves
    pub saves: usize,
}

#[derive(Debug, Default)]
struct MemoryState {
    snapshot: MemorySnapshot,
    failing: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing data
    pub fn seeded(snapshot: MemorySnapshot) -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState {
                snapshot,
                failing: false,
            })),
        }
    }

    /// Make every save fail until switched back
    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    pub fn snapshot(&self) -> MemorySnapshot {
        self.lock().snapshot.clone()
    }

    // A poisoned lock still holds usable data
    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn save_with(&self, f: impl FnOnce(&mut MemorySnapshot)) -> StorageResult<()> {
        let mut state = self.lock();
        if state.failing {
            return Err(StorageError::Unavailable("memory storage set to fail".to_string()));
        }
        f(&mut state.snapshot);
        state.snapshot.saves += 1;
        Ok(())
    }
}

impl Storage for MemoryStorage {
    fn load_foods(&self) -> (Vec<BasicFood>, Vec<CompositeFood>) {
        let state = self.lock();
        (
            state.snapshot.basic_foods.clone(),
            state.snapshot.composite_foods.clone(),
        )
    }

    fn load_daily_log(&self) -> DailyLog {
        self.lock().snapshot.daily_log.clone()
    }

    fn load_profile(&self) -> UserProfile {
        self.lock().snapshot.profile.clone()
    }

    fn save_basic_foods(&self, foods: &[BasicFood]) -> StorageResult<()> {
        self.save_with(|s| s.basic_foods = foods.to_vec())
    }

    fn save_composite_foods(&self, foods: &[CompositeFood]) -> StorageResult<()> {
        self.save_with(|s| s.composite_foods = foods.to_vec())
    }

    fn save_daily_log(&self, log: &DailyLog) -> StorageResult<()> {
        self.save_with(|s| s.daily_log = log.clone())
    }

    fn save_profile(&self, profile: &UserProfile) -> StorageResult<()> {
        self.save_with(|s| s.profile = profile.clone())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

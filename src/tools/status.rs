//! YADA Status Tool
//!
//! Provides runtime status information about the YADA service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::models::CalorieMethod;
use crate::storage::JsonStorage;
use crate::tracker::Tracker;

/// Food logging instructions for AI assistants
pub const LOG_INSTRUCTIONS: &str = r#"
# YADA Food Logging Instructions

This guide explains how to track food with Yet Another Diet Assistant (YADA).

## Overview

YADA knows two kinds of food:
1. **Basic foods** - a fixed number of calories per serving
2. **Composite foods** - servings of other foods (basic or composite)

Consumption is logged per date as (food, servings) entries. Calories are
always computed from the catalog at query time, so a composite's calories
follow its ingredients.

---

## Food IDs

- IDs are unique across both kinds and compared case-insensitively
- `Apple` and `apple` are the same food; the first spelling is kept
- Use `search_foods` before adding to avoid duplicates

---

## Adding Foods

### Basic food
```
add_basic_food(id: "apple", keywords: ["fruit"], calories: 95)
```

### Composite food
Every ingredient must already exist. Multipliers are servings of the
ingredient per serving of the composite.
```
add_composite_food(
  id: "fruit bowl",
  keywords: ["fruit", "breakfast"],
  ingredients: {"apple": 2, "banana": 1}
)
```

Calories for a composite are rounded per basic ingredient and then summed.

---

## Logging

Dates are always `YYYY-MM-DD`.

```
log_food(date: "2024-01-01", food_id: "fruit bowl", servings: 1.5)
view_day(date: "2024-01-01")
```

To remove an entry, pass the same food and servings that were logged:
```
remove_log_entry(date: "2024-01-01", food_id: "fruit bowl", servings: 1.5)
```

`clear_day` removes everything for a date.

---

## Undo

`undo` reverts the most recent log change (log, remove or clear). Catalog
and profile changes are not undoable. Undo history is lost on restart.

---

## Deleting Foods

Deleting a food does not touch composites or log entries that use it.
Those stop resolving: `view_day` reports the missing food and
`calculate_calories` fails until a food with that ID is added again.

---

## Profile and Targets

```
set_profile(gender: "female", height_cm: 165, weight_kg: 60, age: 30,
            activity_level: "light", calorie_method: "mifflin-st-jeor")
target_calories()
```

| Activity level | Multiplier |
|----------------|------------|
| `sedentary` | 1.2 |
| `light` | 1.375 |
| `moderate` | 1.55 |
| `active` | 1.725 |

Unknown activity levels count as sedentary.

## Quick Reference

| Task | Tool |
|------|------|
| Add basic food | `add_basic_food` |
| Add composite food | `add_composite_food` |
| Food details | `get_food` |
| Find foods | `search_foods` / `list_foods` |
| Calories for servings | `calculate_calories` |
| Log consumption | `log_food` |
| See a day | `view_day` |
| Week at a glance | `weekly_calories` |
| Most eaten foods | `food_frequency` |
| Revert last log change | `undo` |
"#;

/// Runtime status of the YADA service
#[derive(Debug, Clone, Serialize)]
pub struct YadaStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Data information
    pub data_dir: String,
    pub data_size_bytes: u64,
    pub food_count: usize,
    pub logged_days: usize,
    pub undo_depth: usize,
    pub calorie_method: CalorieMethod,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    data_dir: PathBuf,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            data_dir,
        }
    }

    /// Get the current status
    pub fn get_status(&self, tracker: &Tracker) -> YadaStatus {
        let build_info = BuildInfo::current();

        let data_size_bytes = JsonStorage::new(&self.data_dir).size_on_disk();

        // Get process info
        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        YadaStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            data_dir: self.data_dir.display().to_string(),
            data_size_bytes,
            food_count: tracker.food_count(),
            logged_days: tracker.total_logged_days(),
            undo_depth: tracker.undo_depth(),
            calorie_method: tracker.calorie_method(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BasicFoodCreate;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_status_counts() {
        let mut tracker = Tracker::open(Box::new(MemoryStorage::new()));
        tracker
            .add_basic_food(BasicFoodCreate {
                id: "apple".to_string(),
                keywords: Vec::new(),
                calories: 95,
            })
            .unwrap();

        let status = StatusTracker::new(std::env::temp_dir().join("yada-status-none"))
            .get_status(&tracker);
        assert_eq!(status.food_count, 1);
        assert_eq!(status.logged_days, 0);
        assert_eq!(status.data_size_bytes, 0);
        assert_eq!(status.process_id, std::process::id());
    }
}

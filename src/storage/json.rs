//! JSON file storage
//!
//! One pretty-printed JSON document per aggregate inside a data directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::models::{BasicFood, CompositeFood, DailyLog, UserProfile};
use super::{Storage, StorageResult};

pub const BASIC_FOODS_FILE: &str = "basicFoods.json";
pub const COMPOSITE_FOODS_FILE: &str = "compositeFoods.json";
pub const DAILY_LOG_FILE: &str = "dailyLogs.json";
pub const PROFILE_FILE: &str = "userProfile.json";

/// Storage backed by JSON files in a directory
#[derive(Debug, Clone)]
pub struct JsonStorage {
    data_dir: PathBuf,
}

impl JsonStorage {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Combined size of the data files currently on disk
    pub fn size_on_disk(&self) -> u64 {
        [BASIC_FOODS_FILE, COMPOSITE_FOODS_FILE, DAILY_LOG_FILE, PROFILE_FILE]
            .iter()
            .filter_map(|name| fs::metadata(self.data_dir.join(name)).ok())
            .map(|m| m.len())
            .sum()
    }

    /// Read a document, or `None` if it is missing or unreadable
    fn read<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        let path = self.data_dir.join(name);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No existing data at {}", path.display());
                return None;
            }
            Err(e) => {
                tracing::warn!("Could not read {}: {}. Starting fresh.", path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Malformed data in {}: {}. Starting fresh.", path.display(), e);
                None
            }
        }
    }

    fn write<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> StorageResult<()> {
        fs::create_dir_all(&self.data_dir)?;
        let json = serde_json::to_string_pretty(value)?;
        fs::write(self.data_dir.join(name), json)?;
        Ok(())
    }
}

impl Storage for JsonStorage {
    fn load_foods(&self) -> (Vec<BasicFood>, Vec<CompositeFood>) {
        let basic = self.read(BASIC_FOODS_FILE).unwrap_or_default();
        let composite = self.read(COMPOSITE_FOODS_FILE).unwrap_or_default();
        (basic, composite)
    }

    fn load_daily_log(&self) -> DailyLog {
        self.read(DAILY_LOG_FILE).unwrap_or_default()
    }

    fn load_profile(&self) -> UserProfile {
        self.read(PROFILE_FILE).unwrap_or_default()
    }

    fn save_basic_foods(&self, foods: &[BasicFood]) -> StorageResult<()> {
        self.write(BASIC_FOODS_FILE, foods)
    }

    fn save_composite_foods(&self, foods: &[CompositeFood]) -> StorageResult<()> {
        self.write(COMPOSITE_FOODS_FILE, foods)
    }

    fn save_daily_log(&self, log: &DailyLog) -> StorageResult<()> {
        self.write(DAILY_LOG_FILE, log)
    }

    fn save_profile(&self, profile: &UserProfile) -> StorageResult<()> {
        self.write(PROFILE_FILE, profile)
    }

    fn describe(&self) -> String {
        self.data_dir.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::models::{ActivityLevel, Gender, LogEntry};

    fn scratch_dir(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        std::env::temp_dir().join(format!("yada-{}-{}-{}", name, std::process::id(), nanos))
    }

    #[test]
    fn test_missing_files_load_empty() {
        let storage = JsonStorage::new(scratch_dir("missing"));
        let (basic, composite) = storage.load_foods();
        assert!(basic.is_empty());
        assert!(composite.is_empty());
        assert_eq!(storage.load_daily_log(), DailyLog::default());
        assert_eq!(storage.load_profile(), UserProfile::default());
        assert_eq!(storage.size_on_disk(), 0);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = scratch_dir("reload");
        let storage = JsonStorage::new(&dir);

        let foods = vec![BasicFood {
            id: "apple".to_string(),
            keywords: vec!["fruit".to_string()],
            calories_per_serving: 100,
        }];
        let composites = vec![CompositeFood {
            id: "bowl".to_string(),
            keywords: Vec::new(),
            ingredients: [("apple".to_string(), 2.0)].into_iter().collect(),
        }];
        let mut log = DailyLog::default();
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        log.push(day, LogEntry::new("apple", 2.0));
        let profile = UserProfile {
            gender: Gender::Female,
            height: 160.0,
            weight: 55.0,
            age: 33,
            activity_level: ActivityLevel::Active,
            ..Default::default()
        };

        storage.save_basic_foods(&foods).unwrap();
        storage.save_composite_foods(&composites).unwrap();
        storage.save_daily_log(&log).unwrap();
        storage.save_profile(&profile).unwrap();

        let (basic, composite) = storage.load_foods();
        assert_eq!(basic, foods);
        assert_eq!(composite, composites);
        assert_eq!(storage.load_daily_log(), log);
        assert_eq!(storage.load_profile(), profile);
        assert!(storage.size_on_disk() > 0);

        let raw = fs::read_to_string(dir.join(BASIC_FOODS_FILE)).unwrap();
        assert!(raw.contains("\"caloriesPerServing\": 100"));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_malformed_file_loads_default() {
        let dir = scratch_dir("malformed");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(DAILY_LOG_FILE), "{ not json").unwrap();

        let storage = JsonStorage::new(&dir);
        assert_eq!(storage.load_daily_log(), DailyLog::default());

        fs::remove_dir_all(&dir).ok();
    }
}

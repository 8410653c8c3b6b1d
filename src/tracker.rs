//! Tracker
//!
//! The single store holding the food catalog, daily log, undo history and
//! profile. Every successful mutation is saved through the storage backend
//! right away; a failed save is logged and the in-memory change stands.
//!
//! The tracker carries no locking of its own. Hosts that share it across
//! threads wrap the whole thing in one mutex.

use chrono::NaiveDate;

use crate::error::{TrackerError, TrackerResult};
use crate::models::{
    BasicFood, BasicFoodCreate, CalorieMethod, CompositeFood, CompositeFoodCreate, DailyLog,
    DayTotal, FoodCatalog, FoodFrequency, FoodKind, FoodRef, LogEntry, ProfileUpdate, UndoRecord,
    UndoStack, UserProfile,
};
use crate::nutrition::{estimate, resolve_calories, EnergyTarget};
use crate::storage::Storage;

pub struct Tracker {
    storage: Box<dyn Storage>,
    catalog: FoodCatalog,
    log: DailyLog,
    undo: UndoStack,
    profile: UserProfile,
    /// Formula forced by configuration, ignoring the profile's choice
    method_override: Option<CalorieMethod>,
}

impl Tracker {
    /// Load all data from the storage backend
    pub fn open(storage: Box<dyn Storage>) -> Self {
        let (basic, composite) = storage.load_foods();
        let log = storage.load_daily_log();
        let profile = storage.load_profile();

        tracing::info!(
            "Loaded {} basic foods, {} composite foods, {} logged days from {}",
            basic.len(),
            composite.len(),
            log.total_logged_days(),
            storage.describe()
        );

        Self {
            storage,
            catalog: FoodCatalog::from_parts(basic, composite),
            log,
            undo: UndoStack::default(),
            profile,
            method_override: None,
        }
    }

    /// Force a BMR formula regardless of the profile setting
    pub fn with_calorie_method(mut self, method: Option<CalorieMethod>) -> Self {
        self.method_override = method;
        self
    }

    // ------------------------------------------------------------------
    // Food catalog
    // ------------------------------------------------------------------

    pub fn catalog(&self) -> &FoodCatalog {
        &self.catalog
    }

    pub fn add_basic_food(&mut self, data: BasicFoodCreate) -> TrackerResult<BasicFood> {
        let food = self.catalog.add_basic(data)?.clone();
        tracing::info!(
            "Added basic food '{}' ({} cal/serving)",
            food.id,
            food.calories_per_serving
        );
        self.save_foods(FoodKind::Basic);
        Ok(food)
    }

    pub fn add_composite_food(
        &mut self,
        data: CompositeFoodCreate,
    ) -> TrackerResult<CompositeFood> {
        let food = self.catalog.add_composite(data)?.clone();
        tracing::info!(
            "Added composite food '{}' with {} ingredients",
            food.id,
            food.ingredients.len()
        );
        self.save_foods(FoodKind::Composite);
        Ok(food)
    }

    pub fn find_food(&self, id: &str) -> Option<FoodRef<'_>> {
        self.catalog.find_by_id(id)
    }

    /// Delete a food of either kind. Returns whether anything was removed.
    pub fn delete_food(&mut self, id: &str) -> bool {
        match self.catalog.delete(id) {
            Some(kind) => {
                tracing::info!("Deleted {} food '{}'", kind.as_str(), id.trim());
                self.save_foods(kind);
                true
            }
            None => false,
        }
    }

    pub fn search_foods(&self, keyword: &str, kind: Option<FoodKind>) -> Vec<FoodRef<'_>> {
        self.catalog.search(keyword, kind)
    }

    pub fn list_foods(&self, kind: Option<FoodKind>) -> Vec<FoodRef<'_>> {
        self.catalog.list(kind)
    }

    pub fn food_exists(&self, id: &str) -> bool {
        self.catalog.exists(id)
    }

    pub fn all_food_ids(&self) -> Vec<String> {
        self.catalog.all_ids()
    }

    pub fn food_count(&self) -> usize {
        self.catalog.total_count()
    }

    /// Calories in `servings` of a food
    pub fn resolve_calories(&self, food_id: &str, servings: f64) -> TrackerResult<u64> {
        validate_servings(servings)?;
        resolve_calories(&self.catalog, food_id, servings)
    }

    // ------------------------------------------------------------------
    // Daily log
    // ------------------------------------------------------------------

    /// Record consumption of a food on a date
    pub fn log_food(
        &mut self,
        date: NaiveDate,
        food_id: &str,
        servings: f64,
    ) -> TrackerResult<LogEntry> {
        let food_id = food_id.trim();
        if food_id.is_empty() {
            return Err(TrackerError::invalid("food ID cannot be empty"));
        }
        validate_servings(servings)?;
        let canonical = self
            .catalog
            .canonical_id(food_id)
            .ok_or_else(|| TrackerError::FoodNotFound(food_id.to_string()))?
            .to_string();

        let entry = LogEntry::new(canonical, servings);
        self.log.push(date, entry.clone());
        self.undo.push(UndoRecord::RemoveEntry {
            date,
            entry: entry.clone(),
        });

        tracing::info!("Logged {} x{} on {}", entry.food_id, servings, date);
        self.save_log();
        Ok(entry)
    }

    /// Copy of the entries for a date
    pub fn entries(&self, date: NaiveDate) -> Vec<LogEntry> {
        self.log.entries(date)
    }

    /// Remove the first entry matching (food, servings). Returns whether one was removed.
    ///
    /// IDs match case-insensitively, so entries stored under another spelling
    /// (older data files, a food deleted and re-added) are still found.
    pub fn remove_entry(&mut self, date: NaiveDate, food_id: &str, servings: f64) -> bool {
        let wanted = LogEntry::new(food_id.trim(), servings);
        let Some(entry) = self.log.remove_first(date, &wanted) else {
            tracing::debug!("No {} x{} on {} to remove", wanted.food_id, servings, date);
            return false;
        };
        tracing::info!("Removed {} x{} from {}", entry.food_id, servings, date);
        self.undo.push(UndoRecord::AddEntry { date, entry });
        self.save_log();
        true
    }

    /// Remove every entry for a date. `false` if there was nothing to clear.
    pub fn clear_day(&mut self, date: NaiveDate) -> bool {
        let snapshot = self.log.take(date);
        if snapshot.is_empty() {
            return false;
        }
        tracing::info!("Cleared {} entries from {}", snapshot.len(), date);
        self.undo.push(UndoRecord::RestoreSnapshot {
            date,
            entries: snapshot,
        });
        self.save_log();
        true
    }

    pub fn daily_total(&self, date: NaiveDate) -> TrackerResult<u64> {
        self.log.daily_total(&self.catalog, date)
    }

    pub fn weekly_totals(&self, start: NaiveDate) -> TrackerResult<Vec<DayTotal>> {
        self.log.weekly_totals(&self.catalog, start)
    }

    pub fn food_frequency(&self, start: NaiveDate, end: NaiveDate) -> Vec<FoodFrequency> {
        self.log.food_frequency(start, end)
    }

    pub fn dates_with_logs(&self) -> Vec<NaiveDate> {
        self.log.dates_with_logs()
    }

    pub fn total_logged_days(&self) -> usize {
        self.log.total_logged_days()
    }

    // ------------------------------------------------------------------
    // Undo
    // ------------------------------------------------------------------

    /// Revert the most recent log mutation. `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<UndoRecord> {
        let record = self.undo.undo(&mut self.log)?;
        tracing::info!("Undo: {}", record.describe());
        self.save_log();
        Some(record)
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn clear_undo_history(&mut self) {
        self.undo.clear();
    }

    // ------------------------------------------------------------------
    // Profile
    // ------------------------------------------------------------------

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn update_profile(&mut self, update: ProfileUpdate) -> TrackerResult<&UserProfile> {
        self.profile.apply(update)?;
        tracing::info!("Profile updated");
        self.save_profile();
        Ok(&self.profile)
    }

    /// The formula in effect: the configured override, else the profile's choice
    pub fn calorie_method(&self) -> CalorieMethod {
        self.method_override.unwrap_or(self.profile.calorie_method)
    }

    /// Daily calorie target for the current profile
    pub fn target_calories(&self) -> TrackerResult<EnergyTarget> {
        if !self.profile.is_set() {
            return Err(TrackerError::invalid("profile has not been set"));
        }
        Ok(estimate(self.calorie_method().formula(), &self.profile))
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    fn save_foods(&self, kind: FoodKind) {
        let result = match kind {
            FoodKind::Basic => self.storage.save_basic_foods(self.catalog.basic_foods()),
            FoodKind::Composite => {
                self.storage.save_composite_foods(self.catalog.composite_foods())
            }
        };
        if let Err(e) = result {
            tracing::error!("Failed to save {} foods: {}", kind.as_str(), e);
        }
    }

    fn save_log(&self) {
        if let Err(e) = self.storage.save_daily_log(&self.log) {
            tracing::error!("Failed to save daily log: {}", e);
        }
    }

    fn save_profile(&self) {
        if let Err(e) = self.storage.save_profile(&self.profile) {
            tracing::error!("Failed to save profile: {}", e);
        }
    }
}

fn validate_servings(servings: f64) -> TrackerResult<()> {
    if !servings.is_finite() || servings <= 0.0 {
        return Err(TrackerError::invalid("servings must be positive"));
    }
    Ok(())
}

//! Daily log model
//!
//! Per-date ordered consumption entries and the aggregate queries over them.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::TrackerResult;
use crate::nutrition::{resolve_calories, sum_calories};
use super::{same_id, FoodCatalog};

/// One consumption record.
///
/// Two entries with the same food ID and serving count are interchangeable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub food_id: String,
    pub servings: f64,
}

impl LogEntry {
    pub fn new(food_id: impl Into<String>, servings: f64) -> Self {
        Self {
            food_id: food_id.into(),
            servings,
        }
    }

    /// Same servings and the same food, with IDs compared the way the catalog does
    pub fn matches(&self, other: &LogEntry) -> bool {
        self.servings == other.servings && same_id(&self.food_id, &other.food_id)
    }
}

/// Calories for a single date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayTotal {
    pub date: String, // ISO date: "2024-01-01"
    pub calories: u64,
}

/// Servings of one food summed over a date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodFrequency {
    pub food_id: String,
    pub servings: f64,
}

/// Consumption entries keyed by date.
///
/// Dates appear on their first entry and are never dropped; an emptied
/// date counts as "no log" for the queries below.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailyLog {
    entries: BTreeMap<NaiveDate, Vec<LogEntry>>,
}

impl DailyLog {
    /// Copy of the entries for a date (empty if none)
    pub fn entries(&self, date: NaiveDate) -> Vec<LogEntry> {
        self.entries.get(&date).cloned().unwrap_or_default()
    }

    /// Append an entry, creating the date on first use
    pub fn push(&mut self, date: NaiveDate, entry: LogEntry) {
        self.entries.entry(date).or_default().push(entry);
    }

    /// Remove the first entry matching `entry` and return it as stored
    pub fn remove_first(&mut self, date: NaiveDate, entry: &LogEntry) -> Option<LogEntry> {
        let list = self.entries.get_mut(&date)?;
        let pos = list.iter().position(|e| e.matches(entry))?;
        Some(list.remove(pos))
    }

    /// Remove the most recently appended entry matching `entry`
    pub fn remove_last(&mut self, date: NaiveDate, entry: &LogEntry) -> Option<LogEntry> {
        let list = self.entries.get_mut(&date)?;
        let pos = list.iter().rposition(|e| e.matches(entry))?;
        Some(list.remove(pos))
    }

    /// Empty a date and return what it held. The date itself stays present.
    pub fn take(&mut self, date: NaiveDate) -> Vec<LogEntry> {
        self.entries
            .get_mut(&date)
            .map(std::mem::take)
            .unwrap_or_default()
    }

    /// Replace a date's entries wholesale
    pub fn replace(&mut self, date: NaiveDate, entries: Vec<LogEntry>) {
        self.entries.insert(date, entries);
    }

    /// Total calories for one date
    pub fn daily_total(&self, catalog: &FoodCatalog, date: NaiveDate) -> TrackerResult<u64> {
        let Some(list) = self.entries.get(&date) else {
            return Ok(0);
        };
        let calories = list
            .iter()
            .map(|entry| resolve_calories(catalog, &entry.food_id, entry.servings))
            .collect::<TrackerResult<Vec<u64>>>()?;
        sum_calories(calories)
    }

    /// Seven consecutive daily totals starting at `start`
    pub fn weekly_totals(
        &self,
        catalog: &FoodCatalog,
        start: NaiveDate,
    ) -> TrackerResult<Vec<DayTotal>> {
        start
            .iter_days()
            .take(7)
            .map(|date| {
                Ok(DayTotal {
                    date: date.to_string(),
                    calories: self.daily_total(catalog, date)?,
                })
            })
            .collect()
    }

    /// Servings per food over an inclusive date range, most eaten first.
    /// Ties keep the order in which foods were first seen.
    pub fn food_frequency(&self, start: NaiveDate, end: NaiveDate) -> Vec<FoodFrequency> {
        let mut totals: Vec<FoodFrequency> = Vec::new();
        if start > end {
            return totals;
        }

        for (_, list) in self.entries.range(start..=end) {
            for entry in list {
                match totals.iter_mut().find(|f| f.food_id == entry.food_id) {
                    Some(total) => total.servings += entry.servings,
                    None => totals.push(FoodFrequency {
                        food_id: entry.food_id.clone(),
                        servings: entry.servings,
                    }),
                }
            }
        }

        // sort_by is stable
        totals.sort_by(|a, b| b.servings.total_cmp(&a.servings));
        totals
    }

    /// Dates with at least one entry, ascending
    pub fn dates_with_logs(&self) -> Vec<NaiveDate> {
        self.entries
            .iter()
            .filter(|(_, list)| !list.is_empty())
            .map(|(date, _)| *date)
            .collect()
    }

    pub fn total_logged_days(&self) -> usize {
        self.entries.values().filter(|list| !list.is_empty()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrackerError;
    use crate::models::{BasicFoodCreate, CompositeFoodCreate};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn catalog() -> FoodCatalog {
        let mut catalog = FoodCatalog::default();
        for (id, calories) in [("apple", 100), ("bread", 80), ("butter", 35)] {
            catalog
                .add_basic(BasicFoodCreate {
                    id: id.to_string(),
                    keywords: Vec::new(),
                    calories,
                })
                .unwrap();
        }
        catalog
            .add_composite(CompositeFoodCreate {
                id: "toast".to_string(),
                keywords: Vec::new(),
                ingredients: [("bread".to_string(), 1.0), ("butter".to_string(), 0.5)]
                    .into_iter()
                    .collect(),
            })
            .unwrap();
        catalog
    }

    #[test]
    fn test_entries_returns_copy() {
        let mut log = DailyLog::default();
        let day = date("2024-01-01");
        log.push(day, LogEntry::new("apple", 1.0));

        let mut copy = log.entries(day);
        copy.clear();
        assert_eq!(log.entries(day).len(), 1);
        assert!(log.entries(date("2024-01-02")).is_empty());
    }

    #[test]
    fn test_remove_first_matches_value() {
        let mut log = DailyLog::default();
        let day = date("2024-01-01");
        log.push(day, LogEntry::new("apple", 1.0));
        log.push(day, LogEntry::new("bread", 2.0));
        log.push(day, LogEntry::new("apple", 1.0));

        assert_eq!(
            log.remove_first(day, &LogEntry::new("apple", 1.0)),
            Some(LogEntry::new("apple", 1.0))
        );
        assert_eq!(
            log.entries(day),
            vec![LogEntry::new("bread", 2.0), LogEntry::new("apple", 1.0)]
        );
        assert!(log.remove_first(day, &LogEntry::new("apple", 2.0)).is_none());
        assert!(log.remove_first(date("2030-01-01"), &LogEntry::new("apple", 1.0)).is_none());
    }

    #[test]
    fn test_remove_ignores_id_case_and_returns_stored_spelling() {
        let mut log = DailyLog::default();
        let day = date("2024-01-01");
        log.push(day, LogEntry::new("APPLE", 1.0));
        log.push(day, LogEntry::new("Apple", 1.0));

        assert_eq!(
            log.remove_first(day, &LogEntry::new(" apple ", 1.0)),
            Some(LogEntry::new("APPLE", 1.0))
        );
        assert_eq!(
            log.remove_last(day, &LogEntry::new("apple", 1.0)),
            Some(LogEntry::new("Apple", 1.0))
        );
        assert!(log.entries(day).is_empty());
    }

    #[test]
    fn test_daily_total_out_of_range() {
        let catalog = catalog();
        let mut log = DailyLog::default();
        let day = date("2024-01-01");
        log.push(day, LogEntry::new("apple", 1e17));
        log.push(day, LogEntry::new("apple", 1e17));

        assert_eq!(
            log.daily_total(&catalog, day).unwrap_err(),
            TrackerError::invalid("calorie total out of range")
        );
    }

    #[test]
    fn test_remove_last_takes_latest_match() {
        let mut log = DailyLog::default();
        let day = date("2024-01-01");
        log.push(day, LogEntry::new("apple", 1.0));
        log.push(day, LogEntry::new("bread", 2.0));
        log.push(day, LogEntry::new("apple", 1.0));

        assert!(log.remove_last(day, &LogEntry::new("apple", 1.0)).is_some());
        assert_eq!(
            log.entries(day),
            vec![LogEntry::new("apple", 1.0), LogEntry::new("bread", 2.0)]
        );
    }

    #[test]
    fn test_take_leaves_empty_date() {
        let mut log = DailyLog::default();
        let day = date("2024-01-01");
        log.push(day, LogEntry::new("apple", 1.0));

        assert_eq!(log.take(day), vec![LogEntry::new("apple", 1.0)]);
        assert!(log.take(day).is_empty());
        assert_eq!(log.total_logged_days(), 0);
        assert!(log.dates_with_logs().is_empty());
    }

    #[test]
    fn test_daily_total_resolves_composites() {
        let catalog = catalog();
        let mut log = DailyLog::default();
        let day = date("2024-01-01");
        log.push(day, LogEntry::new("apple", 2.0));
        log.push(day, LogEntry::new("toast", 2.0));

        // apple 200 + toast (bread 160 + butter 35)
        assert_eq!(log.daily_total(&catalog, day).unwrap(), 395);
        assert_eq!(log.daily_total(&catalog, date("2024-01-02")).unwrap(), 0);
    }

    #[test]
    fn test_daily_total_fails_on_deleted_food() {
        let mut catalog = catalog();
        let mut log = DailyLog::default();
        let day = date("2024-01-01");
        log.push(day, LogEntry::new("apple", 1.0));
        catalog.delete("apple");

        assert_eq!(
            log.daily_total(&catalog, day).unwrap_err(),
            TrackerError::FoodNotFound("apple".to_string())
        );
    }

    #[test]
    fn test_weekly_totals_has_seven_ordered_days() {
        let catalog = catalog();
        let mut log = DailyLog::default();
        log.push(date("2024-02-27"), LogEntry::new("apple", 1.0));
        log.push(date("2024-03-01"), LogEntry::new("bread", 1.0));

        let week = log.weekly_totals(&catalog, date("2024-02-27")).unwrap();
        let dates: Vec<&str> = week.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(
            dates,
            vec![
                "2024-02-27", "2024-02-28", "2024-02-29", "2024-03-01",
                "2024-03-02", "2024-03-03", "2024-03-04",
            ]
        );
        assert_eq!(week[0].calories, 100);
        assert_eq!(week[3].calories, 80);
        assert_eq!(week.iter().map(|d| d.calories).sum::<u64>(), 180);
    }

    #[test]
    fn test_food_frequency_sorted_and_stable() {
        let mut log = DailyLog::default();
        log.push(date("2024-01-01"), LogEntry::new("bread", 1.0));
        log.push(date("2024-01-01"), LogEntry::new("apple", 1.0));
        log.push(date("2024-01-02"), LogEntry::new("toast", 3.0));
        log.push(date("2024-01-03"), LogEntry::new("apple", 0.5));
        log.push(date("2024-01-05"), LogEntry::new("apple", 10.0));

        let freq = log.food_frequency(date("2024-01-01"), date("2024-01-04"));
        assert_eq!(
            freq,
            vec![
                FoodFrequency { food_id: "toast".to_string(), servings: 3.0 },
                FoodFrequency { food_id: "apple".to_string(), servings: 1.5 },
                FoodFrequency { food_id: "bread".to_string(), servings: 1.0 },
            ]
        );

        let tie = log.food_frequency(date("2024-01-01"), date("2024-01-01"));
        assert_eq!(tie[0].food_id, "bread");
        assert_eq!(tie[1].food_id, "apple");
    }

    #[test]
    fn test_dates_with_logs_sorted() {
        let mut log = DailyLog::default();
        log.push(date("2024-03-01"), LogEntry::new("apple", 1.0));
        log.push(date("2024-01-01"), LogEntry::new("apple", 1.0));
        log.replace(date("2024-02-01"), Vec::new());

        assert_eq!(log.dates_with_logs(), vec![date("2024-01-01"), date("2024-03-01")]);
        assert_eq!(log.total_logged_days(), 2);
    }

    #[test]
    fn test_json_is_date_keyed() {
        let mut log = DailyLog::default();
        log.push(date("2024-01-01"), LogEntry::new("apple", 2.0));

        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json["2024-01-01"][0]["foodId"], "apple");
        assert_eq!(json["2024-01-01"][0]["servings"], 2.0);

        let back: DailyLog = serde_json::from_value(json).unwrap();
        assert_eq!(back, log);
    }
}

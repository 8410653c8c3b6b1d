//! Daily Log Tools
//!
//! Tools for logging consumption, viewing days, aggregates and undo.

use serde::Serialize;

use crate::models::{DayTotal, FoodFrequency, UndoRecord};
use crate::nutrition::sum_calories;
use crate::tracker::Tracker;
use super::parse_date;

/// Response for log_food
#[derive(Debug, Serialize)]
pub struct LogFoodResponse {
    pub date: String,
    pub food_id: String,
    pub servings: f64,
    /// Absent when the food no longer resolves; the entry is logged regardless
    pub calories: Option<u64>,
    pub calorie_error: Option<String>,
    /// Day total after logging; absent if another entry no longer resolves
    pub day_total: Option<u64>,
}

/// Response for remove_log_entry
#[derive(Debug, Serialize)]
pub struct RemoveLogEntryResponse {
    pub success: bool,
    pub date: String,
    pub remaining_entries: usize,
}

/// Response for clear_day
#[derive(Debug, Serialize)]
pub struct ClearDayResponse {
    pub cleared: bool,
    pub date: String,
}

/// One logged entry with its calories
#[derive(Debug, Serialize)]
pub struct EntryView {
    pub food_id: String,
    pub servings: f64,
    pub calories: Option<u64>,
}

/// Response for view_day
#[derive(Debug, Serialize)]
pub struct DayView {
    pub date: String,
    pub entries: Vec<EntryView>,
    pub total_calories: Option<u64>,
    /// Set when the total cannot be computed
    pub error: Option<String>,
}

/// Response for weekly_calories
#[derive(Debug, Serialize)]
pub struct WeeklyCaloriesResponse {
    pub start_date: String,
    pub days: Vec<DayTotal>,
    pub total_calories: u64,
    pub average_calories: f64,
}

/// Response for food_frequency
#[derive(Debug, Serialize)]
pub struct FoodFrequencyResponse {
    pub start_date: String,
    pub end_date: String,
    pub foods: Vec<FoodFrequency>,
}

/// Response for list_logged_dates
#[derive(Debug, Serialize)]
pub struct LoggedDatesResponse {
    pub dates: Vec<String>,
    pub total: usize,
}

/// Response for undo
#[derive(Debug, Serialize)]
pub struct UndoResponse {
    pub undone: bool,
    pub description: Option<String>,
    pub date: Option<String>,
    pub remaining: usize,
}

/// Log servings of a food on a date
pub fn log_food(
    tracker: &mut Tracker,
    date: &str,
    food_id: &str,
    servings: f64,
) -> Result<LogFoodResponse, String> {
    let day = parse_date(date)?;
    let entry = tracker
        .log_food(day, food_id, servings)
        .map_err(|e| e.to_string())?;
    let resolved = tracker.resolve_calories(&entry.food_id, entry.servings);
    let (calories, calorie_error) = match resolved {
        Ok(calories) => (Some(calories), None),
        Err(e) => (None, Some(e.to_string())),
    };

    Ok(LogFoodResponse {
        date: day.to_string(),
        food_id: entry.food_id,
        servings: entry.servings,
        calories,
        calorie_error,
        day_total: tracker.daily_total(day).ok(),
    })
}

/// Remove the first entry matching food and servings
pub fn remove_log_entry(
    tracker: &mut Tracker,
    date: &str,
    food_id: &str,
    servings: f64,
) -> Result<RemoveLogEntryResponse, String> {
    let day = parse_date(date)?;
    if !tracker.remove_entry(day, food_id, servings) {
        return Err(format!(
            "No entry of {} x{} logged on {}",
            food_id.trim(),
            servings,
            day
        ));
    }
    Ok(RemoveLogEntryResponse {
        success: true,
        date: day.to_string(),
        remaining_entries: tracker.entries(day).len(),
    })
}

/// Remove all entries for a date
pub fn clear_day(tracker: &mut Tracker, date: &str) -> Result<ClearDayResponse, String> {
    let day = parse_date(date)?;
    Ok(ClearDayResponse {
        cleared: tracker.clear_day(day),
        date: day.to_string(),
    })
}

/// Entries and total for a date
pub fn view_day(tracker: &Tracker, date: &str) -> Result<DayView, String> {
    let day = parse_date(date)?;
    let entries = tracker
        .entries(day)
        .into_iter()
        .map(|entry| EntryView {
            calories: tracker.resolve_calories(&entry.food_id, entry.servings).ok(),
            food_id: entry.food_id,
            servings: entry.servings,
        })
        .collect();
    let (total_calories, error) = match tracker.daily_total(day) {
        Ok(total) => (Some(total), None),
        Err(e) => (None, Some(e.to_string())),
    };

    Ok(DayView {
        date: day.to_string(),
        entries,
        total_calories,
        error,
    })
}

/// Seven daily totals starting at a date
pub fn weekly_calories(
    tracker: &Tracker,
    start_date: &str,
) -> Result<WeeklyCaloriesResponse, String> {
    let start = parse_date(start_date)?;
    let days = tracker.weekly_totals(start).map_err(|e| e.to_string())?;
    let total_calories =
        sum_calories(days.iter().map(|d| d.calories)).map_err(|e| e.to_string())?;
    let average_calories = total_calories as f64 / days.len().max(1) as f64;

    Ok(WeeklyCaloriesResponse {
        start_date: start.to_string(),
        days,
        total_calories,
        average_calories,
    })
}

/// Servings per food over an inclusive date range, most eaten first
pub fn food_frequency(
    tracker: &Tracker,
    start_date: &str,
    end_date: &str,
) -> Result<FoodFrequencyResponse, String> {
    let start = parse_date(start_date)?;
    let end = parse_date(end_date)?;
    if start > end {
        return Err(format!("start_date {} is after end_date {}", start, end));
    }
    Ok(FoodFrequencyResponse {
        start_date: start.to_string(),
        end_date: end.to_string(),
        foods: tracker.food_frequency(start, end),
    })
}

/// Dates that have at least one entry
pub fn list_logged_dates(tracker: &Tracker) -> LoggedDatesResponse {
    let dates: Vec<String> = tracker
        .dates_with_logs()
        .iter()
        .map(|d| d.to_string())
        .collect();
    let total = dates.len();
    LoggedDatesResponse { dates, total }
}

/// Revert the most recent log change
pub fn undo(tracker: &mut Tracker) -> UndoResponse {
    let record: Option<UndoRecord> = tracker.undo();
    UndoResponse {
        undone: record.is_some(),
        description: record.as_ref().map(UndoRecord::describe),
        date: record.as_ref().map(|r| r.date().to_string()),
        remaining: tracker.undo_depth(),
    }
}

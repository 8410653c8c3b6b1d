//! Data models
//!
//! Foods, the catalog that owns them, the daily log, undo records and the
//! user profile.

mod catalog;
mod daily_log;
mod food;
mod profile;
mod undo;

pub use catalog::FoodCatalog;
pub use daily_log::{DailyLog, DayTotal, FoodFrequency, LogEntry};
pub use food::{
    same_id, BasicFood, BasicFoodCreate, CompositeFood, CompositeFoodCreate, FoodKind, FoodRef,
};
pub use profile::{ActivityLevel, CalorieMethod, Gender, ProfileUpdate, UserProfile};
pub use undo::{UndoRecord, UndoStack};

//! Undo records
//!
//! Each log mutation leaves behind one record describing how to invert it.
//! Records are plain data so they can be inspected and serialized.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{DailyLog, LogEntry};

/// The inverse of exactly one daily-log mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UndoRecord {
    /// Inverts a logged entry
    RemoveEntry { date: NaiveDate, entry: LogEntry },
    /// Inverts a removed entry. Re-adds at the end, not the original position.
    AddEntry { date: NaiveDate, entry: LogEntry },
    /// Inverts a cleared date
    RestoreSnapshot { date: NaiveDate, entries: Vec<LogEntry> },
}

impl UndoRecord {
    pub fn date(&self) -> NaiveDate {
        match self {
            UndoRecord::RemoveEntry { date, .. }
            | UndoRecord::AddEntry { date, .. }
            | UndoRecord::RestoreSnapshot { date, .. } => *date,
        }
    }

    /// Apply the inverse operation to the log
    pub fn apply(&self, log: &mut DailyLog) {
        match self {
            UndoRecord::RemoveEntry { date, entry } => {
                if log.remove_last(*date, entry).is_none() {
                    tracing::warn!(
                        "Undo found no {} x{} on {} to remove",
                        entry.food_id,
                        entry.servings,
                        date
                    );
                }
            }
            UndoRecord::AddEntry { date, entry } => log.push(*date, entry.clone()),
            UndoRecord::RestoreSnapshot { date, entries } => log.replace(*date, entries.clone()),
        }
    }

    /// Short human-readable summary of what applying this record does
    pub fn describe(&self) -> String {
        match self {
            UndoRecord::RemoveEntry { date, entry } => {
                format!("removed {} x{} from {}", entry.food_id, entry.servings, date)
            }
            UndoRecord::AddEntry { date, entry } => {
                format!("restored {} x{} on {}", entry.food_id, entry.servings, date)
            }
            UndoRecord::RestoreSnapshot { date, entries } => {
                format!("restored {} entries on {}", entries.len(), date)
            }
        }
    }
}

/// LIFO stack of undo records. Lives only for the process lifetime.
#[derive(Debug, Clone, Default)]
pub struct UndoStack {
    records: Vec<UndoRecord>,
}

impl UndoStack {
    pub fn push(&mut self, record: UndoRecord) {
        self.records.push(record);
    }

    /// Pop the most recent record and apply it. `None` when there is nothing to undo.
    pub fn undo(&mut self, log: &mut DailyLog) -> Option<UndoRecord> {
        let record = self.records.pop()?;
        record.apply(log);
        Some(record)
    }

    pub fn peek(&self) -> Option<&UndoRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

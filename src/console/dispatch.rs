//! Console command dispatch
//!
//! Runs a parsed command against the tracker and formats the reply.

use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::{BasicFoodCreate, CompositeFoodCreate, FoodKind, FoodRef};
use crate::nutrition::{round_half_up, sum_calories};
use crate::tracker::Tracker;
use super::command::{Command, HELP};

/// Execute a command and return the text to show. `Quit` is handled by the
/// caller and yields an empty reply here.
pub fn execute(tracker: &mut Tracker, command: Command) -> String {
    match command {
        Command::AddBasic { id, calories, keywords } => {
            match tracker.add_basic_food(BasicFoodCreate { id, keywords, calories }) {
                Ok(food) => format!(
                    "Added basic food '{}' ({} cal/serving).",
                    food.id, food.calories_per_serving
                ),
                Err(e) => format!("Error: {}", e),
            }
        }
        Command::AddComposite { id, ingredients, keywords } => {
            match tracker.add_composite_food(CompositeFoodCreate { id, keywords, ingredients }) {
                Ok(food) => match tracker.resolve_calories(&food.id, 1.0) {
                    Ok(calories) => {
                        format!("Added composite food '{}' ({} cal/serving).", food.id, calories)
                    }
                    Err(e) => format!(
                        "Added composite food '{}' (calories unavailable: {}).",
                        food.id, e
                    ),
                },
                Err(e) => format!("Error: {}", e),
            }
        }
        Command::Delete { id } => {
            if tracker.delete_food(&id) {
                format!("Deleted '{}'.", id.trim())
            } else {
                format!("No food with ID '{}'.", id.trim())
            }
        }
        Command::Search { keyword, kind } => {
            format_foods(tracker, &tracker.search_foods(&keyword, kind), "No foods match.")
        }
        Command::List { kind } => format_foods(tracker, &tracker.list_foods(kind), "No foods yet."),
        Command::Calories { id, servings } => match tracker.resolve_calories(&id, servings) {
            Ok(calories) => format!("{} x{} = {} cal", id.trim(), servings, calories),
            Err(e) => format!("Error: {}", e),
        },
        Command::Log { date, id, servings } => match tracker.log_food(date, &id, servings) {
            Ok(entry) => format!("Logged {} x{} on {}.", entry.food_id, entry.servings, date),
            Err(e) => format!("Error: {}", e),
        },
        Command::Remove { date, id, servings } => {
            if tracker.remove_entry(date, &id, servings) {
                format!("Removed {} x{} from {}.", id.trim(), servings, date)
            } else {
                format!("No entry of {} x{} on {}.", id.trim(), servings, date)
            }
        }
        Command::Clear { date } => {
            if tracker.clear_day(date) {
                format!("Cleared {}.", date)
            } else {
                format!("Nothing logged on {}.", date)
            }
        }
        Command::View { date } => format_day(tracker, date),
        Command::Total { date } => match tracker.daily_total(date) {
            Ok(total) => format!("{}: {} cal", date, total),
            Err(e) => format!("Error: {}", e),
        },
        Command::Week { start } => match tracker.weekly_totals(start) {
            Ok(days) => {
                let mut out = String::new();
                for day in &days {
                    let _ = writeln!(out, "  {}  {:>6} cal", day.date, day.calories);
                }
                match sum_calories(days.iter().map(|d| d.calories)) {
                    Ok(sum) => {
                        let _ = write!(out, "  total       {:>6} cal", sum);
                    }
                    Err(e) => {
                        let _ = write!(out, "  total       Error: {}", e);
                    }
                }
                out
            }
            Err(e) => format!("Error: {}", e),
        },
        Command::Frequency { start, end } => {
            let foods = tracker.food_frequency(start, end);
            if foods.is_empty() {
                return format!("Nothing logged between {} and {}.", start, end);
            }
            foods
                .iter()
                .map(|f| format!("  {:<24} {} servings", f.food_id, f.servings))
                .collect::<Vec<_>>()
                .join("\n")
        }
        Command::Days => {
            let dates = tracker.dates_with_logs();
            if dates.is_empty() {
                return "No days logged.".to_string();
            }
            let list: Vec<String> = dates.iter().map(|d| d.to_string()).collect();
            format!("{} days: {}", list.len(), list.join(", "))
        }
        Command::Undo => match tracker.undo() {
            Some(record) => format!("Undone: {}.", record.describe()),
            None => "Nothing to undo.".to_string(),
        },
        Command::Profile(update) => match tracker.update_profile(update) {
            Ok(_) => "Profile updated.".to_string(),
            Err(e) => format!("Error: {}", e),
        },
        Command::ShowProfile => {
            let p = tracker.profile();
            if !p.is_set() {
                return "No profile set. Use 'profile' to set one.".to_string();
            }
            format!(
                "{}, {} cm, {} kg, {} years, {} activity, {} (using {})",
                p.gender.as_str(),
                p.height,
                p.weight,
                p.age,
                p.activity_level.as_str(),
                p.calorie_method.as_str(),
                tracker.calorie_method().as_str()
            )
        }
        Command::Target => match tracker.target_calories() {
            Ok(target) => format!(
                "BMR {:.1} x {} = {} cal/day ({})",
                target.bmr,
                target.activity_multiplier,
                round_half_up(target.target_calories),
                target.method.as_str()
            ),
            Err(e) => format!("Error: {}", e),
        },
        Command::Help => HELP.to_string(),
        Command::Quit => String::new(),
    }
}

fn format_foods(tracker: &Tracker, foods: &[FoodRef<'_>], empty: &str) -> String {
    if foods.is_empty() {
        return empty.to_string();
    }
    foods
        .iter()
        .map(|food| {
            let calories = tracker
                .resolve_calories(food.id(), 1.0)
                .map(|c| format!("{} cal", c))
                .unwrap_or_else(|_| "? cal".to_string());
            let kind = match food.kind() {
                FoodKind::Basic => "B",
                FoodKind::Composite => "C",
            };
            let mut line = format!("  [{}] {:<24} {:>8}", kind, food.id(), calories);
            if !food.keywords().is_empty() {
                let _ = write!(line, "  ({})", food.keywords().join(", "));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_day(tracker: &Tracker, date: NaiveDate) -> String {
    let entries = tracker.entries(date);
    if entries.is_empty() {
        return format!("Nothing logged on {}.", date);
    }

    let mut out = format!("{}:\n", date);
    for entry in &entries {
        let calories = tracker
            .resolve_calories(&entry.food_id, entry.servings)
            .map(|c| c.to_string())
            .unwrap_or_else(|_| "?".to_string());
        let _ = writeln!(out, "  {:<24} x{:<6} {:>6} cal", entry.food_id, entry.servings, calories);
    }
    match tracker.daily_total(date) {
        Ok(total) => {
            let _ = write!(out, "  total {} cal", total);
        }
        Err(e) => {
            let _ = write!(out, "  total unavailable: {}", e);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::command::parse;
    use crate::storage::MemoryStorage;

    fn run(tracker: &mut Tracker, line: &str) -> String {
        let command = parse(line).unwrap().unwrap();
        execute(tracker, command)
    }

    fn tracker() -> Tracker {
        Tracker::open(Box::new(MemoryStorage::new()))
    }

    #[test]
    fn test_fruit_bowl_session() {
        let mut t = tracker();
        assert_eq!(
            run(&mut t, "add-basic apple 100 fruit"),
            "Added basic food 'apple' (100 cal/serving)."
        );
        assert_eq!(
            run(&mut t, r#"add-composite "fruit bowl" apple=2"#),
            "Added composite food 'fruit bowl' (200 cal/serving)."
        );
        assert_eq!(
            run(&mut t, r#"log 2024-01-01 "Fruit Bowl" 1.5"#),
            "Logged fruit bowl x1.5 on 2024-01-01."
        );
        assert_eq!(run(&mut t, "total 2024-01-01"), "2024-01-01: 300 cal");

        let view = run(&mut t, "view 2024-01-01");
        assert!(view.contains("fruit bowl"));
        assert!(view.ends_with("total 300 cal"));
    }

    #[test]
    fn test_core_errors_are_reported() {
        let mut t = tracker();
        assert!(run(&mut t, "add-basic apple -5").starts_with("Error: Invalid input"));
        assert!(run(&mut t, "log 2024-01-01 apple 1").contains("not found"));
        assert!(run(&mut t, "add-composite pie crust=1").contains("crust"));
        assert!(run(&mut t, "target").starts_with("Error"));
    }

    #[test]
    fn test_undo_and_clear() {
        let mut t = tracker();
        run(&mut t, "add-basic toast 80");
        run(&mut t, "log 2024-01-01 toast 1");
        run(&mut t, "log 2024-01-01 toast 2");
        assert_eq!(run(&mut t, "clear 2024-01-01"), "Cleared 2024-01-01.");
        assert_eq!(run(&mut t, "clear 2024-01-01"), "Nothing logged on 2024-01-01.");
        assert!(run(&mut t, "undo").starts_with("Undone: restored 2 entries"));
        assert_eq!(run(&mut t, "total 2024-01-01"), "2024-01-01: 240 cal");
        assert_eq!(run(&mut t, "days"), "1 days: 2024-01-01");
    }

    #[test]
    fn test_week_and_frequency() {
        let mut t = tracker();
        run(&mut t, "add-basic toast 80");
        run(&mut t, "log 2024-01-03 toast 2");
        let week = run(&mut t, "week 2024-01-01");
        assert_eq!(week.lines().count(), 8);
        assert!(week.contains("2024-01-03     160 cal"));
        assert!(run(&mut t, "frequency 2024-01-01 2024-01-07").contains("toast"));
        assert!(run(&mut t, "frequency 2024-02-01 2024-02-07").starts_with("Nothing logged"));
    }

    #[test]
    fn test_week_total_out_of_range() {
        let mut t = tracker();
        run(&mut t, "add-basic apple 100");
        run(&mut t, "log 2024-01-01 apple 1e17");
        run(&mut t, "log 2024-01-02 apple 1e17");
        let week = run(&mut t, "week 2024-01-01");
        assert!(week.ends_with("total       Error: Invalid input: calorie total out of range"));
    }

    #[test]
    fn test_profile_and_target() {
        let mut t = tracker();
        assert!(run(&mut t, "show-profile").starts_with("No profile"));
        assert_eq!(run(&mut t, "profile male 175 70 25 moderate"), "Profile updated.");
        assert_eq!(run(&mut t, "target"), "BMR 1724.1 x 1.55 = 2672 cal/day (HarrisBenedict)");
        assert!(run(&mut t, "show-profile").contains("moderate activity"));
    }

    #[test]
    fn test_list_and_search() {
        let mut t = tracker();
        assert_eq!(run(&mut t, "list"), "No foods yet.");
        run(&mut t, "add-basic apple 95 fruit");
        run(&mut t, "add-basic bread 70");
        let listed = run(&mut t, "list basic");
        assert_eq!(listed.lines().count(), 2);
        assert!(listed.contains("(fruit)"));
        assert_eq!(run(&mut t, "search FRUIT").lines().count(), 1);
        assert_eq!(run(&mut t, "search zzz"), "No foods match.");
    }
}

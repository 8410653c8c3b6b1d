//! Console command parsing
//!
//! Turns one input line into a typed `Command`. All free-text validation
//! (dates, numbers, ingredient lists) happens here; the tracker only ever
//! sees well-formed values.

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};
use thiserror::Error;

use crate::models::{ActivityLevel, CalorieMethod, FoodKind, Gender, ProfileUpdate};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Unknown command '{0}'. Type 'help' for a list of commands.")]
    UnknownCommand(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid {what}: '{value}'")]
    InvalidNumber { what: &'static str, value: String },

    #[error("Invalid date '{0}': expected YYYY-MM-DD or 'today'")]
    InvalidDate(String),

    #[error("Invalid ingredient '{0}': expected id=servings")]
    InvalidIngredient(String),

    #[error("Ingredient '{0}' is listed more than once")]
    RepeatedIngredient(String),

    #[error("Unknown food kind '{0}': use basic, composite or all")]
    InvalidKind(String),

    #[error("Unknown calorie method '{0}': use harris-benedict or mifflin-st-jeor")]
    InvalidMethod(String),

    #[error("Unterminated quote")]
    UnterminatedQuote,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddBasic { id: String, calories: i64, keywords: Vec<String> },
    AddComposite { id: String, ingredients: BTreeMap<String, f64>, keywords: Vec<String> },
    Delete { id: String },
    Search { keyword: String, kind: Option<FoodKind> },
    List { kind: Option<FoodKind> },
    Calories { id: String, servings: f64 },
    Log { date: NaiveDate, id: String, servings: f64 },
    Remove { date: NaiveDate, id: String, servings: f64 },
    Clear { date: NaiveDate },
    View { date: NaiveDate },
    Total { date: NaiveDate },
    Week { start: NaiveDate },
    Frequency { start: NaiveDate, end: NaiveDate },
    Days,
    Undo,
    Profile(ProfileUpdate),
    ShowProfile,
    Target,
    Help,
    Quit,
}

pub const HELP: &str = "\
Foods:
  add-basic <id> <calories> [keyword...]
  add-composite <id> <ingredient=servings,...> [keyword...]
  delete <id>
  search <keyword> [basic|composite|all]
  list [basic|composite|all]
  calories <id> [servings]
Log (dates are YYYY-MM-DD or 'today'):
  log <date> <id> [servings]
  remove <date> <id> <servings>
  clear <date>
  view <date>
  total <date>
  week <start-date>
  frequency <start-date> <end-date>
  days
  undo
Profile:
  profile <male|female> <height-cm> <weight-kg> <age> <sedentary|light|moderate|active> [method]
  show-profile
  target
Other:
  help
  quit

Wrap IDs containing spaces in double quotes.";

/// Split a line on whitespace, keeping double-quoted runs together
pub fn tokenize(line: &str) -> Result<Vec<String>, ParseError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    tokens.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }

    if in_quotes {
        return Err(ParseError::UnterminatedQuote);
    }
    if has_token {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Parse a line. `Ok(None)` for a blank line.
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let tokens = tokenize(line)?;
    let Some((name, args)) = tokens.split_first() else {
        return Ok(None);
    };

    let command = match name.to_lowercase().as_str() {
        "add-basic" => {
            const USAGE: &str = "add-basic <id> <calories> [keyword...]";
            let [id, calories, keywords @ ..] = args else {
                return Err(ParseError::Usage(USAGE));
            };
            Command::AddBasic {
                id: id.clone(),
                calories: parse_int("calories", calories)?,
                keywords: keywords.to_vec(),
            }
        }
        "add-composite" => {
            const USAGE: &str = "add-composite <id> <ingredient=servings,...> [keyword...]";
            let [id, ingredients, keywords @ ..] = args else {
                return Err(ParseError::Usage(USAGE));
            };
            Command::AddComposite {
                id: id.clone(),
                ingredients: parse_ingredients(ingredients)?,
                keywords: keywords.to_vec(),
            }
        }
        "delete" => match args {
            [id] => Command::Delete { id: id.clone() },
            _ => return Err(ParseError::Usage("delete <id>")),
        },
        "search" => match args {
            [keyword] => Command::Search { keyword: keyword.clone(), kind: None },
            [keyword, kind] => Command::Search {
                keyword: keyword.clone(),
                kind: parse_kind(kind)?,
            },
            _ => return Err(ParseError::Usage("search <keyword> [basic|composite|all]")),
        },
        "list" => match args {
            [] => Command::List { kind: None },
            [kind] => Command::List { kind: parse_kind(kind)? },
            _ => return Err(ParseError::Usage("list [basic|composite|all]")),
        },
        "calories" => match args {
            [id] => Command::Calories { id: id.clone(), servings: 1.0 },
            [id, servings] => Command::Calories {
                id: id.clone(),
                servings: parse_float("servings", servings)?,
            },
            _ => return Err(ParseError::Usage("calories <id> [servings]")),
        },
        "log" => match args {
            [date, id] => Command::Log { date: parse_date(date)?, id: id.clone(), servings: 1.0 },
            [date, id, servings] => Command::Log {
                date: parse_date(date)?,
                id: id.clone(),
                servings: parse_float("servings", servings)?,
            },
            _ => return Err(ParseError::Usage("log <date> <id> [servings]")),
        },
        "remove" => match args {
            [date, id, servings] => Command::Remove {
                date: parse_date(date)?,
                id: id.clone(),
                servings: parse_float("servings", servings)?,
            },
            _ => return Err(ParseError::Usage("remove <date> <id> <servings>")),
        },
        "clear" => Command::Clear { date: single_date(args, "clear <date>")? },
        "view" => Command::View { date: single_date(args, "view <date>")? },
        "total" => Command::Total { date: single_date(args, "total <date>")? },
        "week" => Command::Week { start: single_date(args, "week <start-date>")? },
        "frequency" => match args {
            [start, end] => Command::Frequency {
                start: parse_date(start)?,
                end: parse_date(end)?,
            },
            _ => return Err(ParseError::Usage("frequency <start-date> <end-date>")),
        },
        "days" => Command::Days,
        "undo" => Command::Undo,
        "profile" => parse_profile(args)?,
        "show-profile" => Command::ShowProfile,
        "target" => Command::Target,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };
    Ok(Some(command))
}

fn parse_profile(args: &[String]) -> Result<Command, ParseError> {
    const USAGE: &str = concat!(
        "profile <male|female> <height-cm> <weight-kg> <age> ",
        "<sedentary|light|moderate|active> [method]"
    );
    let (gender, height, weight, age, activity, method) = match args {
        [g, h, w, a, l] => (g, h, w, a, l, None),
        [g, h, w, a, l, m] => (g, h, w, a, l, Some(m)),
        _ => return Err(ParseError::Usage(USAGE)),
    };

    let calorie_method = match method {
        Some(m) => {
            Some(CalorieMethod::parse(m).ok_or_else(|| ParseError::InvalidMethod(m.clone()))?)
        }
        None => None,
    };
    let age = age
        .parse::<u32>()
        .map_err(|_| ParseError::InvalidNumber { what: "age", value: age.clone() })?;

    Ok(Command::Profile(ProfileUpdate {
        gender: Gender::from_str(gender),
        height: parse_float("height", height)?,
        weight: parse_float("weight", weight)?,
        age,
        activity_level: ActivityLevel::from_str(activity),
        calorie_method,
    }))
}

fn single_date(args: &[String], usage: &'static str) -> Result<NaiveDate, ParseError> {
    match args {
        [date] => parse_date(date),
        _ => Err(ParseError::Usage(usage)),
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, ParseError> {
    if value.eq_ignore_ascii_case("today") {
        return Ok(Local::now().date_naive());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ParseError::InvalidDate(value.to_string()))
}

fn parse_int(what: &'static str, value: &str) -> Result<i64, ParseError> {
    value
        .parse()
        .map_err(|_| ParseError::InvalidNumber { what, value: value.to_string() })
}

/// Finite numbers only; range checks are left to the tracker
fn parse_float(what: &'static str, value: &str) -> Result<f64, ParseError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseError::InvalidNumber { what, value: value.to_string() })
}

fn parse_kind(value: &str) -> Result<Option<FoodKind>, ParseError> {
    if value.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    FoodKind::from_str(value)
        .map(Some)
        .ok_or_else(|| ParseError::InvalidKind(value.to_string()))
}

/// `apple=2,banana=0.5`. A repeated ingredient keeps the last value.
fn parse_ingredients(value: &str) -> Result<BTreeMap<String, f64>, ParseError> {
    let mut ingredients = BTreeMap::new();
    for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (id, servings) = part
            .rsplit_once('=')
            .ok_or_else(|| ParseError::InvalidIngredient(part.to_string()))?;
        let servings = servings
            .trim()
            .parse::<f64>()
            .map_err(|_| ParseError::InvalidIngredient(part.to_string()))?;
        let id = id.trim();
        if ingredients.insert(id.to_string(), servings).is_some() {
            return Err(ParseError::RepeatedIngredient(id.to_string()));
        }
    }
    Ok(ingredients)
}

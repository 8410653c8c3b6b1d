//! Food models
//!
//! Basic foods carry a fixed calorie count per serving; composite foods are
//! weighted mixtures of other foods referenced by ID.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Which of the two food sets a record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodKind {
    Basic,
    Composite,
}

impl FoodKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FoodKind::Basic => "basic",
            FoodKind::Composite => "composite",
        }
    }

    /// Parse a kind filter; `None` for anything unrecognised
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Some(FoodKind::Basic),
            "composite" => Some(FoodKind::Composite),
            _ => None,
        }
    }
}

/// An atomic food with a fixed calorie count per serving
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicFood {
    pub id: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub calories_per_serving: u32,
}

/// A food defined as servings of other foods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeFood {
    pub id: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Ingredient food ID -> servings of that ingredient per serving of this food
    #[serde(default)]
    pub ingredients: BTreeMap<String, f64>,
}

/// Data for creating a basic food
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasicFoodCreate {
    pub id: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Signed so negative input can be rejected instead of wrapping
    pub calories: i64,
}

/// Data for creating a composite food
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositeFoodCreate {
    pub id: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub ingredients: BTreeMap<String, f64>,
}

/// Borrowed view of either food kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FoodRef<'a> {
    Basic(&'a BasicFood),
    Composite(&'a CompositeFood),
}

impl<'a> FoodRef<'a> {
    pub fn id(&self) -> &'a str {
        match self {
            FoodRef::Basic(food) => &food.id,
            FoodRef::Composite(food) => &food.id,
        }
    }

    pub fn keywords(&self) -> &'a [String] {
        match self {
            FoodRef::Basic(food) => &food.keywords,
            FoodRef::Composite(food) => &food.keywords,
        }
    }

    pub fn kind(&self) -> FoodKind {
        match self {
            FoodRef::Basic(_) => FoodKind::Basic,
            FoodRef::Composite(_) => FoodKind::Composite,
        }
    }

    /// Case-insensitive substring match against the ID or any keyword.
    /// `needle` must already be lowercased.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        self.id().to_lowercase().contains(needle)
            || self
                .keywords()
                .iter()
                .any(|k| k.to_lowercase().contains(needle))
    }
}

/// Compare two food IDs the way the catalog does
pub fn same_id(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

//! Food Catalog Tools
//!
//! Tools for adding, finding and removing basic and composite foods.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{BasicFoodCreate, CompositeFoodCreate, FoodKind, FoodRef};
use crate::tracker::Tracker;
use super::parse_kind;

/// Response for add_basic_food / add_composite_food
#[derive(Debug, Serialize)]
pub struct AddFoodResponse {
    pub id: String,
    pub kind: FoodKind,
    /// Calories in one serving, if it resolves
    pub calories_per_serving: Option<u64>,
}

/// Summary of a food for list/search results
#[derive(Debug, Serialize)]
pub struct FoodSummary {
    pub id: String,
    pub kind: FoodKind,
    pub keywords: Vec<String>,
}

impl From<FoodRef<'_>> for FoodSummary {
    fn from(food: FoodRef<'_>) -> Self {
        Self {
            id: food.id().to_string(),
            kind: food.kind(),
            keywords: food.keywords().to_vec(),
        }
    }
}

/// Full food detail
#[derive(Debug, Serialize)]
pub struct FoodDetail {
    pub id: String,
    pub kind: FoodKind,
    pub keywords: Vec<String>,
    /// Only for basic foods
    pub calories_per_serving: Option<u32>,
    /// Only for composite foods: ingredient ID -> servings
    pub ingredients: Option<BTreeMap<String, f64>>,
    /// Calories in one serving, resolved through ingredients
    pub resolved_calories: Option<u64>,
    /// Why resolution failed, e.g. an ingredient was deleted
    pub resolve_error: Option<String>,
}

/// Response for search_foods / list_foods
#[derive(Debug, Serialize)]
pub struct FoodListResponse {
    pub items: Vec<FoodSummary>,
    pub total: usize,
}

/// Response for delete_food
#[derive(Debug, Serialize)]
pub struct DeleteFoodResponse {
    pub success: bool,
    pub deleted_id: String,
}

/// Response for calculate_calories
#[derive(Debug, Serialize)]
pub struct CalculateCaloriesResponse {
    pub food_id: String,
    pub servings: f64,
    pub calories: u64,
}

/// Add a basic food
pub fn add_basic_food(
    tracker: &mut Tracker,
    data: BasicFoodCreate,
) -> Result<AddFoodResponse, String> {
    let food = tracker.add_basic_food(data).map_err(|e| e.to_string())?;
    Ok(AddFoodResponse {
        id: food.id,
        kind: FoodKind::Basic,
        calories_per_serving: Some(u64::from(food.calories_per_serving)),
    })
}

/// Add a composite food made of existing foods
pub fn add_composite_food(
    tracker: &mut Tracker,
    data: CompositeFoodCreate,
) -> Result<AddFoodResponse, String> {
    let food = tracker.add_composite_food(data).map_err(|e| e.to_string())?;
    let calories_per_serving = tracker.resolve_calories(&food.id, 1.0).ok();
    Ok(AddFoodResponse {
        id: food.id,
        kind: FoodKind::Composite,
        calories_per_serving,
    })
}

/// Get a food by ID (case-insensitive)
pub fn get_food(tracker: &Tracker, id: &str) -> Option<FoodDetail> {
    let food = tracker.find_food(id)?;
    let (calories_per_serving, ingredients) = match food {
        FoodRef::Basic(f) => (Some(f.calories_per_serving), None),
        FoodRef::Composite(f) => (None, Some(f.ingredients.clone())),
    };
    let (resolved_calories, resolve_error) = match tracker.resolve_calories(food.id(), 1.0) {
        Ok(calories) => (Some(calories), None),
        Err(e) => (None, Some(e.to_string())),
    };

    Some(FoodDetail {
        id: food.id().to_string(),
        kind: food.kind(),
        keywords: food.keywords().to_vec(),
        calories_per_serving,
        ingredients,
        resolved_calories,
        resolve_error,
    })
}

/// Delete a food of either kind
pub fn delete_food(tracker: &mut Tracker, id: &str) -> Result<DeleteFoodResponse, String> {
    let id = id.trim();
    if tracker.delete_food(id) {
        Ok(DeleteFoodResponse {
            success: true,
            deleted_id: id.to_string(),
        })
    } else {
        Err(format!("Food not found with id: {}", id))
    }
}

/// Search foods by ID or keyword substring
pub fn search_foods(
    tracker: &Tracker,
    keyword: &str,
    kind: Option<&str>,
) -> Result<FoodListResponse, String> {
    let kind = parse_kind(kind)?;
    let items: Vec<FoodSummary> = tracker
        .search_foods(keyword, kind)
        .into_iter()
        .map(FoodSummary::from)
        .collect();
    let total = items.len();
    Ok(FoodListResponse { items, total })
}

/// List foods, optionally of one kind
pub fn list_foods(tracker: &Tracker, kind: Option<&str>) -> Result<FoodListResponse, String> {
    let kind = parse_kind(kind)?;
    let items: Vec<FoodSummary> = tracker
        .list_foods(kind)
        .into_iter()
        .map(FoodSummary::from)
        .collect();
    let total = items.len();
    Ok(FoodListResponse { items, total })
}

/// Calories in a number of servings of a food
pub fn calculate_calories(
    tracker: &Tracker,
    food_id: &str,
    servings: f64,
) -> Result<CalculateCaloriesResponse, String> {
    let calories = tracker
        .resolve_calories(food_id, servings)
        .map_err(|e| e.to_string())?;
    let food_id = tracker
        .catalog()
        .canonical_id(food_id.trim())
        .unwrap_or(food_id)
        .to_string();
    Ok(CalculateCaloriesResponse {
        food_id,
        servings,
        calories,
    })
}

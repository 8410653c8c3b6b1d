//! Calorie resolution
//!
//! Walks composite foods down to their basic ingredients. Each basic
//! ingredient is rounded on its own and the rounded values are summed, so a
//! composite total can differ from rounding the exact sum once.

use crate::error::{TrackerError, TrackerResult};
use crate::models::FoodCatalog;

/// 2^64, the first whole number a `u64` cannot hold
const U64_LIMIT: f64 = 18_446_744_073_709_551_616.0;

/// Round half up. Inputs are never negative, so `f64::round` agrees.
/// Values beyond `u64::MAX` saturate; use `calories_from` where that matters.
pub fn round_half_up(value: f64) -> u64 {
    value.round().max(0.0) as u64
}

/// Round a calorie amount half up, failing if it does not fit a `u64`
pub fn calories_from(value: f64) -> TrackerResult<u64> {
    let rounded = value.round().max(0.0);
    if !rounded.is_finite() || rounded >= U64_LIMIT {
        return Err(out_of_range());
    }
    Ok(rounded as u64)
}

/// Sum calorie amounts, failing instead of wrapping on overflow
pub fn sum_calories<I>(values: I) -> TrackerResult<u64>
where
    I: IntoIterator<Item = u64>,
{
    values
        .into_iter()
        .try_fold(0u64, |total, value| total.checked_add(value))
        .ok_or_else(out_of_range)
}

fn out_of_range() -> TrackerError {
    TrackerError::invalid("calorie total out of range")
}

/// Calories in `servings` of a food.
///
/// Fails with `FoodNotFound` when the food (or any ingredient reached on the
/// way down) is not in the catalog, and with `CyclicComposite` when a
/// composite reaches itself again through its ingredients.
pub fn resolve_calories(catalog: &FoodCatalog, food_id: &str, servings: f64) -> TrackerResult<u64> {
    let mut path = Vec::new();
    resolve(catalog, food_id, servings, &mut path)
}

/// `path` holds the lowercased IDs of the composites currently being expanded
fn resolve(
    catalog: &FoodCatalog,
    food_id: &str,
    servings: f64,
    path: &mut Vec<String>,
) -> TrackerResult<u64> {
    if let Some(food) = catalog.find_basic(food_id) {
        return calories_from(f64::from(food.calories_per_serving) * servings);
    }

    let Some(composite) = catalog.find_composite(food_id) else {
        return Err(TrackerError::FoodNotFound(food_id.trim().to_string()));
    };

    let key = composite.id.to_lowercase();
    if path.contains(&key) {
        tracing::warn!("Ingredient cycle through '{}': {:?}", composite.id, path);
        return Err(TrackerError::CyclicComposite(composite.id.clone()));
    }

    path.push(key);
    let mut total: u64 = 0;
    for (ingredient_id, multiplier) in &composite.ingredients {
        let part = resolve(catalog, ingredient_id, servings * multiplier, path)?;
        total = total.checked_add(part).ok_or_else(out_of_range)?;
    }
    path.pop();

    Ok(total)
}

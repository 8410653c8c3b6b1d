//! Food catalog
//!
//! Owns the basic and composite food records. IDs are unique across both
//! sets, compared case-insensitively and stored trimmed with their original
//! casing.

use std::collections::BTreeMap;

use crate::error::{TrackerError, TrackerResult};
use super::food::{
    same_id, BasicFood, BasicFoodCreate, CompositeFood, CompositeFoodCreate, FoodKind, FoodRef,
};

/// The set of all known foods
#[derive(Debug, Clone, Default)]
pub struct FoodCatalog {
    basic: Vec<BasicFood>,
    composite: Vec<CompositeFood>,
}

impl FoodCatalog {
    /// Build a catalog from previously persisted records (no validation)
    pub fn from_parts(basic: Vec<BasicFood>, composite: Vec<CompositeFood>) -> Self {
        Self { basic, composite }
    }

    pub fn basic_foods(&self) -> &[BasicFood] {
        &self.basic
    }

    pub fn composite_foods(&self) -> &[CompositeFood] {
        &self.composite
    }

    /// Add a basic food
    pub fn add_basic(&mut self, data: BasicFoodCreate) -> TrackerResult<&BasicFood> {
        let id = validate_new_id(&data.id)?;
        if data.calories < 0 {
            return Err(TrackerError::invalid("calories cannot be negative"));
        }
        let calories_per_serving = u32::try_from(data.calories)
            .map_err(|_| TrackerError::invalid("calories per serving is too large"))?;
        self.ensure_unique(&id)?;

        self.basic.push(BasicFood {
            id,
            keywords: data.keywords,
            calories_per_serving,
        });
        let index = self.basic.len() - 1;
        Ok(&self.basic[index])
    }

    /// Add a composite food. Every ingredient must already be in the catalog.
    pub fn add_composite(&mut self, data: CompositeFoodCreate) -> TrackerResult<&CompositeFood> {
        let id = validate_new_id(&data.id)?;
        self.ensure_unique(&id)?;

        let mut ingredients: BTreeMap<String, f64> = BTreeMap::new();
        for (ingredient_id, multiplier) in data.ingredients {
            let ingredient_id = ingredient_id.trim().to_string();
            if ingredient_id.is_empty() {
                return Err(TrackerError::invalid("ingredient ID cannot be empty"));
            }
            if !multiplier.is_finite() || multiplier <= 0.0 {
                return Err(TrackerError::invalid(format!(
                    "servings for ingredient '{}' must be positive",
                    ingredient_id
                )));
            }
            if !self.exists(&ingredient_id) {
                return Err(TrackerError::UnknownIngredient(ingredient_id));
            }
            if ingredients.keys().any(|k| same_id(k, &ingredient_id)) {
                return Err(TrackerError::invalid(format!(
                    "ingredient '{}' is listed more than once",
                    ingredient_id
                )));
            }
            ingredients.insert(ingredient_id, multiplier);
        }

        self.composite.push(CompositeFood {
            id,
            keywords: data.keywords,
            ingredients,
        });
        let index = self.composite.len() - 1;
        Ok(&self.composite[index])
    }

    pub fn find_basic(&self, id: &str) -> Option<&BasicFood> {
        self.basic.iter().find(|f| same_id(&f.id, id))
    }

    pub fn find_composite(&self, id: &str) -> Option<&CompositeFood> {
        self.composite.iter().find(|f| same_id(&f.id, id))
    }

    /// Look up a food of either kind
    pub fn find_by_id(&self, id: &str) -> Option<FoodRef<'_>> {
        self.find_basic(id)
            .map(FoodRef::Basic)
            .or_else(|| self.find_composite(id).map(FoodRef::Composite))
    }

    pub fn exists(&self, id: &str) -> bool {
        self.find_by_id(id).is_some()
    }

    /// The stored spelling of an ID
    pub fn canonical_id(&self, id: &str) -> Option<&str> {
        self.find_by_id(id).map(|food| food.id())
    }

    /// Remove a food. Returns the kind of the removed record, if any.
    ///
    /// Composites and log entries that reference the food are left in place
    /// and fail to resolve afterwards.
    pub fn delete(&mut self, id: &str) -> Option<FoodKind> {
        if let Some(pos) = self.basic.iter().position(|f| same_id(&f.id, id)) {
            self.basic.remove(pos);
            return Some(FoodKind::Basic);
        }
        if let Some(pos) = self.composite.iter().position(|f| same_id(&f.id, id)) {
            self.composite.remove(pos);
            return Some(FoodKind::Composite);
        }
        None
    }

    /// Search by case-insensitive substring of the ID or any keyword.
    /// A blank keyword returns every record of the requested kind.
    pub fn search(&self, keyword: &str, kind: Option<FoodKind>) -> Vec<FoodRef<'_>> {
        let needle = keyword.trim().to_lowercase();
        self.iter(kind)
            .filter(|food| needle.is_empty() || food.matches(&needle))
            .collect()
    }

    /// All records of a kind (or both), basic foods first
    pub fn list(&self, kind: Option<FoodKind>) -> Vec<FoodRef<'_>> {
        self.iter(kind).collect()
    }

    pub fn all_ids(&self) -> Vec<String> {
        self.iter(None).map(|food| food.id().to_string()).collect()
    }

    pub fn total_count(&self) -> usize {
        self.basic.len() + self.composite.len()
    }

    fn iter(&self, kind: Option<FoodKind>) -> impl Iterator<Item = FoodRef<'_>> {
        let basic = matches!(kind, None | Some(FoodKind::Basic));
        let composite = matches!(kind, None | Some(FoodKind::Composite));
        self.basic
            .iter()
            .filter(move |_| basic)
            .map(FoodRef::Basic)
            .chain(
                self.composite
                    .iter()
                    .filter(move |_| composite)
                    .map(FoodRef::Composite),
            )
    }

    fn ensure_unique(&self, id: &str) -> TrackerResult<()> {
        match self.find_by_id(id) {
            Some(existing) => Err(TrackerError::DuplicateId(existing.id().to_string())),
            None => Ok(()),
        }
    }
}

fn validate_new_id(id: &str) -> TrackerResult<String> {
    let id = id.trim();
    if id.is_empty() {
        return Err(TrackerError::invalid("food ID cannot be empty"));
    }
    Ok(id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic(id: &str, calories: i64) -> BasicFoodCreate {
        BasicFoodCreate {
            id: id.to_string(),
            keywords: vec!["fruit".to_string()],
            calories,
        }
    }

    fn composite(id: &str, parts: &[(&str, f64)]) -> CompositeFoodCreate {
        CompositeFoodCreate {
            id: id.to_string(),
            keywords: vec!["meal".to_string()],
            ingredients: parts.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    #[test]
    fn test_add_basic_trims_id() {
        let mut catalog = FoodCatalog::default();
        let food = catalog.add_basic(basic("  Apple  ", 100)).unwrap();
        assert_eq!(food.id, "Apple");
        assert_eq!(food.calories_per_serving, 100);
        assert!(catalog.exists("apple"));
        assert_eq!(catalog.canonical_id("APPLE"), Some("Apple"));
    }

    #[test]
    fn test_add_basic_rejects_blank_and_negative() {
        let mut catalog = FoodCatalog::default();
        assert!(matches!(
            catalog.add_basic(basic("   ", 10)),
            Err(TrackerError::InvalidInput(_))
        ));
        assert!(matches!(
            catalog.add_basic(basic("apple", -1)),
            Err(TrackerError::InvalidInput(_))
        ));
        assert_eq!(catalog.total_count(), 0);
    }

    #[test]
    fn test_zero_calories_allowed() {
        let mut catalog = FoodCatalog::default();
        assert!(catalog.add_basic(basic("water", 0)).is_ok());
    }

    #[test]
    fn test_duplicate_id_across_kinds() {
        let mut catalog = FoodCatalog::default();
        catalog.add_basic(basic("apple", 100)).unwrap();
        catalog.add_composite(composite("Bowl", &[("apple", 2.0)])).unwrap();

        assert_eq!(
            catalog.add_basic(basic("APPLE", 50)).unwrap_err(),
            TrackerError::DuplicateId("apple".to_string())
        );
        assert_eq!(
            catalog.add_basic(basic("bowl", 50)).unwrap_err(),
            TrackerError::DuplicateId("Bowl".to_string())
        );
        assert_eq!(
            catalog.add_composite(composite("apple", &[("bowl", 1.0)])).unwrap_err(),
            TrackerError::DuplicateId("apple".to_string())
        );
        assert_eq!(catalog.basic_foods().len(), 1);
        assert_eq!(catalog.composite_foods().len(), 1);
        assert_eq!(catalog.basic_foods()[0].calories_per_serving, 100);
    }

    #[test]
    fn test_composite_requires_existing_ingredients() {
        let mut catalog = FoodCatalog::default();
        catalog.add_basic(basic("apple", 100)).unwrap();
        let err = catalog
            .add_composite(composite("bowl", &[("apple", 1.0), ("pear", 1.0)]))
            .unwrap_err();
        assert_eq!(err, TrackerError::UnknownIngredient("pear".to_string()));
        assert_eq!(catalog.total_count(), 1);
    }

    #[test]
    fn test_composite_can_nest_composites() {
        let mut catalog = FoodCatalog::default();
        catalog.add_basic(basic("apple", 100)).unwrap();
        catalog.add_composite(composite("bowl", &[("apple", 2.0)])).unwrap();
        let platter = catalog
            .add_composite(composite("platter", &[(" BOWL ", 3.0)]))
            .unwrap();
        assert_eq!(platter.ingredients.get("BOWL"), Some(&3.0));
    }

    #[test]
    fn test_composite_rejects_repeated_ingredient() {
        let mut catalog = FoodCatalog::default();
        catalog.add_basic(basic("apple", 100)).unwrap();

        for parts in [[("apple", 1.0), (" apple", 2.0)], [("apple", 1.0), ("APPLE ", 2.0)]] {
            let err = catalog.add_composite(composite("bowl", &parts)).unwrap_err();
            assert!(matches!(err, TrackerError::InvalidInput(_)));
            assert!(err.to_string().contains("listed more than once"));
        }
        assert_eq!(catalog.composite_foods().len(), 0);
    }

    #[test]
    fn test_composite_rejects_non_positive_multiplier() {
        let mut catalog = FoodCatalog::default();
        catalog.add_basic(basic("apple", 100)).unwrap();
        assert!(matches!(
            catalog.add_composite(composite("bowl", &[("apple", 0.0)])),
            Err(TrackerError::InvalidInput(_))
        ));
        assert!(matches!(
            catalog.add_composite(composite("bowl", &[("apple", f64::NAN)])),
            Err(TrackerError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_delete_is_case_insensitive() {
        let mut catalog = FoodCatalog::default();
        catalog.add_basic(basic("Apple", 100)).unwrap();
        catalog.add_composite(composite("bowl", &[("apple", 2.0)])).unwrap();

        assert_eq!(catalog.delete("BOWL"), Some(FoodKind::Composite));
        assert_eq!(catalog.delete("apple"), Some(FoodKind::Basic));
        assert_eq!(catalog.delete("apple"), None);
        assert_eq!(catalog.total_count(), 0);
    }

    #[test]
    fn test_search_matches_id_and_keywords() {
        let mut catalog = FoodCatalog::default();
        catalog
            .add_basic(BasicFoodCreate {
                id: "Banana".to_string(),
                keywords: vec!["Yellow".to_string(), "fruit".to_string()],
                calories: 105,
            })
            .unwrap();
        catalog
            .add_basic(BasicFoodCreate {
                id: "bread".to_string(),
                keywords: vec!["grain".to_string()],
                calories: 80,
            })
            .unwrap();
        catalog.add_composite(composite("toast", &[("bread", 2.0)])).unwrap();

        fn ids(found: Vec<FoodRef<'_>>) -> Vec<String> {
            found.iter().map(|f| f.id().to_string()).collect()
        }

        assert_eq!(ids(catalog.search("yell", None)), vec!["Banana"]);
        assert_eq!(ids(catalog.search("BR", None)), vec!["bread"]);
        assert_eq!(ids(catalog.search("meal", None)), vec!["toast"]);
        assert_eq!(catalog.search("  ", None).len(), 3);
        assert_eq!(ids(catalog.search("", Some(FoodKind::Composite))), vec!["toast"]);
        assert!(catalog.search("pizza", None).is_empty());
    }

    #[test]
    fn test_all_ids_lists_basic_first() {
        let mut catalog = FoodCatalog::default();
        catalog.add_basic(basic("apple", 100)).unwrap();
        catalog.add_composite(composite("bowl", &[("apple", 2.0)])).unwrap();
        catalog.add_basic(basic("pear", 60)).unwrap();
        assert_eq!(catalog.all_ids(), vec!["apple", "pear", "bowl"]);
    }
}

//! Cocktail recognition by ratio distance.
//!
//! Every recipe is scored against the normalized contents: the absolute difference
//! between target and actual ratios for each recipe ingredient, plus a double-weighted
//! penalty for every ingredient the recipe does not call for. The best score above
//! [`ACCEPTANCE_THRESHOLD`] names the drink; otherwise the drink is named after its
//! dominant ingredient.

use crate::catalog::{LiquorLookup, NameNormalizer, RecipeSource};
use barkeep_schemas::recipe::Recipe;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const TRACE_VOLUME_ML: f64 = 10.0;
pub const ACCEPTANCE_THRESHOLD: f64 = 0.7;
pub const PERFECT_THRESHOLD: f64 = 0.95;
pub const CONTAMINATION_WEIGHT: f64 = 2.0;
pub const UNSHAKEN_PENALTY: f64 = 0.8;

pub const EMPTY_NAME: &str = "Empty";
pub const TRACE_NAME: &str = "Trace Liquid";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Empty,
    Trace,
    Recipe,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionResult {
    pub name: String,
    pub recipe_id: Option<String>,
    pub is_perfect: bool,
    pub score: f64,
    pub kind: MatchKind,
}

impl RecognitionResult {
    fn sentinel(name: &str, kind: MatchKind) -> Self {
        Self {
            name: name.to_string(),
            recipe_id: None,
            is_perfect: false,
            score: 0.0,
            kind,
        }
    }

    pub fn is_recognized(&self) -> bool {
        self.kind == MatchKind::Recipe
    }
}

pub struct RecipeMatcher<'a> {
    recipes: &'a dyn RecipeSource,
    normalizer: &'a dyn NameNormalizer,
    liquors: &'a dyn LiquorLookup,
}

impl<'a> RecipeMatcher<'a> {
    pub fn new(
        recipes: &'a dyn RecipeSource,
        normalizer: &'a dyn NameNormalizer,
        liquors: &'a dyn LiquorLookup,
    ) -> Self {
        Self {
            recipes,
            normalizer,
            liquors,
        }
    }

    pub fn recognize(&self, ingredients: &BTreeMap<String, f64>, is_shaken: bool) -> RecognitionResult {
        let present: BTreeMap<String, f64> = ingredients
            .iter()
            .filter(|(_, volume)| **volume > 0.0)
            .map(|(id, volume)| (id.clone(), *volume))
            .collect();
        let total: f64 = present.values().sum();

        if total <= 0.0 {
            return RecognitionResult::sentinel(EMPTY_NAME, MatchKind::Empty);
        }
        if total < TRACE_VOLUME_ML {
            return RecognitionResult::sentinel(TRACE_NAME, MatchKind::Trace);
        }

        let normalized = self.normalizer.normalize(&present);

        let mut best: Option<(&Recipe, f64)> = None;
        for recipe in self.recipes.all_recipes() {
            let score = score_recipe(recipe, &normalized, total, is_shaken);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((recipe, score));
            }
        }

        match best {
            Some((recipe, score)) if score > ACCEPTANCE_THRESHOLD => RecognitionResult {
                name: recipe.display_name.clone(),
                recipe_id: Some(recipe.recipe_id.clone()),
                is_perfect: score > PERFECT_THRESHOLD,
                score,
                kind: MatchKind::Recipe,
            },
            _ => RecognitionResult {
                name: self.fallback_name(&normalized),
                recipe_id: None,
                is_perfect: false,
                score: best.map_or(0.0, |(_, score)| score),
                kind: MatchKind::Fallback,
            },
        }
    }

    fn fallback_name(&self, normalized: &BTreeMap<String, f64>) -> String {
        let mut dominant: Option<(&String, f64)> = None;
        for (id, volume) in normalized {
            if dominant.map_or(true, |(_, v)| *volume > v) {
                dominant = Some((id, *volume));
            }
        }

        match dominant {
            Some((id, _)) => {
                let label = self
                    .liquors
                    .get_liquor(id)
                    .map_or(id.as_str(), |l| l.display_name.as_str());
                format!("Mixed {}", label)
            }
            None => EMPTY_NAME.to_string(),
        }
    }
}

/// Score in `[0, 1]` of `ingredients` (normalized ids, `total` ml) against `recipe`.
pub fn score_recipe(
    recipe: &Recipe,
    ingredients: &BTreeMap<String, f64>,
    total: f64,
    is_shaken: bool,
) -> f64 {
    let recipe_parts = recipe.total_parts();
    if recipe.ingredients.is_empty() || recipe_parts <= 0.0 || total <= 0.0 {
        return 0.0;
    }

    let mut error = 0.0;
    for (id, parts) in &recipe.ingredients {
        let Some(volume) = ingredients.get(id) else {
            return 0.0;
        };
        error += (parts / recipe_parts - volume / total).abs();
    }

    for (id, volume) in ingredients {
        if !recipe.ingredients.contains_key(id) {
            error += (volume / total) * CONTAMINATION_WEIGHT;
        }
    }

    let mut score = (1.0 - error).clamp(0.0, 1.0);
    if recipe.requires_shaking && !is_shaken {
        score *= UNSHAKEN_PENALTY;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{IngredientAliases, LiquorDatabase, RecipeBook};
    use barkeep_schemas::{
        alias::IngredientAlias,
        color::Rgba,
        liquor::{Liquor, LiquorCategory},
    };

    fn recipe(id: &str, name: &str, parts: &[(&str, f64)], shaken: bool) -> Recipe {
        Recipe {
            recipe_id: id.to_string(),
            display_name: name.to_string(),
            ingredients: parts.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            requires_shaking: shaken,
            glass: None,
            garnish: None,
            description: None,
            price: 10.0,
        }
    }

    fn liquor(id: &str, name: &str) -> Liquor {
        Liquor {
            liquor_id: id.to_string(),
            display_name: name.to_string(),
            category: LiquorCategory::Spirit,
            color: Rgba::new(1.0, 1.0, 1.0, 0.3),
            abv: 40.0,
            description: None,
        }
    }

    struct Fixture {
        recipes: RecipeBook,
        aliases: IngredientAliases,
        liquors: LiquorDatabase,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                recipes: RecipeBook::new(vec![
                    recipe("martini", "Martini", &[("gin", 6.0), ("vermouth", 1.0)], false),
                    recipe(
                        "margarita",
                        "Margarita",
                        &[("tequila", 2.0), ("triple_sec", 1.0), ("lime_juice", 1.0)],
                        true,
                    ),
                    recipe("cuba_libre", "Cuba Libre", &[("rum", 1.0), ("cola", 3.0)], false),
                ]),
                aliases: IngredientAliases::new(vec![IngredientAlias {
                    alias: "dry_vermouth".to_string(),
                    canonical_id: "vermouth".to_string(),
                }]),
                liquors: LiquorDatabase::new(vec![liquor("gin", "Gin"), liquor("cola", "Cola")]),
            }
        }

        fn matcher(&self) -> RecipeMatcher<'_> {
            RecipeMatcher::new(&self.recipes, &self.aliases, &self.liquors)
        }
    }

    fn mix(parts: &[(&str, f64)]) -> BTreeMap<String, f64> {
        parts.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn recognizes_a_martini() {
        let fixture = Fixture::new();
        let result = fixture
            .matcher()
            .recognize(&mix(&[("gin", 60.0), ("vermouth", 10.0)]), false);

        assert_eq!(result.name, "Martini");
        assert_eq!(result.recipe_id.as_deref(), Some("martini"));
        assert!(result.score > ACCEPTANCE_THRESHOLD);
        assert!(result.is_perfect);
    }

    #[test]
    fn aliases_are_resolved_before_scoring() {
        let fixture = Fixture::new();
        let result = fixture
            .matcher()
            .recognize(&mix(&[("gin", 60.0), ("dry_vermouth", 10.0)]), false);
        assert_eq!(result.recipe_id.as_deref(), Some("martini"));
    }

    #[test]
    fn contamination_drops_below_threshold_and_falls_back() {
        let fixture = Fixture::new();
        let contents = mix(&[("gin", 60.0), ("vermouth", 10.0), ("cola", 30.0)]);
        let martini = fixture.recipes.get("martini").unwrap();

        assert!(score_recipe(martini, &contents, 100.0, false) < ACCEPTANCE_THRESHOLD);

        let result = fixture.matcher().recognize(&contents, false);
        assert_eq!(result.kind, MatchKind::Fallback);
        assert_eq!(result.name, "Mixed Gin");
        assert!(result.recipe_id.is_none());
        assert!(!result.is_perfect);
    }

    #[test]
    fn trace_volume_is_a_sentinel() {
        let fixture = Fixture::new();
        let result = fixture
            .matcher()
            .recognize(&mix(&[("gin", 4.0), ("vermouth", 1.0)]), true);
        assert_eq!(result.kind, MatchKind::Trace);
        assert_eq!(result.name, TRACE_NAME);
        assert_eq!(result.score, 0.0);

        let empty = fixture.matcher().recognize(&BTreeMap::new(), false);
        assert_eq!(empty.kind, MatchKind::Empty);
    }

    #[test]
    fn missing_required_ingredient_scores_zero() {
        let fixture = Fixture::new();
        let martini = fixture.recipes.get("martini").unwrap();
        assert_eq!(score_recipe(martini, &mix(&[("gin", 70.0)]), 70.0, false), 0.0);
    }

    #[test]
    fn unshaken_drinks_are_penalized_not_rejected() {
        let fixture = Fixture::new();
        let margarita = mix(&[("tequila", 50.0), ("triple_sec", 25.0), ("lime_juice", 25.0)]);

        let shaken = fixture.matcher().recognize(&margarita, true);
        let stirred = fixture.matcher().recognize(&margarita, false);

        assert!((shaken.score - 1.0).abs() < 1e-9);
        assert!((stirred.score - 0.8).abs() < 1e-9);
        assert_eq!(stirred.recipe_id.as_deref(), Some("margarita"));
        assert!(!stirred.is_perfect);
    }

    #[test]
    fn unknown_dominant_ingredient_uses_its_id() {
        let fixture = Fixture::new();
        let result = fixture.matcher().recognize(&mix(&[("absinthe", 40.0)]), false);
        assert_eq!(result.name, "Mixed absinthe");
    }

    #[test]
    fn equal_scores_resolve_to_the_smallest_recipe_id() {
        let recipes = RecipeBook::new(vec![
            recipe("zz_gin_neat", "Gin Neat (Z)", &[("gin", 1.0)], false),
            recipe("aa_gin_neat", "Gin Neat (A)", &[("gin", 1.0)], false),
        ]);
        let aliases = IngredientAliases::default();
        let liquors = LiquorDatabase::default();
        let matcher = RecipeMatcher::new(&recipes, &aliases, &liquors);

        let result = matcher.recognize(&mix(&[("gin", 50.0)]), false);
        assert_eq!(result.recipe_id.as_deref(), Some("aa_gin_neat"));
    }

    #[test]
    fn recognition_is_deterministic() {
        let fixture = Fixture::new();
        let contents = mix(&[("rum", 40.0), ("cola", 110.0), ("lime_juice", 5.0)]);
        let first = fixture.matcher().recognize(&contents, false);
        for _ in 0..10 {
            assert_eq!(fixture.matcher().recognize(&contents, false), first);
        }
    }
}

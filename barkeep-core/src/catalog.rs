//! Read-only reference data the mixing core consults: liquors, recipes and ingredient
//! aliases. Each table sits behind a small trait so callers (and tests) can inject
//! their own instead of reaching for a global.

use barkeep_schemas::{alias::IngredientAlias, liquor::Liquor, recipe::Recipe};
use std::collections::{BTreeMap, HashMap};

pub trait LiquorLookup {
    fn get_liquor(&self, liquor_id: &str) -> Option<&Liquor>;
}

pub trait RecipeSource {
    /// All recipes, in the order the matcher should visit them.
    fn all_recipes(&self) -> &[Recipe];
}

pub trait NameNormalizer {
    /// Collapses aliases onto canonical ids, summing volumes that land on the same id.
    fn normalize(&self, ingredients: &BTreeMap<String, f64>) -> BTreeMap<String, f64>;
}

#[derive(Debug, Clone, Default)]
pub struct LiquorDatabase {
    liquors: HashMap<String, Liquor>,
}

impl LiquorDatabase {
    pub fn new(liquors: Vec<Liquor>) -> Self {
        Self {
            liquors: liquors
                .into_iter()
                .map(|l| (l.liquor_id.clone(), l))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.liquors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.liquors.is_empty()
    }
}

impl LiquorLookup for LiquorDatabase {
    fn get_liquor(&self, liquor_id: &str) -> Option<&Liquor> {
        self.liquors.get(liquor_id)
    }
}

/// Recipes kept sorted by `recipe_id`, which makes the id the tie-break between
/// equally scored matches.
#[derive(Debug, Clone, Default)]
pub struct RecipeBook {
    recipes: Vec<Recipe>,
}

impl RecipeBook {
    pub fn new(mut recipes: Vec<Recipe>) -> Self {
        recipes.sort_by(|a, b| a.recipe_id.cmp(&b.recipe_id));
        recipes.dedup_by(|a, b| a.recipe_id == b.recipe_id);
        Self { recipes }
    }

    pub fn get(&self, recipe_id: &str) -> Option<&Recipe> {
        self.recipes
            .binary_search_by(|r| r.recipe_id.as_str().cmp(recipe_id))
            .ok()
            .map(|i| &self.recipes[i])
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

impl RecipeSource for RecipeBook {
    fn all_recipes(&self) -> &[Recipe] {
        &self.recipes
    }
}

#[derive(Debug, Clone, Default)]
pub struct IngredientAliases {
    canonical: HashMap<String, String>,
}

impl IngredientAliases {
    pub fn new(aliases: Vec<IngredientAlias>) -> Self {
        Self {
            canonical: aliases
                .into_iter()
                .map(|a| (a.alias, a.canonical_id))
                .collect(),
        }
    }

    pub fn canonical_id<'a>(&'a self, id: &'a str) -> &'a str {
        self.canonical.get(id).map_or(id, |c| c.as_str())
    }
}

impl NameNormalizer for IngredientAliases {
    fn normalize(&self, ingredients: &BTreeMap<String, f64>) -> BTreeMap<String, f64> {
        let mut normalized = BTreeMap::new();
        for (id, volume) in ingredients {
            *normalized
                .entry(self.canonical_id(id).to_string())
                .or_insert(0.0) += volume;
        }
        normalized
    }
}

/// Everything the core needs from the outside world, passed explicitly.
#[derive(Debug, Clone, Default)]
pub struct BarContext {
    pub liquors: LiquorDatabase,
    pub recipes: RecipeBook,
    pub aliases: IngredientAliases,
}

impl BarContext {
    pub fn new(liquors: LiquorDatabase, recipes: RecipeBook, aliases: IngredientAliases) -> Self {
        Self {
            liquors,
            recipes,
            aliases,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(id: &str) -> Recipe {
        Recipe {
            recipe_id: id.to_string(),
            display_name: id.to_uppercase(),
            ingredients: BTreeMap::from([("gin".to_string(), 1.0)]),
            requires_shaking: false,
            glass: None,
            garnish: None,
            description: None,
            price: 8.0,
        }
    }

    #[test]
    fn recipe_book_is_sorted_and_searchable() {
        let book = RecipeBook::new(vec![recipe("negroni"), recipe("gimlet"), recipe("martini")]);
        let ids: Vec<_> = book.all_recipes().iter().map(|r| r.recipe_id.as_str()).collect();
        assert_eq!(ids, ["gimlet", "martini", "negroni"]);
        assert_eq!(book.get("martini").map(|r| r.display_name.as_str()), Some("MARTINI"));
        assert!(book.get("mojito").is_none());
    }

    #[test]
    fn aliases_merge_onto_canonical_ids() {
        let aliases = IngredientAliases::new(vec![
            IngredientAlias {
                alias: "dry_vermouth".to_string(),
                canonical_id: "vermouth".to_string(),
            },
            IngredientAlias {
                alias: "coke".to_string(),
                canonical_id: "cola".to_string(),
            },
        ]);
        let input = BTreeMap::from([
            ("dry_vermouth".to_string(), 10.0),
            ("vermouth".to_string(), 5.0),
            ("gin".to_string(), 60.0),
        ]);
        let normalized = aliases.normalize(&input);
        assert_eq!(normalized.get("vermouth"), Some(&15.0));
        assert_eq!(normalized.get("gin"), Some(&60.0));
        assert!(!normalized.contains_key("dry_vermouth"));
    }
}

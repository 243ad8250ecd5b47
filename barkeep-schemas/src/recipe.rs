use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn default_price() -> f64 {
    8.0
}

/// A named cocktail defined by relative ingredient parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub recipe_id: String,
    pub display_name: String,
    /// Ingredient id to relative parts (ratio units, not millilitres).
    pub ingredients: BTreeMap<String, f64>,
    #[serde(default)]
    pub requires_shaking: bool,
    pub glass: Option<String>,
    pub garnish: Option<String>,
    pub description: Option<String>,
    /// Base price paid for a correct serve.
    #[serde(default = "default_price")]
    pub price: f64,
}

impl Recipe {
    pub fn total_parts(&self) -> f64 {
        self.ingredients.values().sum()
    }
}

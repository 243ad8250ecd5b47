use crate::{color::Rgba, liquor::Liquor};
use serde::{Deserialize, Serialize};

/// One pour's worth of a single ingredient inside a container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientContribution {
    pub ingredient_id: String,
    pub name: String,
    pub display_name: String,
    pub amount_ml: f64,
    pub color: Rgba,
}

impl IngredientContribution {
    pub fn new(ingredient_id: &str, display_name: &str, amount_ml: f64, color: Rgba) -> Self {
        Self {
            ingredient_id: ingredient_id.to_string(),
            name: ingredient_id.to_string(),
            display_name: display_name.to_string(),
            amount_ml,
            color,
        }
    }

    pub fn from_liquor(liquor: &Liquor, amount_ml: f64) -> Self {
        Self {
            ingredient_id: liquor.liquor_id.clone(),
            name: liquor.liquor_id.clone(),
            display_name: liquor.display_name.clone(),
            amount_ml,
            color: liquor.color,
        }
    }

    /// Same ingredient and color, different amount.
    pub fn with_amount(&self, amount_ml: f64) -> Self {
        Self {
            amount_ml,
            ..self.clone()
        }
    }
}

use crate::recognition::RecognitionResult;
use barkeep_schemas::recipe::Recipe;
use serde::{Deserialize, Serialize};

/// Drinks above this temperature are paid at [`WARM_PAYMENT_FACTOR`].
pub const WARM_SERVE_THRESHOLD_C: f64 = 15.0;
pub const WARM_PAYMENT_FACTOR: f64 = 0.9;
pub const PERFECT_TIP_FACTOR: f64 = 0.2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServeOutcome {
    pub drink_name: String,
    pub recipe_id: Option<String>,
    pub order_recipe_id: Option<String>,
    pub score: f64,
    pub is_perfect: bool,
    pub matched_order: bool,
    pub temperature_c: f64,
    pub payment: f64,
    pub tip: f64,
}

/// Prices a served drink against the customer's order.
pub fn serve(recognition: &RecognitionResult, order: Option<&Recipe>, temperature_c: f64) -> ServeOutcome {
    let matched_order = match (order, recognition.recipe_id.as_deref()) {
        (Some(recipe), Some(recognized)) => recipe.recipe_id == recognized,
        _ => false,
    };

    let (payment, tip) = match order {
        Some(recipe) if matched_order => {
            let mut payment = recipe.price * (0.5 + 0.5 * recognition.score);
            if temperature_c > WARM_SERVE_THRESHOLD_C {
                payment *= WARM_PAYMENT_FACTOR;
            }
            let tip = if recognition.is_perfect {
                recipe.price * PERFECT_TIP_FACTOR
            } else {
                0.0
            };
            (payment, tip)
        }
        _ => (0.0, 0.0),
    };

    ServeOutcome {
        drink_name: recognition.name.clone(),
        recipe_id: recognition.recipe_id.clone(),
        order_recipe_id: order.map(|r| r.recipe_id.clone()),
        score: recognition.score,
        is_perfect: recognition.is_perfect,
        matched_order,
        temperature_c,
        payment,
        tip,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognition::MatchKind;
    use std::collections::BTreeMap;

    fn martini() -> Recipe {
        Recipe {
            recipe_id: "martini".to_string(),
            display_name: "Martini".to_string(),
            ingredients: BTreeMap::from([("gin".to_string(), 6.0), ("vermouth".to_string(), 1.0)]),
            requires_shaking: false,
            glass: Some("martini".to_string()),
            garnish: Some("olive".to_string()),
            description: None,
            price: 12.0,
        }
    }

    fn recognized(score: f64) -> RecognitionResult {
        RecognitionResult {
            name: "Martini".to_string(),
            recipe_id: Some("martini".to_string()),
            is_perfect: score > 0.95,
            score,
            kind: MatchKind::Recipe,
        }
    }

    #[test]
    fn perfect_cold_match_pays_full_price_and_tip() {
        let outcome = serve(&recognized(1.0), Some(&martini()), 2.0);
        assert!(outcome.matched_order);
        assert!((outcome.payment - 12.0).abs() < 1e-9);
        assert!((outcome.tip - 2.4).abs() < 1e-9);
    }

    #[test]
    fn warm_imperfect_match_is_discounted() {
        let outcome = serve(&recognized(0.8), Some(&martini()), 22.0);
        assert!((outcome.payment - 12.0 * 0.9 * 0.9).abs() < 1e-9);
        assert_eq!(outcome.tip, 0.0);
    }

    #[test]
    fn wrong_drink_or_no_order_pays_nothing() {
        let mut other = martini();
        other.recipe_id = "gimlet".to_string();
        let outcome = serve(&recognized(1.0), Some(&other), 2.0);
        assert!(!outcome.matched_order);
        assert_eq!(outcome.payment, 0.0);

        let walk_in = serve(&recognized(1.0), None, 2.0);
        assert!(!walk_in.matched_order);
        assert_eq!(walk_in.payment + walk_in.tip, 0.0);
    }
}

use crate::catalog::LiquorLookup;
use barkeep_schemas::{color::Rgba, ingredient::IngredientContribution, liquor::Liquor};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Contributions at or below this amount are dropped after a transfer.
pub const PRUNE_EPSILON_ML: f64 = 0.01;

/// Slack for floating-point residue when deciding full or empty.
const VOLUME_TOLERANCE_ML: f64 = 1e-9;

/// The liquid currently held by a vessel.
///
/// `volume_ml` never exceeds `max_volume_ml`; additions past the remaining space are
/// truncated rather than rejected.
#[derive(Debug, Clone, Serialize)]
pub struct ContainerContents {
    ingredients: Vec<IngredientContribution>,
    max_volume_ml: f64,
    volume_ml: f64,
    mixed_color: Rgba,
    is_shaken: bool,
    is_stirred: bool,
}

impl ContainerContents {
    pub fn new(max_volume_ml: f64) -> Self {
        Self {
            ingredients: Vec::new(),
            max_volume_ml: max_volume_ml.max(0.0),
            volume_ml: 0.0,
            mixed_color: Rgba::TRANSPARENT,
            is_shaken: false,
            is_stirred: false,
        }
    }

    pub fn ingredients(&self) -> &[IngredientContribution] {
        &self.ingredients
    }

    pub fn volume_ml(&self) -> f64 {
        self.volume_ml
    }

    pub fn max_volume_ml(&self) -> f64 {
        self.max_volume_ml
    }

    pub fn remaining_space_ml(&self) -> f64 {
        (self.max_volume_ml - self.volume_ml).max(0.0)
    }

    pub fn mixed_color(&self) -> Rgba {
        self.mixed_color
    }

    pub fn is_shaken(&self) -> bool {
        self.is_shaken
    }

    pub fn is_stirred(&self) -> bool {
        self.is_stirred
    }

    pub fn is_empty(&self) -> bool {
        self.volume_ml <= VOLUME_TOLERANCE_ML
    }

    pub fn is_full(&self) -> bool {
        self.remaining_space_ml() <= VOLUME_TOLERANCE_ML
    }

    /// Adds a contribution, truncated to the remaining space. Returns the millilitres
    /// actually added.
    pub fn add_ingredient(&mut self, contribution: IngredientContribution) -> f64 {
        if self.is_full() || !(contribution.amount_ml > 0.0) {
            return 0.0;
        }

        let amount = contribution.amount_ml.min(self.remaining_space_ml());
        if amount < contribution.amount_ml {
            debug!(
                ingredient = %contribution.ingredient_id,
                requested_ml = contribution.amount_ml,
                added_ml = amount,
                "contribution truncated to remaining space"
            );
        }

        match self
            .ingredients
            .iter_mut()
            .find(|c| c.ingredient_id == contribution.ingredient_id)
        {
            Some(existing) => {
                if existing.color != contribution.color {
                    existing.color = Rgba::weighted_average([
                        (existing.color, existing.amount_ml),
                        (contribution.color, amount),
                    ]);
                }
                existing.amount_ml += amount;
            }
            None => self.ingredients.push(contribution.with_amount(amount)),
        }

        self.recalculate_volume();
        self.update_mixed_color();
        amount
    }

    pub fn add_liquor(&mut self, liquor: &Liquor, amount_ml: f64) -> f64 {
        self.add_ingredient(IngredientContribution::from_liquor(liquor, amount_ml))
    }

    pub fn clear(&mut self) {
        self.ingredients.clear();
        self.volume_ml = 0.0;
        self.is_shaken = false;
        self.is_stirred = false;
        self.mixed_color = Rgba::TRANSPARENT;
    }

    /// Volume-weighted ABV in percent. Ingredients the lookup does not know count as 0 %.
    pub fn calculate_alcohol_content(&self, liquors: &dyn LiquorLookup) -> f64 {
        if self.volume_ml <= 0.0 {
            return 0.0;
        }
        let alcohol_ml: f64 = self
            .ingredients
            .iter()
            .map(|c| {
                liquors
                    .get_liquor(&c.ingredient_id)
                    .map_or(0.0, |l| c.amount_ml * l.abv)
            })
            .sum();
        alcohol_ml / self.volume_ml
    }

    pub fn update_mixed_color(&mut self) {
        self.mixed_color =
            Rgba::weighted_average(self.ingredients.iter().map(|c| (c.color, c.amount_ml)));
    }

    /// Ingredient id to total millilitres, the input the recipe matcher consumes.
    pub fn ingredient_volumes(&self) -> BTreeMap<String, f64> {
        let mut volumes = BTreeMap::new();
        for c in &self.ingredients {
            *volumes.entry(c.ingredient_id.clone()).or_insert(0.0) += c.amount_ml;
        }
        volumes
    }

    /// Marks the liquid as shaken. There is nothing to mark in empty contents.
    pub fn mark_shaken(&mut self) {
        if self.is_empty() {
            return;
        }
        self.is_shaken = true;
        self.update_mixed_color();
    }

    pub fn mark_stirred(&mut self) {
        if self.is_empty() {
            return;
        }
        self.is_stirred = true;
        self.update_mixed_color();
    }

    /// Removes `ratio` of every contribution and returns the removed portions, leaving
    /// the source ratios untouched. Colors are not recomputed here.
    pub(crate) fn split_off(&mut self, ratio: f64) -> Vec<IngredientContribution> {
        let mut portions = Vec::with_capacity(self.ingredients.len());
        for contribution in self.ingredients.iter_mut() {
            let portion = contribution.amount_ml * ratio;
            contribution.amount_ml -= portion;
            portions.push(contribution.with_amount(portion));
        }
        portions
    }

    pub(crate) fn prune_residue(&mut self) {
        self.ingredients.retain(|c| c.amount_ml > PRUNE_EPSILON_ML);
        self.recalculate_volume();
    }

    pub(crate) fn set_shaken(&mut self, shaken: bool) {
        self.is_shaken = shaken;
    }

    /// Shaken and stirred describe the liquid, so both reset once it is all gone.
    fn recalculate_volume(&mut self) {
        let total = self.ingredients.iter().fold(0.0, |acc, c| acc + c.amount_ml);
        self.volume_ml = total.clamp(0.0, self.max_volume_ml);
        if self.is_empty() {
            self.is_shaken = false;
            self.is_stirred = false;
        }
    }
}

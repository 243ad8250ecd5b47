use crate::contents::ContainerContents;
use barkeep_schemas::{
    color::Rgba,
    container::{ContainerDefinition, ContainerKind},
    ingredient::IngredientContribution,
};
use serde::Serialize;
use tracing::debug;

pub const ROOM_TEMPERATURE_C: f64 = 25.0;
pub const MIN_TEMPERATURE_C: f64 = -20.0;
pub const MAX_TEMPERATURE_C: f64 = 100.0;

/// Exponential approach rate toward room temperature, per second.
pub const AMBIENT_DECAY_RATE: f64 = 0.01;

pub const ICE_CUBE_ML: f64 = 15.0;
pub const ICE_TEMPERATURE_C: f64 = 0.0;
/// Exponential approach rate toward the ice temperature, per second.
pub const ICE_CHILL_RATE: f64 = 0.15;
/// Fraction of the held ice that melts per second at 0 °C.
pub const ICE_MELT_FRACTION: f64 = 0.004;

pub const WATER_ID: &str = "water";
pub const WATER_COLOR: Rgba = Rgba::new(0.85, 0.92, 1.0, 0.25);

/// A vessel in the bar: its liquid plus the physical state around it.
#[derive(Debug, Clone, Serialize)]
pub struct Container {
    id: String,
    kind: ContainerKind,
    contents: ContainerContents,
    temperature_c: f64,
    ice_ml: f64,
    is_pouring: bool,
}

impl Container {
    pub fn new(id: &str, kind: ContainerKind, max_volume_ml: f64) -> Self {
        Self {
            id: id.to_string(),
            kind,
            contents: ContainerContents::new(max_volume_ml),
            temperature_c: ROOM_TEMPERATURE_C,
            ice_ml: 0.0,
            is_pouring: false,
        }
    }

    /// An empty instance of `definition`; initial fills are applied by the caller,
    /// which owns the liquor lookup.
    pub fn from_definition(id: &str, definition: &ContainerDefinition) -> Self {
        let mut container = Self::new(id, definition.kind, definition.max_volume_ml);
        if let Some(celsius) = definition.initial_temperature_c {
            container.set_temperature(celsius);
        }
        container
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    pub fn contents(&self) -> &ContainerContents {
        &self.contents
    }

    pub fn contents_mut(&mut self) -> &mut ContainerContents {
        &mut self.contents
    }

    pub fn temperature_c(&self) -> f64 {
        self.temperature_c
    }

    pub fn ice_ml(&self) -> f64 {
        self.ice_ml
    }

    pub fn is_pouring(&self) -> bool {
        self.is_pouring
    }

    pub fn set_pouring(&mut self, pouring: bool) {
        self.is_pouring = pouring;
    }

    pub fn set_temperature(&mut self, celsius: f64) {
        if celsius.is_nan() {
            return;
        }
        self.temperature_c = celsius.clamp(MIN_TEMPERATURE_C, MAX_TEMPERATURE_C);
    }

    pub fn add_ice(&mut self, cubes: u32) {
        self.ice_ml += cubes as f64 * ICE_CUBE_ML;
    }

    /// Empties the liquid and the ice and lets the vessel return to room temperature.
    pub fn clear(&mut self) {
        self.contents.clear();
        self.ice_ml = 0.0;
        self.temperature_c = ROOM_TEMPERATURE_C;
        self.is_pouring = false;
    }

    /// Moves up to `requested_ml` into `target`, keeping the ingredient ratios of this
    /// container. Returns the millilitres actually moved.
    ///
    /// Pouring a container into itself is not detected here; callers that own identity
    /// must reject it.
    pub fn transfer_to(&mut self, target: &mut Container, requested_ml: f64) -> f64 {
        if self.contents.is_empty() || target.contents.is_full() || !(requested_ml > 0.0) {
            return 0.0;
        }

        let actual = requested_ml
            .min(self.contents.volume_ml())
            .min(target.contents.remaining_space_ml());
        if actual <= 0.0 {
            return 0.0;
        }

        let ratio = actual / self.contents.volume_ml();
        for portion in self.contents.split_off(ratio) {
            target.contents.add_ingredient(portion);
        }

        let target_volume = target.contents.volume_ml();
        if target_volume > 0.0 {
            let previous_volume = (target_volume - actual).max(0.0);
            target.temperature_c = (target.temperature_c * previous_volume
                + self.temperature_c * actual)
                / target_volume;
        }

        if self.contents.is_shaken() {
            target.contents.set_shaken(true);
        }

        self.contents.prune_residue();
        self.contents.update_mixed_color();
        target.contents.update_mixed_color();

        debug!(
            source = %self.id,
            target = %target.id,
            requested_ml,
            actual_ml = actual,
            "transfer"
        );
        actual
    }

    /// Advances chilling, melting and ambient drift by `dt` seconds. `agitation`
    /// scales the ice exchange (1.0 at rest, higher while shaking). Returns the
    /// millilitres of melt water added to the liquid.
    pub fn tick(&mut self, dt: f64, agitation: f64) -> f64 {
        if !(dt > 0.0) {
            return 0.0;
        }

        if self.ice_ml > 0.0 {
            let melt = (self.ice_ml
                * ICE_MELT_FRACTION
                * dt
                * agitation
                * (1.0 + self.temperature_c.max(0.0) / ROOM_TEMPERATURE_C))
                .min(self.ice_ml);
            self.ice_ml -= melt;
            if self.ice_ml < 1e-6 {
                self.ice_ml = 0.0;
            }

            self.approach(ICE_TEMPERATURE_C, ICE_CHILL_RATE * agitation, dt);
            self.contents.add_ingredient(IngredientContribution::new(
                WATER_ID,
                "Water",
                melt,
                WATER_COLOR,
            ))
        } else {
            self.approach(ROOM_TEMPERATURE_C, AMBIENT_DECAY_RATE, dt);
            0.0
        }
    }

    fn approach(&mut self, target_c: f64, rate: f64, dt: f64) {
        let factor = 1.0 - (-rate * dt).exp();
        self.temperature_c += (target_c - self.temperature_c) * factor;
    }
}

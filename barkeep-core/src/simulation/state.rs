use crate::{container::Container, serving::ServeOutcome, shake::ShakeMinigame};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimulationEvent {
    ContainerSpawned { container_id: String },
    IngredientAdded { container_id: String, ingredient_id: String, amount_ml: f64 },
    IceAdded { container_id: String, cubes: u32 },
    PourStarted { source_id: String, target_id: String },
    PourTick { source_id: String, target_id: String, amount_ml: f64 },
    PourStopped { source_id: String, target_id: String },
    ShakeStarted { container_id: String },
    ShakePressed { container_id: String, hit: bool },
    ShakeStopped { container_id: String },
    ShakeComplete { container_id: String, quality: f64 },
    Stirred { container_id: String },
    Cleared { container_id: String },
    DrinkServed { container_id: String, outcome: ServeOutcome },
}

/// Receives a frame's events when the host calls `SimulationEngine::dispatch_events`.
pub trait SimulationObserver {
    fn on_pour_tick(&mut self, _source_id: &str, _target_id: &str, _amount_ml: f64) {}

    fn on_shake_complete(&mut self, _container_id: &str, _quality: f64) {}

    fn on_drink_served(&mut self, _container_id: &str, _outcome: &ServeOutcome) {}

    fn on_event(&mut self, _event: &SimulationEvent) {}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivePour {
    pub source_id: String,
    pub target_id: String,
    pub rate_ml_per_s: f64,
}

#[derive(Debug, Clone)]
pub struct SimulationState {
    pub tick: u64,
    pub elapsed_s: f64,
    pub time_in_step_s: f64,
    pub containers: BTreeMap<String, Container>,
    pub pours: Vec<ActivePour>,
    pub shakes: BTreeMap<String, ShakeMinigame>,
    pub events: Vec<SimulationEvent>,
    pub served: Vec<ServeOutcome>,
}

impl SimulationState {
    pub fn new() -> Self {
        Self {
            tick: 0,
            elapsed_s: 0.0,
            time_in_step_s: 0.0,
            containers: BTreeMap::new(),
            pours: Vec::new(),
            shakes: BTreeMap::new(),
            events: Vec::new(),
            served: Vec::new(),
        }
    }
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::new()
    }
}

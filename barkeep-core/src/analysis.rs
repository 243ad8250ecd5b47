use crate::{
    container::Container,
    error::BarkeepError,
    serving::ServeOutcome,
    simulation::state::SimulationEvent,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
pub struct LogEntry {
    pub tick: u64,
    pub elapsed_s: f64,
    pub step_id: String,
    pub containers_json: String,
    pub events_json: String,
}

/// Per-container state as written to the session log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerSnapshot {
    pub volume_ml: f64,
    pub max_volume_ml: f64,
    pub temperature_c: f64,
    pub ice_ml: f64,
    pub is_shaken: bool,
    pub is_stirred: bool,
    pub is_pouring: bool,
    pub color: String,
    pub ingredients: BTreeMap<String, f64>,
}

impl ContainerSnapshot {
    pub fn from_container(container: &Container) -> Self {
        let contents = container.contents();
        Self {
            volume_ml: contents.volume_ml(),
            max_volume_ml: contents.max_volume_ml(),
            temperature_c: container.temperature_c(),
            ice_ml: container.ice_ml(),
            is_shaken: contents.is_shaken(),
            is_stirred: contents.is_stirred(),
            is_pouring: container.is_pouring(),
            color: contents.mixed_color().to_hex(),
            ingredients: contents.ingredient_volumes(),
        }
    }
}

/// One decoded row of a session log.
#[derive(Debug, Clone)]
pub struct SessionFrame {
    pub tick: u64,
    pub elapsed_s: f64,
    pub step_id: String,
    pub containers: BTreeMap<String, ContainerSnapshot>,
    pub events: Vec<SimulationEvent>,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct SessionSummary {
    pub total_ticks: u64,
    pub duration_s: f64,
    pub total_poured_ml: f64,
    pub ingredients_added: BTreeMap<String, f64>,
    pub shakes_completed: u32,
    pub drinks_served: Vec<ServeOutcome>,
    pub revenue: f64,
    pub tips: f64,
}

pub fn read_session_log(log_path: &str) -> Result<Vec<SessionFrame>, BarkeepError> {
    let mut reader = csv::Reader::from_path(log_path)
        .map_err(|e| BarkeepError::CsvError(log_path.to_string(), e))?;
    let mut frames = Vec::new();

    for result in reader.deserialize() {
        let record: LogEntry =
            result.map_err(|e| BarkeepError::CsvError(log_path.to_string(), e))?;
        frames.push(SessionFrame {
            tick: record.tick,
            elapsed_s: record.elapsed_s,
            step_id: record.step_id,
            containers: serde_json::from_str(&record.containers_json)?,
            events: serde_json::from_str(&record.events_json)?,
        });
    }

    Ok(frames)
}

pub fn summarize_session(log_path: &str) -> Result<SessionSummary, BarkeepError> {
    let frames = read_session_log(log_path)?;
    Ok(summarize_frames(&frames))
}

pub fn summarize_frames(frames: &[SessionFrame]) -> SessionSummary {
    let mut summary = SessionSummary::default();

    for frame in frames {
        summary.total_ticks = summary.total_ticks.max(frame.tick);
        summary.duration_s = summary.duration_s.max(frame.elapsed_s);

        for event in &frame.events {
            match event {
                SimulationEvent::PourTick { amount_ml, .. } => {
                    summary.total_poured_ml += amount_ml;
                }
                SimulationEvent::IngredientAdded {
                    ingredient_id,
                    amount_ml,
                    ..
                } => {
                    *summary
                        .ingredients_added
                        .entry(ingredient_id.clone())
                        .or_insert(0.0) += amount_ml;
                }
                SimulationEvent::ShakeComplete { .. } => summary.shakes_completed += 1,
                SimulationEvent::DrinkServed { outcome, .. } => {
                    summary.revenue += outcome.payment;
                    summary.tips += outcome.tip;
                    summary.drinks_served.push(outcome.clone());
                }
                _ => {}
            }
        }
    }

    summary
}

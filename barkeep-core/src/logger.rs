use crate::{analysis::ContainerSnapshot, simulation::state::SimulationState};
use csv::Writer;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io;

#[derive(Debug, Serialize)]
struct LogEntry {
    tick: u64,
    elapsed_s: f64,
    step_id: String,
    containers_json: String,
    events_json: String,
}

pub struct TimeSeriesLogger {
    writer: Writer<fs::File>,
}

impl TimeSeriesLogger {
    pub fn new(path: &str) -> Result<Self, io::Error> {
        let writer = Writer::from_path(path)?;
        Ok(Self { writer })
    }

    pub fn log_state(&mut self, state: &SimulationState, step_id: &str) -> Result<(), anyhow::Error> {
        let containers: BTreeMap<&str, ContainerSnapshot> = state
            .containers
            .iter()
            .map(|(id, container)| (id.as_str(), ContainerSnapshot::from_container(container)))
            .collect();

        let entry = LogEntry {
            tick: state.tick,
            elapsed_s: state.elapsed_s,
            step_id: step_id.to_string(),
            containers_json: serde_json::to_string(&containers)?,
            events_json: serde_json::to_string(&state.events)?,
        };

        self.writer.serialize(entry)?;
        self.writer.flush()?;
        Ok(())
    }
}

use crate::{command::Command, condition::Condition, container::ContainerSpawn};
use serde::{Deserialize, Serialize};

/// One stage of a scripted session: commands run on entry, then frames advance until
/// `until` holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Step {
    pub step_id: String,
    #[serde(default)]
    pub on_enter: Vec<Command>,
    pub until: Condition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Scenario {
    pub scenario_id: String,
    pub scenario_name: String,
    pub notes: Option<String>,
    #[serde(default)]
    pub containers: Vec<ContainerSpawn>,
    pub steps: Vec<Step>,
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    Glass,
    Shaker,
    MixingGlass,
    Bottle,
    Jigger,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialFill {
    pub liquor_id: String,
    pub amount_ml: f64,
}

/// Static description of a vessel the bar can spawn.
///
/// A bottle is an ordinary container with an initial fill; pouring from it uses the
/// same proportional transfer as pouring from a shaker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerDefinition {
    /// A unique, machine-readable identifier (e.g. "COUPE-GLASS").
    pub definition_id: String,
    pub display_name: Option<String>,
    pub kind: ContainerKind,
    pub max_volume_ml: f64,
    /// Starting temperature; room temperature when absent.
    pub initial_temperature_c: Option<f64>,
    #[serde(default)]
    pub initial_fill: Vec<InitialFill>,
}

/// Places one instance of a definition into a running simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerSpawn {
    pub container_id: String,
    pub definition_id: String,
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    SpawnContainer {
        container_id: String,
        definition_id: String,
    },
    AddLiquor {
        container_id: String,
        liquor_id: String,
        amount_ml: f64,
    },
    AddIce {
        container_id: String,
        cubes: u32,
    },
    StartPour {
        source_id: String,
        target_id: String,
        rate_ml_per_s: f64,
    },
    StopPour {
        source_id: String,
    },
    StartShake {
        container_id: String,
    },
    ShakePress {
        container_id: String,
    },
    StopShake {
        container_id: String,
    },
    Stir {
        container_id: String,
    },
    SetTemperature {
        container_id: String,
        celsius: f64,
    },
    Clear {
        container_id: String,
    },
    Serve {
        container_id: String,
        order_recipe_id: Option<String>,
    },
}

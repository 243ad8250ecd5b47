use crate::color::Rgba;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiquorCategory {
    Spirit,
    Liqueur,
    Wine,
    Mixer,
    Juice,
    Syrup,
    Water,
}

/// A pourable liquid the bar stocks. Mixers and juices are liquors with zero ABV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Liquor {
    /// Canonical ingredient id used by recipes (e.g. "gin").
    pub liquor_id: String,
    /// Label shown to the player (e.g. "London Dry Gin").
    pub display_name: String,
    pub category: LiquorCategory,
    pub color: Rgba,
    /// Alcohol by volume, in percent.
    #[serde(default)]
    pub abv: f64,
    pub description: Option<String>,
}

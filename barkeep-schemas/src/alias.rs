use serde::{Deserialize, Serialize};

/// Maps an alternative ingredient name onto its canonical id
/// (e.g. "dry_vermouth" -> "vermouth").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientAlias {
    pub alias: String,
    pub canonical_id: String,
}

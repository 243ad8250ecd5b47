use crate::{
    alias::IngredientAlias, container::ContainerDefinition, liquor::Liquor, recipe::Recipe,
    scenario::Scenario,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct LiquorFile {
    pub schema_version: String,
    pub liquors: Vec<Liquor>,
}

#[derive(Debug, Deserialize)]
pub struct RecipeFile {
    pub schema_version: String,
    pub recipes: Vec<Recipe>,
}

#[derive(Debug, Deserialize)]
pub struct AliasFile {
    pub schema_version: String,
    pub aliases: Vec<IngredientAlias>,
}

#[derive(Debug, Deserialize)]
pub struct ContainerFile {
    pub schema_version: String,
    pub containers: Vec<ContainerDefinition>,
}

#[derive(Debug, Deserialize)]
pub struct ScenarioFile {
    pub schema_version: String,
    pub scenarios: Vec<Scenario>,
}

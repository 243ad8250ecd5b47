use crate::{
    catalog::{BarContext, IngredientAliases, LiquorDatabase, RecipeBook},
    error::BarkeepError,
    logger::TimeSeriesLogger,
    shake::DEFAULT_SHAKE_SECONDS,
    simulation::{engine::SimulationEngine, state::SimulationState},
};
use barkeep_schemas::{
    alias::IngredientAlias,
    container::{ContainerDefinition, ContainerSpawn},
    liquor::Liquor,
    recipe::Recipe,
    scenario::Scenario,
};
use std::collections::HashMap;

pub const DEFAULT_MAX_TICKS: u64 = 100_000;

/// A fluent builder for constructing a `SimulationEngine`.
///
/// Reference data (liquors, recipes, aliases, container definitions) is handed in
/// explicitly; nothing is looked up from global state.
#[derive(Default)]
pub struct SimulationBuilder {
    liquors: Vec<Liquor>,
    recipes: Vec<Recipe>,
    aliases: Vec<IngredientAlias>,
    context: Option<BarContext>,
    definitions: Vec<ContainerDefinition>,
    containers: Vec<ContainerSpawn>,
    scenario: Option<Scenario>,
    log_path: Option<String>,
    max_ticks: Option<u64>,
    shake_seconds: Option<f64>,
}

impl SimulationBuilder {
    /// Creates a new, empty `SimulationBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the liquors that can be poured and looked up by id.
    pub fn with_liquors(mut self, liquors: Vec<Liquor>) -> Self {
        self.liquors = liquors;
        self
    }

    /// Sets the recipes the matcher recognizes.
    pub fn with_recipes(mut self, recipes: Vec<Recipe>) -> Self {
        self.recipes = recipes;
        self
    }

    /// Sets the ingredient aliases folded onto canonical ids before matching.
    pub fn with_aliases(mut self, aliases: Vec<IngredientAlias>) -> Self {
        self.aliases = aliases;
        self
    }

    /// Uses a prepared context; takes precedence over `with_liquors`, `with_recipes`
    /// and `with_aliases`.
    pub fn with_context(mut self, context: BarContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Sets the container definitions that spawns refer to.
    pub fn with_container_definitions(mut self, definitions: Vec<ContainerDefinition>) -> Self {
        self.definitions = definitions;
        self
    }

    /// Containers to spawn in addition to the scenario's own.
    pub fn with_containers(mut self, containers: Vec<ContainerSpawn>) -> Self {
        self.containers = containers;
        self
    }

    /// Sets the scripted scenario driven by `run` and `tick`.
    pub fn with_scenario(mut self, scenario: Scenario) -> Self {
        self.scenario = Some(scenario);
        self
    }

    /// Configures the simulation to write time-series data to the specified CSV file.
    pub fn with_timeseries_logging_to_file(mut self, path: &str) -> Self {
        self.log_path = Some(path.to_string());
        self
    }

    /// Sets the tick limit after which a scenario fails with `ScenarioTimeout`.
    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = Some(max_ticks);
        self
    }

    /// Sets how many seconds of shaking complete the shake minigame.
    pub fn with_shake_duration(mut self, seconds: f64) -> Self {
        self.shake_seconds = Some(seconds);
        self
    }

    /// Consumes the builder and returns a `SimulationEngine` with every scenario
    /// container spawned.
    ///
    /// # Errors
    ///
    /// Returns a `BarkeepError` if a container definition is invalid, a spawn refers to
    /// an unknown definition or liquor, or the log file cannot be created.
    pub fn build(self) -> Result<SimulationEngine, BarkeepError> {
        let mut definitions = HashMap::new();
        for definition in self.definitions {
            if !(definition.max_volume_ml > 0.0) {
                return Err(BarkeepError::ConfigError(format!(
                    "Container definition '{}' must have a positive max_volume_ml",
                    definition.definition_id
                )));
            }
            definitions.insert(definition.definition_id.clone(), definition);
        }

        let context = match self.context {
            Some(context) => context,
            None => BarContext::new(
                LiquorDatabase::new(self.liquors),
                RecipeBook::new(self.recipes),
                IngredientAliases::new(self.aliases),
            ),
        };

        let scenario = self.scenario.unwrap_or_else(|| Scenario {
            scenario_id: "interactive".to_string(),
            scenario_name: "Interactive session".to_string(),
            notes: None,
            containers: Vec::new(),
            steps: Vec::new(),
        });

        let logger = match self.log_path {
            Some(path) => Some(
                TimeSeriesLogger::new(&path).map_err(|e| BarkeepError::FileIO(path.clone(), e))?,
            ),
            None => None,
        };

        let spawns: Vec<ContainerSpawn> = scenario
            .containers
            .iter()
            .cloned()
            .chain(self.containers)
            .collect();

        let mut engine = SimulationEngine {
            state: SimulationState::new(),
            context,
            definitions,
            scenario,
            current_step_index: 0,
            step_entered: false,
            max_ticks: self.max_ticks.unwrap_or(DEFAULT_MAX_TICKS),
            shake_seconds: self.shake_seconds.unwrap_or(DEFAULT_SHAKE_SECONDS),
            logger,
        };

        for spawn in spawns {
            engine.spawn_container(&spawn.container_id, &spawn.definition_id)?;
        }
        engine.state.events.clear();

        Ok(engine)
    }
}

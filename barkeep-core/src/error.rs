use thiserror::Error;

#[derive(Debug, Error)]
pub enum BarkeepError {
    #[error("Container '{0}' not found in simulation state")]
    ContainerNotFound(String),

    #[error("Container definition for '{0}' not found")]
    ContainerDefinitionNotFound(String),

    #[error("Container '{0}' already exists")]
    DuplicateContainer(String),

    #[error("Liquor '{0}' not found in the liquor database")]
    LiquorNotFound(String),

    #[error("Recipe '{0}' not found in the recipe book")]
    RecipeNotFound(String),

    #[error("Cannot pour container '{0}' into itself")]
    SelfTransfer(String),

    #[error("Container '{0}' cannot be shaken; only shakers and mixing glasses can")]
    NotShakeable(String),

    #[error("Scenario '{0}' did not finish within {1} ticks")]
    ScenarioTimeout(String, u64),

    #[error("Time step must be finite and positive, got {0}")]
    InvalidTimeStep(f64),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error for file '{0}': {1}")]
    FileIO(String, #[source] std::io::Error),

    #[error("Failed to parse YAML from '{0}': {1}")]
    YamlParsing(String, #[source] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("Failed to process CSV file '{0}': {1}")]
    CsvError(String, #[source] csv::Error),

    #[error("An error occurred during logging: {0}")]
    LoggingError(#[from] anyhow::Error),
}

use crate::error::BarkeepError;
use barkeep_schemas::{file_formats::ScenarioFile, scenario::Scenario};
use std::fs;

pub fn load_scenarios(path: &str) -> Result<Vec<Scenario>, BarkeepError> {
    let content = fs::read_to_string(path).map_err(|e| BarkeepError::FileIO(path.to_string(), e))?;
    parse_scenarios(path, &content)
}

pub fn parse_scenarios(source: &str, content: &str) -> Result<Vec<Scenario>, BarkeepError> {
    let file: ScenarioFile = serde_yaml::from_str(content)
        .map_err(|e| BarkeepError::YamlParsing(source.to_string(), e))?;
    Ok(file.scenarios)
}

/// Picks `scenario_id` out of `scenarios`, or the first one when no id is given.
pub fn select_scenario(scenarios: Vec<Scenario>, scenario_id: Option<&str>) -> Result<Scenario, BarkeepError> {
    match scenario_id {
        Some(id) => scenarios
            .into_iter()
            .find(|s| s.scenario_id == id)
            .ok_or_else(|| BarkeepError::ConfigError(format!("Scenario '{}' not found", id))),
        None => scenarios
            .into_iter()
            .next()
            .ok_or_else(|| BarkeepError::ConfigError("Scenario file contains no scenarios".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use barkeep_schemas::{command::Command, condition::Condition};

    const YAML: &str = r#"
schema_version: "1.0"
scenarios:
  - scenario_id: quick_pour
    scenario_name: Quick pour
    containers:
      - container_id: GLASS
        definition_id: ROCKS-GLASS
    steps:
      - step_id: add_gin
        on_enter:
          - type: add_liquor
            container_id: GLASS
            liquor_id: gin
            amount_ml: 50
        until:
          type: always
  - scenario_id: idle
    scenario_name: Idle
    steps:
      - step_id: wait
        until:
          type: time_in_step
          seconds: 1.5
"#;

    #[test]
    fn parses_scenario_yaml() {
        let scenarios = parse_scenarios("inline", YAML).unwrap();
        assert_eq!(scenarios.len(), 2);
        let first = &scenarios[0];
        assert_eq!(first.containers[0].definition_id, "ROCKS-GLASS");
        assert_eq!(
            first.steps[0].on_enter[0],
            Command::AddLiquor {
                container_id: "GLASS".to_string(),
                liquor_id: "gin".to_string(),
                amount_ml: 50.0,
            }
        );
        assert_eq!(first.steps[0].until, Condition::Always);
        assert!(scenarios[1].containers.is_empty());
    }

    #[test]
    fn selects_by_id_or_first() {
        let scenarios = parse_scenarios("inline", YAML).unwrap();
        assert_eq!(select_scenario(scenarios.clone(), None).unwrap().scenario_id, "quick_pour");
        assert_eq!(select_scenario(scenarios.clone(), Some("idle")).unwrap().scenario_id, "idle");
        assert!(matches!(
            select_scenario(scenarios, Some("missing")),
            Err(BarkeepError::ConfigError(_))
        ));
    }

    #[test]
    fn malformed_yaml_reports_its_source() {
        let err = parse_scenarios("broken.yaml", "scenarios: [").unwrap_err();
        assert!(err.to_string().contains("broken.yaml"));
    }
}

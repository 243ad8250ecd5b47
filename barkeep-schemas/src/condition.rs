use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOperator {
    LessThan,
    GreaterThan,
    EqualTo,
    NotEqualTo,
}

impl ComparisonOperator {
    pub fn compare(&self, current: f64, value: f64) -> bool {
        match self {
            ComparisonOperator::LessThan => current < value,
            ComparisonOperator::GreaterThan => current > value,
            ComparisonOperator::EqualTo => (current - value).abs() < f64::EPSILON,
            ComparisonOperator::NotEqualTo => (current - value).abs() >= f64::EPSILON,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerParameter {
    Volume,
    Temperature,
    Abv,
    Ice,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    Always,
    TimeInStep {
        seconds: f64,
    },
    ContainerValue {
        container_id: String,
        parameter: ContainerParameter,
        operator: ComparisonOperator,
        value: f64,
    },
    ContainerShaken {
        container_id: String,
    },
    PoursIdle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operators_compare_as_named() {
        assert!(ComparisonOperator::LessThan.compare(1.0, 2.0));
        assert!(ComparisonOperator::GreaterThan.compare(3.0, 2.0));
        assert!(ComparisonOperator::EqualTo.compare(2.0, 2.0));
        assert!(ComparisonOperator::NotEqualTo.compare(2.0, 2.5));
        assert!(!ComparisonOperator::GreaterThan.compare(2.0, 2.0));
    }

    #[test]
    fn condition_is_internally_tagged() {
        let json = r#"{"type":"container_value","container_id":"SHAKER","parameter":"volume","operator":"greater_than","value":59.5}"#;
        let condition: Condition = serde_json::from_str(json).unwrap();
        assert_eq!(
            condition,
            Condition::ContainerValue {
                container_id: "SHAKER".to_string(),
                parameter: ContainerParameter::Volume,
                operator: ComparisonOperator::GreaterThan,
                value: 59.5,
            }
        );
    }
}

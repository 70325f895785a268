use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{BreachDirection, Metric};

/// One violated threshold bound together with the observed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreachDescriptor {
    pub metric: Metric,
    pub value: f64,
    pub bound: f64,
    pub direction: BreachDirection,
}

impl std::fmt::Display for BreachDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {:.1}{} {} {:.1}{}",
            self.metric,
            self.value,
            self.metric.unit(),
            self.direction,
            self.bound,
            self.metric.unit()
        )
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn display_below_min() {
        let breach = BreachDescriptor {
            metric: Metric::Humidity,
            value: 20.0,
            bound: 30.0,
            direction: BreachDirection::BelowMin,
        };
        assert_eq!(breach.to_string(), "humidity 20.0% below minimum 30.0%");
    }

    #[test]
    fn display_above_max() {
        let breach = BreachDescriptor {
            metric: Metric::Temperature,
            value: 45.0,
            bound: 40.0,
            direction: BreachDirection::AboveMax,
        };
        assert_eq!(
            breach.to_string(),
            "temperature 45.0°C above maximum 40.0°C"
        );
    }

    #[test]
    fn serde_roundtrip() {
        let breach = BreachDescriptor {
            metric: Metric::Temperature,
            value: 45.0,
            bound: 40.0,
            direction: BreachDirection::AboveMax,
        };
        let json = serde_json::to_string(&breach).expect("serialize");
        let deserialized: BreachDescriptor = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(breach, deserialized);
    }
}

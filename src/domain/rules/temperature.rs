use crate::domain::entities::breach::BreachDescriptor;
use crate::domain::entities::device::DeviceThresholds;
use crate::domain::entities::reading::Reading;
use crate::domain::value_objects::{BreachDirection, Metric};

use super::Rule;

pub struct TemperatureMinRule;

impl Rule for TemperatureMinRule {
    fn name(&self) -> &'static str {
        "temp_min"
    }

    fn evaluate(
        &self,
        reading: &Reading,
        thresholds: &DeviceThresholds,
    ) -> Option<BreachDescriptor> {
        let bound = thresholds.temp_min?;
        (reading.temperature < bound).then(|| BreachDescriptor {
            metric: Metric::Temperature,
            value: reading.temperature,
            bound,
            direction: BreachDirection::BelowMin,
        })
    }
}

pub struct TemperatureMaxRule;

impl Rule for TemperatureMaxRule {
    fn name(&self) -> &'static str {
        "temp_max"
    }

    fn evaluate(
        &self,
        reading: &Reading,
        thresholds: &DeviceThresholds,
    ) -> Option<BreachDescriptor> {
        let bound = thresholds.temp_max?;
        (reading.temperature > bound).then(|| BreachDescriptor {
            metric: Metric::Temperature,
            value: reading.temperature,
            bound,
            direction: BreachDirection::AboveMax,
        })
    }
}

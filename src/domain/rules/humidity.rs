use crate::domain::entities::breach::BreachDescriptor;
use crate::domain::entities::device::DeviceThresholds;
use crate::domain::entities::reading::Reading;
use crate::domain::value_objects::{BreachDirection, Metric};

use super::Rule;

pub struct HumidityMinRule;

impl Rule for HumidityMinRule {
    fn name(&self) -> &'static str {
        "hum_min"
    }

    fn evaluate(
        &self,
        reading: &Reading,
        thresholds: &DeviceThresholds,
    ) -> Option<BreachDescriptor> {
        let bound = thresholds.hum_min?;
        (reading.humidity < bound).then(|| BreachDescriptor {
            metric: Metric::Humidity,
            value: reading.humidity,
            bound,
            direction: BreachDirection::BelowMin,
        })
    }
}

pub struct HumidityMaxRule;

impl Rule for HumidityMaxRule {
    fn name(&self) -> &'static str {
        "hum_max"
    }

    fn evaluate(
        &self,
        reading: &Reading,
        thresholds: &DeviceThresholds,
    ) -> Option<BreachDescriptor> {
        let bound = thresholds.hum_max?;
        (reading.humidity > bound).then(|| BreachDescriptor {
            metric: Metric::Humidity,
            value: reading.humidity,
            bound,
            direction: BreachDirection::AboveMax,
        })
    }
}

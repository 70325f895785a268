pub mod humidity;
pub mod temperature;

use crate::domain::entities::breach::BreachDescriptor;
use crate::domain::entities::device::DeviceThresholds;
use crate::domain::entities::reading::Reading;

/// A deterministic threshold check over a single reading.
/// Rules are pure functions: reading + thresholds in, at most one breach
/// out. No I/O.
pub trait Rule: Send + Sync {
    /// Returns the unique name of this rule
    fn name(&self) -> &'static str;

    /// Evaluates the rule against a reading using the device's thresholds
    fn evaluate(
        &self,
        reading: &Reading,
        thresholds: &DeviceThresholds,
    ) -> Option<BreachDescriptor>;
}

/// Returns the default bound checks in their fixed evaluation order:
/// `hum_min`, `hum_max`, `temp_min`, `temp_max`.
#[must_use]
pub fn default_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(humidity::HumidityMinRule),
        Box::new(humidity::HumidityMaxRule),
        Box::new(temperature::TemperatureMinRule),
        Box::new(temperature::TemperatureMaxRule),
    ]
}

/// Engine that runs a collection of rules against readings
pub struct RuleEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleEngine {
    #[must_use]
    pub fn new(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    /// Evaluates every rule in registration order with no short-circuit;
    /// the returned descriptors preserve that order.
    #[must_use]
    pub fn evaluate(
        &self,
        reading: &Reading,
        thresholds: &DeviceThresholds,
    ) -> Vec<BreachDescriptor> {
        self.rules
            .iter()
            .filter_map(|rule| rule.evaluate(reading, thresholds))
            .collect()
    }
}

use serde::{Deserialize, Serialize};

/// Measured quantity carried by a reading
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Humidity,
    Temperature,
}

impl Metric {
    /// Unit suffix used when rendering values for humans.
    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Humidity => "%",
            Self::Temperature => "\u{b0}C",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Humidity => write!(f, "humidity"),
            Self::Temperature => write!(f, "temperature"),
        }
    }
}

/// Which side of a configured bound a value fell on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BreachDirection {
    BelowMin,
    AboveMax,
}

impl std::fmt::Display for BreachDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BelowMin => write!(f, "below minimum"),
            Self::AboveMax => write!(f, "above maximum"),
        }
    }
}

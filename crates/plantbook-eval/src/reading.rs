//! Sensor readings decoded from a `current_conditions` argument object.

use serde_json::{Map, Value};
use thiserror::Error;

/// Keys recognised in a `current_conditions` object, in evaluation order
pub const READING_KEYS: [&str; 4] = ["moisture", "temperature", "light_lux", "humidity"];

/// Sparse set of current sensor values. Any subset may be present.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorReading {
    /// Soil moisture, percent
    pub moisture: Option<f64>,
    /// Air temperature, °C
    pub temperature: Option<f64>,
    /// Light level, lux
    pub light_lux: Option<f64>,
    /// Ambient humidity, percent
    pub humidity: Option<f64>,
}

#[derive(Debug, Error, PartialEq)]
pub enum ReadingError {
    #[error("non-numeric value for {}", .0.join(", "))]
    NonNumeric(Vec<String>),
}

impl SensorReading {
    /// Decode leniently: a key whose value is not a JSON number is treated
    /// as absent. Unknown keys are ignored.
    pub fn from_json(conditions: &Map<String, Value>) -> Self {
        let number = |key: &str| conditions.get(key).and_then(Value::as_f64);
        Self {
            moisture: number("moisture"),
            temperature: number("temperature"),
            light_lux: number("light_lux"),
            humidity: number("humidity"),
        }
    }

    /// Decode strictly: a known key present with a non-numeric value is an
    /// error. `null` still counts as absent.
    pub fn from_json_strict(conditions: &Map<String, Value>) -> Result<Self, ReadingError> {
        let invalid: Vec<String> = READING_KEYS
            .iter()
            .filter(|key| {
                conditions
                    .get(**key)
                    .is_some_and(|v| !v.is_null() && !v.is_number())
            })
            .map(|key| key.to_string())
            .collect();

        if invalid.is_empty() {
            Ok(Self::from_json(conditions))
        } else {
            Err(ReadingError::NonNumeric(invalid))
        }
    }

    pub fn is_empty(&self) -> bool {
        self.moisture.is_none()
            && self.temperature.is_none()
            && self.light_lux.is_none()
            && self.humidity.is_none()
    }
}

//! Human-readable care summary.
//!
//! Sections appear in a fixed order (light, temperature, humidity, soil
//! moisture, conductivity, image) and each is omitted when the record has
//! no upper bound for it.

use std::fmt::Write;

use plantbook_core::types::PlantDetails;

use crate::levels::{light_level, moisture_level};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn from_metric_flag(metric: bool) -> Self {
        if metric {
            UnitSystem::Metric
        } else {
            UnitSystem::Imperial
        }
    }

    fn temperature_unit(self) -> &'static str {
        match self {
            UnitSystem::Metric => "°C",
            UnitSystem::Imperial => "°F",
        }
    }

    fn temperature(self, celsius: f64) -> f64 {
        match self {
            UnitSystem::Metric => celsius,
            UnitSystem::Imperial => celsius_to_fahrenheit(celsius),
        }
    }
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

pub fn render_care_summary(details: &PlantDetails, units: UnitSystem) -> String {
    let ranges = details.care_ranges();
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = write!(out, "# {} ({})\n\n", details.alias, details.display_pid);
    let _ = write!(out, "Category: {}\n\n", details.category);
    out.push_str("## Care Requirements\n\n");

    if let Some(light) = ranges.light_lux {
        let _ = write!(
            out,
            "**Light**: {} - {} lux ({})\n\n",
            light.min,
            light.max,
            light_level(light)
        );
    }

    if let Some(temp) = ranges.temperature {
        let _ = write!(
            out,
            "**Temperature**: {:.1} - {:.1}{}\n\n",
            units.temperature(temp.min),
            units.temperature(temp.max),
            units.temperature_unit()
        );
    }

    if let Some(humidity) = ranges.humidity {
        let _ = write!(out, "**Humidity**: {} - {}%\n\n", humidity.min, humidity.max);
    }

    if let Some(moisture) = ranges.soil_moisture {
        let _ = write!(
            out,
            "**Soil Moisture**: {} - {}% ({})\n\n",
            moisture.min,
            moisture.max,
            moisture_level(moisture)
        );
    }

    if let Some(ec) = ranges.soil_ec {
        let _ = write!(out, "**Fertilizer (EC)**: {} - {} µS/cm\n\n", ec.min, ec.max);
    }

    if let Some(url) = details.image() {
        let _ = writeln!(out, "\n[Plant Image]({url})");
    }

    out
}

//! Sensor readings vs. ideal ranges.
//!
//! A dimension is evaluated only when the reading supplies it and the plant
//! record specifies an upper bound for it. Evaluation order is fixed:
//! moisture, temperature, light, humidity.

use std::fmt;

use plantbook_core::types::{Bounds, CareRanges, PlantDetails};

use crate::reading::SensorReading;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    SoilMoisture,
    Temperature,
    Light,
    Humidity,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::SoilMoisture,
        Dimension::Temperature,
        Dimension::Light,
        Dimension::Humidity,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Dimension::SoilMoisture => "Soil Moisture",
            Dimension::Temperature => "Temperature",
            Dimension::Light => "Light",
            Dimension::Humidity => "Humidity",
        }
    }

    fn value(self, v: f64) -> String {
        match self {
            Dimension::SoilMoisture | Dimension::Humidity => format!("{v:.1}%"),
            Dimension::Temperature => format!("{v:.1}°C"),
            Dimension::Light => format!("{v:.0} lux"),
        }
    }

    fn range(self, r: Bounds<f64>) -> String {
        match self {
            Dimension::SoilMoisture | Dimension::Humidity => {
                format!("{:.0}-{:.0}%", r.min, r.max)
            }
            Dimension::Temperature => format!("{:.1}-{:.1}°C", r.min, r.max),
            Dimension::Light => format!("{:.0}-{:.0} lux", r.min, r.max),
        }
    }

    fn current(self, reading: &SensorReading) -> Option<f64> {
        match self {
            Dimension::SoilMoisture => reading.moisture,
            Dimension::Temperature => reading.temperature,
            Dimension::Light => reading.light_lux,
            Dimension::Humidity => reading.humidity,
        }
    }

    fn ideal(self, ranges: &CareRanges) -> Option<Bounds<f64>> {
        match self {
            Dimension::SoilMoisture => ranges.soil_moisture.map(|b| b.as_f64()),
            Dimension::Temperature => ranges.temperature,
            Dimension::Light => ranges.light_lux.map(|b| b.as_f64()),
            Dimension::Humidity => ranges.humidity.map(|b| b.as_f64()),
        }
    }
}

/// Classification of one reading against its range. `delta` is always the
/// positive distance to the violated bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    TooLow { delta: f64 },
    Within,
    TooHigh { delta: f64 },
}

impl Verdict {
    pub fn classify(current: f64, range: Bounds<f64>) -> Self {
        if current < range.min {
            Verdict::TooLow {
                delta: range.min - current,
            }
        } else if current > range.max {
            Verdict::TooHigh {
                delta: current - range.max,
            }
        } else {
            Verdict::Within
        }
    }

    pub fn is_issue(&self) -> bool {
        !matches!(self, Verdict::Within)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimensionVerdict {
    pub dimension: Dimension,
    pub current: f64,
    pub range: Bounds<f64>,
    pub verdict: Verdict,
}

impl fmt::Display for DimensionVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = self.dimension;
        let current = d.value(self.current);
        let range = d.range(self.range);
        match self.verdict {
            Verdict::TooLow { delta } => write!(
                f,
                "❌ **{} Too Low**: Current {current}, needs {range} ({} below minimum)",
                d.label(),
                d.value(delta)
            ),
            Verdict::TooHigh { delta } => write!(
                f,
                "❌ **{} Too High**: Current {current}, needs {range} ({} above maximum)",
                d.label(),
                d.value(delta)
            ),
            Verdict::Within => write!(
                f,
                "✅ **{}**: {current} (within {range} range)",
                d.label()
            ),
        }
    }
}

/// Outcome of comparing one reading against one plant's ranges
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionReport {
    pub plant: String,
    pub verdicts: Vec<DimensionVerdict>,
}

impl ConditionReport {
    pub fn issues(&self) -> impl Iterator<Item = &DimensionVerdict> {
        self.verdicts.iter().filter(|v| v.verdict.is_issue())
    }

    pub fn within(&self) -> impl Iterator<Item = &DimensionVerdict> {
        self.verdicts.iter().filter(|v| !v.verdict.is_issue())
    }

    pub fn issue_count(&self) -> usize {
        self.issues().count()
    }
}

impl fmt::Display for ConditionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "# Condition Analysis for {}\n\n", self.plant)?;

        let issues = self.issue_count();
        let within = self.verdicts.len() - issues;

        if issues > 0 {
            f.write_str("## Issues Detected\n\n")?;
            for line in self.issues() {
                write!(f, "{line}\n\n")?;
            }
        }

        if within > 0 {
            f.write_str("## Conditions Within Range\n\n")?;
            for line in self.within() {
                write!(f, "{line}\n\n")?;
            }
        }

        if self.verdicts.is_empty() {
            f.write_str("No conditions were provided for comparison.\n")?;
        } else if issues == 0 {
            f.write_str("\n**Summary**: All monitored conditions are within ideal ranges! 🌱\n")?;
        } else {
            write!(f, "\n**Summary**: {issues} condition(s) need attention.\n")?;
        }

        Ok(())
    }
}

pub fn compare_conditions(details: &PlantDetails, reading: &SensorReading) -> ConditionReport {
    let ranges = details.care_ranges();
    let verdicts = Dimension::ALL
        .iter()
        .filter_map(|&dimension| {
            let current = dimension.current(reading)?;
            let range = dimension.ideal(&ranges)?;
            Some(DimensionVerdict {
                dimension,
                current,
                range,
                verdict: Verdict::classify(current, range),
            })
        })
        .collect();

    ConditionReport {
        plant: details.alias.clone(),
        verdicts,
    }
}

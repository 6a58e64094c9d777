use serde::{Deserialize, Serialize};

/// One hit from a plant name search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantSearchResult {
    /// Plant identifier, used as the key for detail lookups
    pub pid: String,
    #[serde(default)]
    pub display_pid: String,
    #[serde(default)]
    pub alias: String,
    #[serde(default)]
    pub category: String,
}

/// Paged search response as returned by the upstream API
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub results: Vec<PlantSearchResult>,
}

/// Full care record for one plant.
///
/// Bounds are optional because the upstream API returns `null` for
/// dimensions it has no data on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantDetails {
    pub pid: String,
    pub display_pid: String,
    pub alias: String,
    pub category: String,
    pub max_light_lux: Option<i64>,
    pub min_light_lux: Option<i64>,
    pub max_temp: Option<f64>,
    pub min_temp: Option<f64>,
    pub max_env_humid: Option<i64>,
    pub min_env_humid: Option<i64>,
    pub max_soil_moist: Option<i64>,
    pub min_soil_moist: Option<i64>,
    pub max_soil_ec: Option<i64>,
    pub min_soil_ec: Option<i64>,
    pub image_url: Option<String>,
}

/// Inclusive ideal range for a single dimension
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
}

impl Bounds<i64> {
    /// A dimension counts as specified only when its upper bound is positive.
    pub fn specified(min: Option<i64>, max: Option<i64>) -> Option<Self> {
        match max {
            Some(max) if max > 0 => Some(Self {
                min: min.unwrap_or(0),
                max,
            }),
            _ => None,
        }
    }

    /// Integer-truncated average of the two bounds
    pub fn midpoint(&self) -> i64 {
        (self.min + self.max) / 2
    }

    pub fn as_f64(&self) -> Bounds<f64> {
        Bounds {
            min: self.min as f64,
            max: self.max as f64,
        }
    }
}

impl Bounds<f64> {
    pub fn specified(min: Option<f64>, max: Option<f64>) -> Option<Self> {
        match max {
            Some(max) if max > 0.0 => Some(Self {
                min: min.unwrap_or(0.0),
                max,
            }),
            _ => None,
        }
    }
}

/// The ideal-range snapshot for one plant, with unspecified dimensions
/// already filtered out.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CareRanges {
    pub light_lux: Option<Bounds<i64>>,
    pub temperature: Option<Bounds<f64>>,
    pub humidity: Option<Bounds<i64>>,
    pub soil_moisture: Option<Bounds<i64>>,
    pub soil_ec: Option<Bounds<i64>>,
}

impl PlantDetails {
    pub fn care_ranges(&self) -> CareRanges {
        CareRanges {
            light_lux: Bounds::<i64>::specified(self.min_light_lux, self.max_light_lux),
            temperature: Bounds::<f64>::specified(self.min_temp, self.max_temp),
            humidity: Bounds::<i64>::specified(self.min_env_humid, self.max_env_humid),
            soil_moisture: Bounds::<i64>::specified(self.min_soil_moist, self.max_soil_moist),
            soil_ec: Bounds::<i64>::specified(self.min_soil_ec, self.max_soil_ec),
        }
    }

    /// Image reference, if the record carries a non-empty one
    pub fn image(&self) -> Option<&str> {
        self.image_url.as_deref().filter(|url| !url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_max_is_unspecified() {
        assert_eq!(Bounds::<i64>::specified(Some(10), Some(0)), None);
        assert_eq!(Bounds::<i64>::specified(Some(10), None), None);
        assert_eq!(Bounds::<f64>::specified(Some(5.0), Some(0.0)), None);
        assert_eq!(
            Bounds::<i64>::specified(None, Some(40)),
            Some(Bounds { min: 0, max: 40 })
        );
    }

    #[test]
    fn test_midpoint_truncates() {
        assert_eq!(Bounds::<i64> { min: 1999, max: 2000 }.midpoint(), 1999);
        assert_eq!(Bounds::<i64> { min: 25, max: 60 }.midpoint(), 42);
    }

    #[test]
    fn test_parse_detail_with_nulls() {
        let json = r#"{
            "pid": "monstera deliciosa",
            "display_pid": "Monstera deliciosa",
            "alias": "monstera deliciosa",
            "category": "Araceae, Monstera",
            "max_light_lux": 30000,
            "min_light_lux": 1500,
            "max_temp": 32,
            "min_temp": 12,
            "max_env_humid": null,
            "min_env_humid": 30,
            "max_soil_moist": 60,
            "min_soil_moist": 15,
            "image_url": ""
        }"#;
        let details: PlantDetails = serde_json::from_str(json).unwrap();
        let ranges = details.care_ranges();

        assert_eq!(ranges.light_lux, Some(Bounds { min: 1500, max: 30000 }));
        assert_eq!(ranges.temperature, Some(Bounds { min: 12.0, max: 32.0 }));
        assert_eq!(ranges.humidity, None);
        assert_eq!(ranges.soil_ec, None);
        assert_eq!(details.image(), None);
    }

    #[test]
    fn test_parse_search_page() {
        let json = r#"{
            "count": 1,
            "next": null,
            "previous": null,
            "results": [
                {"pid": "ocimum basilicum", "display_pid": "Ocimum basilicum",
                 "alias": "basil", "category": "Lamiaceae, Ocimum"}
            ]
        }"#;
        let page: SearchPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.count, 1);
        assert_eq!(page.results[0].alias, "basil");
    }
}

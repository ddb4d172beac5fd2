use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// One location's current weather snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub city_name: String,
    /// `None` when the provider sent something that is not a finite number.
    pub temperature_celsius: Option<f64>,
    pub condition_description: String,
    /// Local sunrise, `HH:MM` 24-hour.
    pub sunrise: String,
    /// Local sunset, `HH:MM` 24-hour.
    pub sunset: String,
}

/// A point to query the provider for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(label: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self { label: label.into(), latitude, longitude }
    }

    /// The ten cities the dashboard shows out of the box.
    pub fn defaults() -> Vec<Location> {
        vec![
            Location::new("New York", 40.7128, -74.0060),
            Location::new("Los Angeles", 34.052235, -118.243683),
            Location::new("Moscow", 55.7558, 37.6173),
            Location::new("Paris", 48.8566, 2.3522),
            Location::new("Barcelona", 41.390205, 2.154007),
            Location::new("Val d'Isère", 45.2859, 6.5848),
            Location::new("Bangkok", 13.7563, 100.5018),
            Location::new("Melbourne", -37.8136, 144.9631),
            Location::new("Santo Domingo", 18.50012, -69.98857),
            Location::new("London", 51.5072, -0.1276),
        ]
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.4}, {:.4})", self.label, self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub const fn all() -> &'static [TemperatureUnit] {
        &[TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit]
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemperatureUnit::Celsius => f.write_str("Celsius"),
            TemperatureUnit::Fahrenheit => f.write_str("Fahrenheit"),
        }
    }
}

/// Which sun times a card shows. Does not filter records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SunTimeSelection {
    #[default]
    All,
    Sunrise,
    Sunset,
}

impl SunTimeSelection {
    pub const fn all() -> &'static [SunTimeSelection] {
        &[SunTimeSelection::All, SunTimeSelection::Sunrise, SunTimeSelection::Sunset]
    }

    pub fn shows_sunrise(self) -> bool {
        matches!(self, SunTimeSelection::All | SunTimeSelection::Sunrise)
    }

    pub fn shows_sunset(self) -> bool {
        matches!(self, SunTimeSelection::All | SunTimeSelection::Sunset)
    }
}

impl fmt::Display for SunTimeSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SunTimeSelection::All => f.write_str("All"),
            SunTimeSelection::Sunrise => f.write_str("Sunrise"),
            SunTimeSelection::Sunset => f.write_str("Sunset"),
        }
    }
}

/// Condition keywords offered by the dashboard's condition picker.
/// The empty keyword means "All".
pub const CONDITION_PRESETS: &[&str] = &["", "Clear", "Clouds", "Rain", "Snow"];

/// Current user-selected filter and display preferences.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub search_text: String,
    pub condition_keyword: String,
    pub temperature_unit: TemperatureUnit,
    pub sun_time: SunTimeSelection,
}

impl FilterCriteria {
    pub fn with_search(mut self, search_text: impl Into<String>) -> Self {
        self.search_text = search_text.into();
        self
    }

    pub fn with_condition(mut self, keyword: impl Into<String>) -> Self {
        self.condition_keyword = keyword.into();
        self
    }

    pub fn with_unit(mut self, unit: TemperatureUnit) -> Self {
        self.temperature_unit = unit;
        self
    }

    pub fn with_sun_time(mut self, sun_time: SunTimeSelection) -> Self {
        self.sun_time = sun_time;
        self
    }
}

/// Accepts a JSON number or a numeric string; anything else becomes `None`.
pub(crate) fn lenient_temperature<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(parsed.filter(|t| t.is_finite()))
}

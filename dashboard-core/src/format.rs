//! Display formatting for temperatures and sun times.

use chrono::NaiveTime;

use crate::{error::DashboardError, model::TemperatureUnit};

pub fn to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// `0.0` -> `"32.00°F"`.
pub fn celsius_to_fahrenheit(celsius: f64) -> String {
    format!("{:.2}°F", to_fahrenheit(celsius))
}

pub fn format_celsius(celsius: f64) -> String {
    format!("{celsius:.2}°C")
}

/// Render a temperature in the requested unit; absent values show as `n/a`.
pub fn format_temperature(celsius: Option<f64>, unit: TemperatureUnit) -> String {
    match (celsius, unit) {
        (None, _) => "n/a".to_string(),
        (Some(c), TemperatureUnit::Celsius) => format_celsius(c),
        (Some(c), TemperatureUnit::Fahrenheit) => celsius_to_fahrenheit(c),
    }
}

/// Convert `HH:MM` (24-hour) to `H:MM AM|PM`. No timezone shift is applied.
pub fn format_twelve_hour(time24: &str) -> Result<String, DashboardError> {
    let time = NaiveTime::parse_from_str(time24.trim(), "%H:%M")
        .map_err(|_| DashboardError::InvalidTime(time24.to_string()))?;

    Ok(time.format("%-I:%M %p").to_string())
}

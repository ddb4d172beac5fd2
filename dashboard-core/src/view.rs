use serde::Serialize;

use crate::{
    format::{format_temperature, format_twelve_hour},
    model::{FilterCriteria, WeatherRecord},
};

/// Display-ready strings for one record under the current criteria.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub city: String,
    pub temperature: String,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
    pub condition: String,
}

impl Card {
    pub fn from_record(record: &WeatherRecord, criteria: &FilterCriteria) -> Self {
        let sun_time = criteria.sun_time;

        Self {
            city: record.city_name.clone(),
            temperature: format_temperature(record.temperature_celsius, criteria.temperature_unit),
            sunrise: sun_time.shows_sunrise().then(|| display_time(&record.city_name, &record.sunrise)),
            sunset: sun_time.shows_sunset().then(|| display_time(&record.city_name, &record.sunset)),
            condition: record.condition_description.clone(),
        }
    }
}

pub fn cards(records: &[WeatherRecord], criteria: &FilterCriteria) -> Vec<Card> {
    records.iter().map(|r| Card::from_record(r, criteria)).collect()
}

fn display_time(city: &str, raw: &str) -> String {
    format_twelve_hour(raw).unwrap_or_else(|err| {
        tracing::warn!(%city, "{err}");
        raw.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SunTimeSelection, TemperatureUnit};

    fn london() -> WeatherRecord {
        WeatherRecord {
            city_name: "London".to_string(),
            temperature_celsius: Some(12.0),
            condition_description: "Overcast clouds".to_string(),
            sunrise: "06:48".to_string(),
            sunset: "17:55".to_string(),
        }
    }

    #[test]
    fn default_card_shows_both_sun_times_in_celsius() {
        let card = Card::from_record(&london(), &FilterCriteria::default());

        assert_eq!(card.city, "London");
        assert_eq!(card.temperature, "12.00°C");
        assert_eq!(card.sunrise.as_deref(), Some("6:48 AM"));
        assert_eq!(card.sunset.as_deref(), Some("5:55 PM"));
        assert_eq!(card.condition, "Overcast clouds");
    }

    #[test]
    fn unit_and_sun_time_switch_display() {
        let criteria = FilterCriteria::default()
            .with_unit(TemperatureUnit::Fahrenheit)
            .with_sun_time(SunTimeSelection::Sunset);
        let card = Card::from_record(&london(), &criteria);

        assert_eq!(card.temperature, "53.60°F");
        assert_eq!(card.sunrise, None);
        assert_eq!(card.sunset.as_deref(), Some("5:55 PM"));

        let card = Card::from_record(&london(), &criteria.with_sun_time(SunTimeSelection::Sunrise));
        assert_eq!(card.sunrise.as_deref(), Some("6:48 AM"));
        assert_eq!(card.sunset, None);
    }

    #[test]
    fn unparsable_time_is_shown_raw() {
        let mut record = london();
        record.sunrise = "--".to_string();

        let card = Card::from_record(&record, &FilterCriteria::default());
        assert_eq!(card.sunrise.as_deref(), Some("--"));
    }
}

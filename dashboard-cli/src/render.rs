use std::fmt::Write;

use chrono::Local;
use dashboard_core::{Card, DashboardState, FilterCriteria, LoadStatus, Summary, view};
use serde::Serialize;

/// Full text view: header, summary, active filters and one block per visible city.
pub fn dashboard(state: &DashboardState) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Weather Platform  (updated {}, {} locations)",
        Local::now().format("%H:%M"),
        state.records().len()
    );
    if let LoadStatus::Failed(reason) = state.status() {
        let _ = writeln!(out, "Fetch failed: {reason}");
    }
    out.push('\n');

    out.push_str(&summary(state.summary()));
    out.push('\n');
    let _ = writeln!(out, "{}", filters(state.criteria()));
    out.push('\n');

    let cards = view::cards(state.visible(), state.criteria());
    if cards.is_empty() {
        out.push_str("No cities match the current filters.\n");
    }
    for card in &cards {
        out.push_str(&card_block(card));
        out.push('\n');
    }

    out
}

pub fn summary(summary: &Summary) -> String {
    match summary {
        Summary::NoData => "  No data available.\n".to_string(),
        Summary::Available(s) => format!(
            "  Max temperature:     {}\n  Average temperature: {}\n  Most common:         {}\n",
            s.max_display(),
            s.average_display(),
            s.most_common_condition
        ),
    }
}

fn filters(criteria: &FilterCriteria) -> String {
    let condition = if criteria.condition_keyword.is_empty() {
        "All"
    } else {
        criteria.condition_keyword.as_str()
    };

    format!(
        "Filters: search=\"{}\" condition={} unit={} sun={}",
        criteria.search_text, condition, criteria.temperature_unit, criteria.sun_time
    )
}

fn card_block(card: &Card) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", card.city);
    let _ = writeln!(out, "  Temperature: {}", card.temperature);
    if let Some(sunrise) = &card.sunrise {
        let _ = writeln!(out, "  Sunrise: {sunrise}");
    }
    if let Some(sunset) = &card.sunset {
        let _ = writeln!(out, "  Sunset: {sunset}");
    }
    let _ = writeln!(out, "  Condition: {}", card.condition);
    out
}

#[derive(Serialize)]
struct SummaryText {
    max: String,
    average: String,
}

#[derive(Serialize)]
struct DashboardJson<'a> {
    summary: &'a Summary,
    /// `None` when there is no data.
    summary_text: Option<SummaryText>,
    criteria: &'a FilterCriteria,
    cards: Vec<Card>,
}

pub fn dashboard_json(state: &DashboardState) -> anyhow::Result<String> {
    let payload = DashboardJson {
        summary: state.summary(),
        summary_text: state
            .summary()
            .as_available()
            .map(|s| SummaryText { max: s.max_display(), average: s.average_display() }),
        criteria: state.criteria(),
        cards: view::cards(state.visible(), state.criteria()),
    };
    Ok(serde_json::to_string_pretty(&payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_core::{Action, SunTimeSelection, WeatherRecord};

    fn state() -> DashboardState {
        DashboardState::default().reduce(Action::RecordsLoaded(vec![
            WeatherRecord {
                city_name: "Paris".to_string(),
                temperature_celsius: Some(20.0),
                condition_description: "Clear sky".to_string(),
                sunrise: "05:50".to_string(),
                sunset: "21:40".to_string(),
            },
            WeatherRecord {
                city_name: "Moscow".to_string(),
                temperature_celsius: Some(10.0),
                condition_description: "Snow".to_string(),
                sunrise: "03:55".to_string(),
                sunset: "21:05".to_string(),
            },
        ]))
    }

    #[test]
    fn text_view_lists_summary_and_cards() {
        let text = dashboard(&state());

        assert!(text.contains("Max temperature:     20.00°C / 68.00°F"));
        assert!(text.contains("Average temperature: 15.00°C / 59.00°F"));
        assert!(text.contains("Most common:         Clear sky"));
        assert!(text.contains("Paris\n  Temperature: 20.00°C\n  Sunrise: 5:50 AM\n  Sunset: 9:40 PM"));
        assert!(text.contains("Moscow"));
    }

    #[test]
    fn text_view_follows_criteria() {
        let state = state()
            .reduce(Action::SearchChanged("mos".to_string()))
            .reduce(Action::SunTimeChanged(SunTimeSelection::Sunset));
        let text = dashboard(&state);

        assert!(!text.contains("Paris\n"));
        assert!(text.contains("Moscow\n  Temperature: 10.00°C\n  Sunset: 9:05 PM"));
        assert!(text.contains("search=\"mos\" condition=All unit=Celsius sun=Sunset"));
    }

    #[test]
    fn empty_view_says_so() {
        let state = state().reduce(Action::SearchChanged("zzz".to_string()));
        assert!(dashboard(&state).contains("No cities match"));

        let empty = DashboardState::default().reduce(Action::RecordsLoaded(Vec::new()));
        assert!(dashboard(&empty).contains("No data available."));
    }

    #[test]
    fn json_view_has_summary_and_cards() {
        let json: serde_json::Value =
            serde_json::from_str(&dashboard_json(&state()).unwrap()).unwrap();

        assert_eq!(json["summary"]["status"], "available");
        assert_eq!(json["summary"]["max_temperature_celsius"], 20.0);
        assert_eq!(json["cards"].as_array().map(Vec::len), Some(2));
        assert_eq!(json["criteria"]["temperature_unit"], "celsius");
        assert_eq!(json["summary_text"]["max"], "20.00°C / 68.00°F");
        assert_eq!(json["summary_text"]["average"], "15.00°C / 59.00°F");
    }

    #[test]
    fn json_view_without_data_has_null_summary_text() {
        let empty = DashboardState::default().reduce(Action::RecordsLoaded(Vec::new()));
        let json: serde_json::Value = serde_json::from_str(&dashboard_json(&empty).unwrap()).unwrap();

        assert_eq!(json["summary"]["status"], "no_data");
        assert!(json["summary_text"].is_null());
    }
}

use serde::Serialize;

use crate::{
    format::{celsius_to_fahrenheit, format_celsius},
    model::WeatherRecord,
};

/// Statistics over one batch of records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateSummary {
    pub max_temperature_celsius: f64,
    pub average_temperature_celsius: f64,
    pub most_common_condition: String,
}

impl AggregateSummary {
    /// e.g. `"31.20°C / 88.16°F"`.
    pub fn max_display(&self) -> String {
        dual_unit(self.max_temperature_celsius)
    }

    pub fn average_display(&self) -> String {
        dual_unit(self.average_temperature_celsius)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Summary {
    /// Nothing to aggregate: no records, or none with a numeric temperature.
    NoData,
    Available(AggregateSummary),
}

impl Summary {
    pub fn as_available(&self) -> Option<&AggregateSummary> {
        match self {
            Summary::Available(s) => Some(s),
            Summary::NoData => None,
        }
    }
}

fn dual_unit(celsius: f64) -> String {
    format!("{} / {}", format_celsius(celsius), celsius_to_fahrenheit(celsius))
}

pub fn compute_summary(records: &[WeatherRecord]) -> Summary {
    let temps: Vec<f64> = records.iter().filter_map(|r| r.temperature_celsius).collect();
    if temps.is_empty() {
        return Summary::NoData;
    }

    let max = temps.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let average = temps.iter().sum::<f64>() / temps.len() as f64;

    Summary::Available(AggregateSummary {
        max_temperature_celsius: max,
        average_temperature_celsius: average,
        most_common_condition: most_common_condition(records),
    })
}

/// Highest count wins; on a tie the condition seen first is kept.
fn most_common_condition(records: &[WeatherRecord]) -> String {
    // (condition, count) in first-seen order
    let mut tally: Vec<(&str, usize)> = Vec::new();
    for record in records {
        let condition = record.condition_description.as_str();
        match tally.iter_mut().find(|(c, _)| *c == condition) {
            Some((_, count)) => *count += 1,
            None => tally.push((condition, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (condition, count) in tally {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((condition, count));
        }
    }

    best.map(|(c, _)| c.to_string()).unwrap_or_default()
}

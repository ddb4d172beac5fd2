use crate::model::{FilterCriteria, WeatherRecord};

impl FilterCriteria {
    /// Unit and sun-time selection are display settings and never exclude a record.
    pub fn matches(&self, record: &WeatherRecord) -> bool {
        let city_ok = contains_ignore_case(&record.city_name, &self.search_text);
        let condition_ok = self.condition_keyword.is_empty()
            || contains_ignore_case(&record.condition_description, &self.condition_keyword);

        city_ok && condition_ok
    }
}

/// Records matching `criteria`, in input order.
pub fn filter_records(records: &[WeatherRecord], criteria: &FilterCriteria) -> Vec<WeatherRecord> {
    records.iter().filter(|r| criteria.matches(r)).cloned().collect()
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

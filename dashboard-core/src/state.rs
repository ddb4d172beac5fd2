//! Dashboard state as a pure reducer.
//!
//! Every user event or fetch outcome is an [`Action`]. [`DashboardState::reduce`]
//! consumes the old state and returns the next one, recomputing the summary and
//! the visible records from scratch; nothing is patched in place.

use serde::Serialize;

use crate::{
    filter::filter_records,
    model::{FilterCriteria, SunTimeSelection, TemperatureUnit, WeatherRecord},
    summary::{Summary, compute_summary},
};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum LoadStatus {
    #[default]
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    RecordsLoaded(Vec<WeatherRecord>),
    FetchFailed(String),
    SearchChanged(String),
    ConditionChanged(String),
    UnitChanged(TemperatureUnit),
    SunTimeChanged(SunTimeSelection),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardState {
    records: Vec<WeatherRecord>,
    summary: Summary,
    criteria: FilterCriteria,
    visible: Vec<WeatherRecord>,
    status: LoadStatus,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(FilterCriteria::default())
    }
}

impl DashboardState {
    pub fn new(criteria: FilterCriteria) -> Self {
        Self {
            records: Vec::new(),
            summary: Summary::NoData,
            criteria,
            visible: Vec::new(),
            status: LoadStatus::Loading,
        }
    }

    pub fn reduce(self, action: Action) -> Self {
        match action {
            Action::RecordsLoaded(records) => {
                let summary = compute_summary(&records);
                let visible = filter_records(&records, &self.criteria);
                Self { records, summary, visible, status: LoadStatus::Ready, ..self }
            }
            Action::FetchFailed(reason) => Self {
                records: Vec::new(),
                summary: Summary::NoData,
                visible: Vec::new(),
                status: LoadStatus::Failed(reason),
                ..self
            },
            Action::SearchChanged(text) => {
                let criteria = self.criteria.clone().with_search(text);
                self.refilter(criteria)
            }
            Action::ConditionChanged(keyword) => {
                let criteria = self.criteria.clone().with_condition(keyword);
                self.refilter(criteria)
            }
            Action::UnitChanged(unit) => {
                let criteria = self.criteria.clone().with_unit(unit);
                Self { criteria, ..self }
            }
            Action::SunTimeChanged(sun_time) => {
                let criteria = self.criteria.clone().with_sun_time(sun_time);
                Self { criteria, ..self }
            }
        }
    }

    fn refilter(self, criteria: FilterCriteria) -> Self {
        let visible = filter_records(&self.records, &criteria);
        Self { criteria, visible, ..self }
    }

    pub fn records(&self) -> &[WeatherRecord] {
        &self.records
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn visible(&self) -> &[WeatherRecord] {
        &self.visible
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }
}

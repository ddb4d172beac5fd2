//! Core library for the `weather-dashboard` tool.
//!
//! This crate defines:
//! - Weather records, locations and filter criteria
//! - Summary statistics and record filtering
//! - A reducer that turns user events into new dashboard state
//! - Abstraction over weather providers and batch fetching
//! - Configuration & credentials handling
//!
//! It is used by `dashboard-cli`, but the aggregation and filtering parts have
//! no I/O and can back any other front end.

pub mod config;
pub mod error;
pub mod filter;
pub mod format;
pub mod model;
pub mod provider;
pub mod state;
pub mod summary;
pub mod view;

pub use config::{Config, ProviderConfig};
pub use error::DashboardError;
pub use filter::filter_records;
pub use format::{celsius_to_fahrenheit, format_temperature, format_twelve_hour};
pub use model::{FilterCriteria, Location, SunTimeSelection, TemperatureUnit, WeatherRecord};
pub use provider::{BatchOutcome, ProviderId, WeatherProvider, fetch_all, fetch_each};
pub use state::{Action, DashboardState, LoadStatus};
pub use summary::{AggregateSummary, Summary, compute_summary};
pub use view::Card;

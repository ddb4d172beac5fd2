use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use dashboard_core::{
    Action, Config, DashboardState, FilterCriteria, LoadStatus, Location, ProviderId,
    SunTimeSelection, TemperatureUnit, WeatherProvider, fetch_all, fetch_each,
    provider::{default_provider_from_config, provider_from_config},
};
use inquire::{Confirm, Password, PasswordDisplayMode};

use crate::{interactive, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-dashboard", version, about = "Current weather for a set of cities")]
pub struct Cli {
    /// More log output on stderr (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key for a provider.
    Configure {
        /// Provider short name, e.g. "weatherbit" or "openweather".
        provider: String,

        /// Make this provider the default even if another one is set.
        #[arg(long)]
        default: bool,
    },

    /// Fetch once and print the summary and matching cities.
    Show {
        #[command(flatten)]
        fetch: FetchArgs,

        /// Case-insensitive part of the city name.
        #[arg(long, default_value = "")]
        search: String,

        /// Case-insensitive part of the condition, e.g. "rain".
        #[arg(long, default_value = "")]
        condition: String,

        #[arg(long, value_enum, default_value_t = UnitArg::Celsius)]
        unit: UnitArg,

        /// Which sun times to print.
        #[arg(long, value_enum, default_value_t = SunArg::All)]
        sun: SunArg,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Fetch once, then refine the view from a menu.
    Interactive {
        #[command(flatten)]
        fetch: FetchArgs,
    },

    /// List the locations that will be queried.
    Locations,
}

#[derive(Debug, clap::Args)]
pub struct FetchArgs {
    /// Provider to use instead of the configured default.
    #[arg(long)]
    pub provider: Option<String>,

    /// Show the cities that answered even if some requests fail.
    #[arg(long)]
    pub keep_going: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum UnitArg {
    Celsius,
    Fahrenheit,
}

impl From<UnitArg> for TemperatureUnit {
    fn from(value: UnitArg) -> Self {
        match value {
            UnitArg::Celsius => TemperatureUnit::Celsius,
            UnitArg::Fahrenheit => TemperatureUnit::Fahrenheit,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SunArg {
    All,
    Sunrise,
    Sunset,
}

impl From<SunArg> for SunTimeSelection {
    fn from(value: SunArg) -> Self {
        match value {
            SunArg::All => SunTimeSelection::All,
            SunArg::Sunrise => SunTimeSelection::Sunrise,
            SunArg::Sunset => SunTimeSelection::Sunset,
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { provider, default } => configure(&provider, default),
            Command::Show { fetch, search, condition, unit, sun, json } => {
                let criteria = FilterCriteria::default()
                    .with_search(search)
                    .with_condition(condition)
                    .with_unit(unit.into())
                    .with_sun_time(sun.into());

                let session = Session::open(&fetch)?;
                let state = session.load(DashboardState::new(criteria)).await;

                if let LoadStatus::Failed(reason) = state.status() {
                    bail!("Could not fetch weather data: {reason}");
                }

                if json {
                    println!("{}", render::dashboard_json(&state)?);
                } else {
                    print!("{}", render::dashboard(&state));
                }
                Ok(())
            }
            Command::Interactive { fetch } => {
                let session = Session::open(&fetch)?;
                interactive::run(&session).await
            }
            Command::Locations => {
                let config = Config::load()?;
                for location in config.locations() {
                    println!("{location}");
                }
                Ok(())
            }
        }
    }
}

fn configure(provider: &str, make_default: bool) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    let mut config = Config::load()?;

    if config.is_provider_configured(id) {
        let replace = Confirm::new(&format!("An API key for {id} is already stored. Replace it?"))
            .with_default(false)
            .prompt()
            .context("Failed to read confirmation")?;
        if !replace {
            println!("Kept the existing {id} API key.");
            return Ok(());
        }
    }

    let api_key = Password::new(&format!("{id} API key:"))
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;
    let api_key = api_key.trim();

    if api_key.is_empty() {
        bail!("API key must not be empty");
    }

    config.upsert_provider_api_key(id, api_key.to_string());
    if make_default {
        config.set_default_provider(id);
    }

    let path = config.save()?;
    println!("Saved {id} credentials to {}", path.display());
    Ok(())
}

/// A provider plus the locations to ask it about.
pub struct Session {
    provider: Box<dyn WeatherProvider>,
    locations: Vec<Location>,
    keep_going: bool,
}

impl Session {
    fn open(args: &FetchArgs) -> anyhow::Result<Self> {
        let config = Config::load()?;

        let provider = match &args.provider {
            Some(name) => provider_from_config(ProviderId::try_from(name.as_str())?, &config)?,
            None => default_provider_from_config(&config)?,
        };

        Ok(Self { provider, locations: config.locations(), keep_going: args.keep_going })
    }

    /// Fetch all locations and fold the outcome into `state`.
    pub async fn load(&self, state: DashboardState) -> DashboardState {
        let action = if self.keep_going {
            let outcome = fetch_each(self.provider.as_ref(), &self.locations).await;
            for (location, err) in &outcome.failures {
                eprintln!("warning: skipped {}: {err:#}", location.label);
            }
            Action::RecordsLoaded(outcome.records)
        } else {
            match fetch_all(self.provider.as_ref(), &self.locations).await {
                Ok(records) => Action::RecordsLoaded(records),
                Err(err) => {
                    tracing::error!("weather fetch failed: {err:#}");
                    Action::FetchFailed(format!("{err:#}"))
                }
            }
        };

        state.reduce(action)
    }
}

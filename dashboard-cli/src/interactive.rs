use std::fmt;

use dashboard_core::{
    Action, DashboardState, SunTimeSelection, TemperatureUnit, model::CONDITION_PRESETS,
};
use inquire::{InquireError, Select, Text};

use crate::{cli::Session, render};

#[derive(Debug, Clone, Copy)]
enum MenuItem {
    Search,
    Condition,
    Unit,
    SunTime,
    Refresh,
    Quit,
}

impl MenuItem {
    const ALL: [MenuItem; 6] = [
        MenuItem::Search,
        MenuItem::Condition,
        MenuItem::Unit,
        MenuItem::SunTime,
        MenuItem::Refresh,
        MenuItem::Quit,
    ];
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MenuItem::Search => "Search by location",
            MenuItem::Condition => "Weather condition",
            MenuItem::Unit => "Temperature unit",
            MenuItem::SunTime => "Sunrise/Sunset time",
            MenuItem::Refresh => "Refresh",
            MenuItem::Quit => "Quit",
        };
        f.write_str(label)
    }
}

/// Fetch once, then loop: render, read one event, reduce.
pub async fn run(session: &Session) -> anyhow::Result<()> {
    let mut state = session.load(DashboardState::default()).await;

    loop {
        print!("{}", render::dashboard(&state));

        let choice = match Select::new("What next?", MenuItem::ALL.to_vec()).prompt() {
            Ok(choice) => choice,
            Err(err) if is_cancel(&err) => break,
            Err(err) => return Err(err.into()),
        };

        if let MenuItem::Quit = choice {
            break;
        }
        if let MenuItem::Refresh = choice {
            state = session.load(state).await;
            continue;
        }

        match next_action(choice, &state) {
            Ok(Some(action)) => state = state.reduce(action),
            Ok(None) => {}
            Err(err) if is_cancel(&err) => continue,
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn next_action(choice: MenuItem, state: &DashboardState) -> Result<Option<Action>, InquireError> {
    let criteria = state.criteria();

    let action = match choice {
        MenuItem::Search => {
            let text = Text::new("Search by location:")
                .with_initial_value(&criteria.search_text)
                .prompt()?;
            Action::SearchChanged(text.trim().to_string())
        }
        MenuItem::Condition => {
            let options: Vec<&str> =
                CONDITION_PRESETS.iter().map(|&c| if c.is_empty() { "All" } else { c }).collect();
            let picked = Select::new("Weather condition:", options).prompt()?;
            let keyword = if picked == "All" { String::new() } else { picked.to_string() };
            Action::ConditionChanged(keyword)
        }
        MenuItem::Unit => {
            let unit = Select::new("Temperature unit:", TemperatureUnit::all().to_vec()).prompt()?;
            Action::UnitChanged(unit)
        }
        MenuItem::SunTime => {
            let sun = Select::new("Sunrise/Sunset time:", SunTimeSelection::all().to_vec()).prompt()?;
            Action::SunTimeChanged(sun)
        }
        MenuItem::Refresh | MenuItem::Quit => return Ok(None),
    };

    Ok(Some(action))
}

fn is_cancel(err: &InquireError) -> bool {
    matches!(err, InquireError::OperationCanceled | InquireError::OperationInterrupted)
}

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::InquireError;
use weather_core::{
    Config, Coordinates, FileStore, FixedLocation, LocationProvider, NoLocation, SavedCity,
    SystemClock, TemperatureUnit, WeatherApp, provider_from_config,
};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    /// Log filter used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the API key and optional home location.
    Configure,

    /// Show current weather for a city, or for the active city / home location.
    Now {
        /// City name; also becomes the active city.
        city: Option<String>,
    },

    /// Show the daily forecast for a city, or for the active city.
    Forecast {
        city: Option<String>,
    },

    /// Search for cities by name.
    Search {
        query: String,
    },

    /// Manage saved cities.
    Cities {
        #[command(subcommand)]
        command: CitiesCommand,
    },

    /// Set the temperature unit, or toggle it when omitted.
    Unit {
        /// "C" or "F".
        unit: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum CitiesCommand {
    /// List saved cities.
    List,
    /// Save a city.
    Add { name: String, country: String },
    /// Remove a saved city and its cached weather.
    Remove { name: String },
    /// Make a city the active one.
    Select { name: String },
    /// Mark a saved city as primary.
    Primary { name: String },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        tracing::debug!(command = ?self.command, "running command");

        match self.command {
            Command::Configure => configure(),
            Command::Now { city } => show_now(&build_app()?, city).await,
            Command::Forecast { city } => show_forecast(&build_app()?, city).await,
            Command::Search { query } => search(&build_app()?, &query).await,
            Command::Cities { command } => run_cities(&build_app()?, command).await,
            Command::Unit { unit } => set_unit(&build_app()?, unit).await,
        }
    }
}

fn build_app() -> anyhow::Result<WeatherApp> {
    let config = Config::load()?;
    let api = provider_from_config(&config)?;
    let store = FileStore::new(config.data_file_path()?);
    let location: Arc<dyn LocationProvider> = match config.home {
        Some(coords) => Arc::new(FixedLocation(coords)),
        None => Arc::new(NoLocation),
    };

    Ok(WeatherApp::new(api, Arc::new(store), location, Arc::new(SystemClock)))
}

async fn show_now(app: &WeatherApp, city: Option<String>) -> anyhow::Result<()> {
    let unit = app.preferences.temperature_unit().await?;

    if let Some(city) = city {
        let snapshot = app.view_city(&city).await?;
        print!("{}", output::snapshot(&snapshot, unit));
        return Ok(());
    }

    let Some(home) = app.home_weather().await? else {
        println!(
            "Unable to get location. Set a home location with `weather configure` or add a city."
        );
        return Ok(());
    };

    print!("{}", output::snapshot(&home.snapshot, unit));

    if let Some(suggestion) = home.suggestion {
        let answer = inquire::Confirm::new(&format!(
            "{} is not in your saved cities. Add it?",
            suggestion.name
        ))
        .with_default(false)
        .prompt();

        if confirmed(answer)? {
            app.accept_suggestion(suggestion).await?;
            println!("City added.");
        }
    }

    Ok(())
}

/// A cancelled or interrupted prompt counts as "no"; anything else is an error.
fn confirmed(answer: Result<bool, InquireError>) -> anyhow::Result<bool> {
    match answer {
        Ok(yes) => Ok(yes),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(false),
        Err(e) => Err(e).context("Failed to read confirmation"),
    }
}

async fn show_forecast(app: &WeatherApp, city: Option<String>) -> anyhow::Result<()> {
    let unit = app.preferences.temperature_unit().await?;

    let bundle = match city {
        Some(city) => Some(app.view_forecast(&city).await?),
        None => app.active_forecast().await?,
    };

    match bundle {
        Some(bundle) => print!("{}", output::forecast(&bundle, unit)),
        None => {
            println!("No city selected. Run `weather now <city>` or `weather cities select <name>`.")
        }
    }

    Ok(())
}

async fn search(app: &WeatherApp, query: &str) -> anyhow::Result<()> {
    let results = app.gateway.search_cities(query).await?;
    if results.is_empty() {
        println!("No matches (queries need at least 2 characters).");
    }
    for candidate in &results {
        println!("{}", output::candidate(candidate));
    }

    Ok(())
}

async fn set_unit(app: &WeatherApp, unit: Option<String>) -> anyhow::Result<()> {
    let next = match unit {
        Some(u) => {
            let u = TemperatureUnit::try_from(u.as_str())?;
            app.preferences.set_temperature_unit(u).await?;
            u
        }
        None => app.preferences.toggle_temperature_unit().await?,
    };
    println!("Temperature unit changed to °{next}");

    Ok(())
}

async fn run_cities(app: &WeatherApp, command: CitiesCommand) -> anyhow::Result<()> {
    match command {
        CitiesCommand::List => {
            let cities = app.registry.list().await?;
            let active = app.registry.active().await?;
            if cities.is_empty() {
                println!("No saved cities. Add one with `weather cities add <name> <country>`.");
            }
            for city in &cities {
                let is_active = active.as_deref() == Some(city.name.as_str());
                println!("{}", output::saved_city(city, is_active));
            }
        }
        CitiesCommand::Add { name, country } => {
            if app.registry.add(SavedCity::new(name.clone(), country)).await? {
                println!("{name} added successfully");
            } else {
                println!("{name} is already in your list");
            }
        }
        CitiesCommand::Remove { name } => {
            app.registry.remove(&name).await?;
            println!("{name} removed");
        }
        CitiesCommand::Select { name } => {
            app.select_city(&name).await?;
            println!("Switched to {name}");
        }
        CitiesCommand::Primary { name } => {
            if app.registry.set_primary(&name).await? {
                println!("{name} is now your primary city");
            } else {
                println!("{name} is not in your saved cities");
            }
        }
    }

    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = inquire::Password::new("OpenWeatherMap API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.api_key = Some(api_key.trim().to_string());

    let home = inquire::Text::new("Home location as \"lat,lon\" (leave empty to skip):")
        .prompt()
        .context("Failed to read home location")?;
    if !home.trim().is_empty() {
        config.home = Some(parse_coordinates(&home)?);
    }

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn parse_coordinates(input: &str) -> anyhow::Result<Coordinates> {
    let (lat, lon) = input
        .split_once(',')
        .ok_or_else(|| anyhow::anyhow!("Expected \"lat,lon\", got '{input}'"))?;

    let lat: f64 = lat.trim().parse().with_context(|| format!("Invalid latitude '{lat}'"))?;
    let lon: f64 = lon.trim().parse().with_context(|| format!("Invalid longitude '{lon}'"))?;

    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        anyhow::bail!("Coordinates out of range: {lat},{lon}");
    }

    Ok(Coordinates { lat, lon })
}

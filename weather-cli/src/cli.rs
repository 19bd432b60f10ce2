use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use weather_core::{
    Config, config::parse_timezone, fetch_dashboard, provider_from_config, suggest_cities,
};

use crate::render::{self, TempUnit};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather dashboard for the terminal")]
pub struct Cli {
    /// Raise log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key, default city and timezone.
    Configure,

    /// Show current conditions, the next 24 hours and the daily forecast.
    Show {
        /// City name; falls back to the configured default city.
        city: Option<String>,

        /// IANA timezone for grouping days, e.g. "Europe/Berlin".
        #[arg(long)]
        tz: Option<String>,

        /// Print temperatures in Fahrenheit.
        #[arg(long, short = 'f')]
        fahrenheit: bool,

        /// Print the dashboard as JSON instead of text.
        #[arg(long, conflicts_with = "fahrenheit")]
        json: bool,
    },

    /// Suggest cities matching a partial name.
    Search {
        query: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure()?,
            Command::Show {
                city,
                tz,
                fahrenheit,
                json,
            } => {
                let config = Config::load()?;
                let provider = provider_from_config(&config)?;

                let tz = match tz {
                    Some(name) => Some(parse_timezone(&name)?),
                    None => config.timezone()?,
                };
                let city = city.as_deref().unwrap_or_else(|| config.city());

                let dashboard = fetch_dashboard(provider.as_ref(), city, tz, Utc::now()).await?;

                if json {
                    let out = serde_json::to_string_pretty(&dashboard)
                        .context("Failed to serialize dashboard")?;
                    println!("{out}");
                } else {
                    let unit = if fahrenheit {
                        TempUnit::Fahrenheit
                    } else {
                        TempUnit::Celsius
                    };
                    print!("{}", render::dashboard(&dashboard, unit));
                }
            }
            Command::Search { query } => {
                let config = Config::load()?;
                let provider = provider_from_config(&config)?;

                let cities = suggest_cities(provider.as_ref(), &query).await;
                print!("{}", render::suggestions(&cities));
            }
        }

        Ok(())
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key (empty keeps the current one):")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()?;
    if !api_key.trim().is_empty() {
        config.api_key = Some(api_key.trim().to_string());
    } else if config.api_key.is_none() {
        anyhow::bail!("An API key is required; get one at https://openweathermap.org/api");
    }

    let current_city = config.city().to_string();
    let city = Text::new("Default city:")
        .with_default(&current_city)
        .prompt()?;
    config.default_city = Some(city.trim().to_string()).filter(|c| !c.is_empty());

    let current_tz = config.timezone.clone().unwrap_or_default();
    let tz = Text::new("Timezone (IANA name, empty to use the city's own):")
        .with_default(&current_tz)
        .prompt()?;
    match tz.trim() {
        "" => config.timezone = None,
        name => config.set_timezone(name)?,
    }

    config.save()?;
    println!(
        "Configuration saved to {}",
        Config::config_file_path()?.display()
    );

    Ok(())
}

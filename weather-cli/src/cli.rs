use std::{env, process::ExitCode};

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use inquire::{CustomType, InquireError, Password, PasswordDisplayMode, Text};
use log::info;
use weather_core::{
    Clock, Config, DisplayMessage, OpenWeatherClient, Presentation, RequestState, Session,
    WeatherError, WeatherSource, config::API_KEY_ENV, presenter::capitalize_first,
    provider::source_from_config,
};

use crate::render::print_presentation;

/// Header shown above the prompt in interactive mode.
const DATETIME_FORMAT: &str = "%A, %B %-d %Y - %I:%M %p";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather by city")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key (and optionally endpoint and timeout).
    Configure,

    /// Show current weather for a city.
    Show {
        /// City name, e.g. "London" or "Paris,FR".
        city: String,

        /// Time zone for sunrise and sunset.
        #[arg(long, value_enum, default_value_t = ClockArg::Local)]
        clock: ClockArg,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Prompt for cities until an empty line or Esc.
    Interactive {
        /// Time zone for sunrise and sunset.
        #[arg(long, value_enum, default_value_t = ClockArg::Local)]
        clock: ClockArg,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ClockArg {
    Local,
    City,
    Utc,
}

impl From<ClockArg> for Clock {
    fn from(arg: ClockArg) -> Self {
        match arg {
            ClockArg::Local => Clock::Local,
            ClockArg::City => Clock::City,
            ClockArg::Utc => Clock::Utc,
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Configure => {
                configure()?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Show { city, clock, json } => {
                let client = build_client()?;
                let mut session = Session::new();
                let presentation = lookup(&mut session, &client, &city, clock.into()).await?;
                print_presentation(&presentation, json)?;

                Ok(match presentation {
                    Presentation::Weather(_) => ExitCode::SUCCESS,
                    Presentation::Error(_) => ExitCode::FAILURE,
                })
            }
            Command::Interactive { clock } => {
                let client = build_client()?;
                interactive(&client, clock.into()).await?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn build_client() -> anyhow::Result<OpenWeatherClient> {
    let config = Config::load()?;
    let client = source_from_config(&config, env::var(API_KEY_ENV).ok())?;
    info!("Using endpoint {}", client.base_url());
    Ok(client)
}

/// Run one lookup. Input the session rejects is shown as a message like any
/// other failed request.
async fn lookup<S>(
    session: &mut Session,
    source: &S,
    city: &str,
    clock: Clock,
) -> anyhow::Result<Presentation>
where
    S: WeatherSource + ?Sized,
{
    match session.submit(source, city, clock).await {
        Ok(state) => presentation_of(state),
        Err(err @ (WeatherError::EmptyCity | WeatherError::RequestInFlight(_))) => Ok(
            Presentation::Error(DisplayMessage::new(capitalize_first(&err.to_string()))),
        ),
        Err(err) => Err(err.into()),
    }
}

fn presentation_of(state: &RequestState) -> anyhow::Result<Presentation> {
    match state {
        RequestState::Loaded(fields) => Ok(Presentation::Weather(fields.clone())),
        RequestState::Failed(msg) => Ok(Presentation::Error(msg.clone())),
        other => Err(anyhow::anyhow!("Request did not complete: {other:?}")),
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if api_key.trim().is_empty() {
        return Err(WeatherError::MissingApiKey.into());
    }
    config.set_api_key(api_key);

    let endpoint = config.endpoint();
    let base_url = Text::new("API endpoint:")
        .with_default(&endpoint)
        .prompt()
        .context("Failed to read API endpoint")?;
    config.base_url = Some(base_url.trim().to_string());

    let timeout = CustomType::<u64>::new("Request timeout in seconds (0 = client default):")
        .with_default(config.timeout_secs.unwrap_or(0))
        .with_error_message("Please enter a whole number of seconds")
        .prompt()
        .context("Failed to read timeout")?;
    config.timeout_secs = (timeout > 0).then_some(timeout);

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

async fn interactive(client: &OpenWeatherClient, clock: Clock) -> anyhow::Result<()> {
    let mut session = Session::new();

    loop {
        println!("\n{}", Local::now().format(DATETIME_FORMAT));

        let city = match Text::new("City:")
            .with_placeholder("Enter the City name")
            .prompt()
        {
            Ok(city) => city,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(anyhow::Error::new(err).context("Failed to read city")),
        };
        if city.trim().is_empty() {
            break;
        }

        let presentation = lookup(&mut session, client, &city, clock).await?;
        print_presentation(&presentation, false)?;
    }

    Ok(())
}

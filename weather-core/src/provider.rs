use async_trait::async_trait;
use std::fmt::Debug;

use crate::{Config, HttpOutcome, WeatherError, provider::openweather::OpenWeatherClient};

pub mod openweather;

/// Something that can look up current weather for a city.
///
/// Implementations never fail: every transport, HTTP or decoding problem is
/// classified into an [`HttpOutcome`] variant.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch(&self, city: &str) -> HttpOutcome;
}

/// Construct the OpenWeather client from config, with the API key taken from
/// `env_api_key` when present.
pub fn source_from_config(
    config: &Config,
    env_api_key: Option<String>,
) -> Result<OpenWeatherClient, WeatherError> {
    let api_key = config.resolve_api_key(env_api_key)?;
    Ok(OpenWeatherClient::with_options(api_key, config.endpoint(), config.timeout()))
}

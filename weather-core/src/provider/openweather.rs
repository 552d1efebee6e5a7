use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::{
    WeatherError,
    model::{HttpOutcome, NetworkErrorKind, WeatherReading},
};

use super::WeatherSource;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    timeout: Option<Duration>,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self::with_options(api_key, DEFAULT_BASE_URL.to_string(), None)
    }

    pub fn with_options(api_key: String, base_url: String, timeout: Option<Duration>) -> Self {
        Self {
            api_key,
            base_url,
            timeout,
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_current(&self, city: &str) -> HttpOutcome {
        debug!("Calling OpenWeather: {}?q={city}&appid=***", self.base_url);

        let mut req = self
            .http
            .get(&self.base_url)
            .query(&[("q", city), ("appid", self.api_key.as_str())]);
        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }

        let res = match req.send().await {
            Ok(res) => res,
            Err(err) => return network_error(&err),
        };

        let status = res.status();
        let body = match res.text().await {
            Ok(body) => body,
            Err(err) => return network_error(&err),
        };

        if !status.is_success() {
            info!("OpenWeather responded with status {status}");
            return HttpOutcome::HttpError {
                status: status.as_u16(),
                message: error_message(status, &body),
            };
        }

        match parse_reading(&body) {
            Ok(reading) => HttpOutcome::Success(reading),
            Err(WeatherError::Api { status, message }) => {
                info!("OpenWeather reported code {status} in a successful response");
                HttpOutcome::HttpError { status, message }
            }
            Err(WeatherError::MalformedResponse(message)) => {
                warn!("Unexpected OpenWeather payload: {message}");
                HttpOutcome::MalformedResponse { message }
            }
            Err(err) => HttpOutcome::MalformedResponse {
                message: err.to_string(),
            },
        }
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn fetch(&self, city: &str) -> HttpOutcome {
        self.fetch_current(city.trim()).await
    }
}

/// `cod` is a number on success but a string on most errors.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OwCode {
    Number(i64),
    Text(String),
}

impl OwCode {
    fn as_status(&self) -> Option<u16> {
        match self {
            OwCode::Number(n) => u16::try_from(*n).ok(),
            OwCode::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwEnvelope {
    cod: Option<OwCode>,
    message: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: i64,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    sunrise: i64,
    sunset: i64,
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: Option<String>,
    timezone: Option<i32>,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    sys: OwSys,
}

/// Parse a current-weather body into a [`WeatherReading`].
pub fn parse_reading(body: &str) -> Result<WeatherReading, WeatherError> {
    let envelope: OwEnvelope = serde_json::from_str(body)?;
    match envelope.cod.as_ref().and_then(OwCode::as_status) {
        Some(status) if status != 200 => {
            return Err(WeatherError::Api {
                status,
                message: envelope.message.map(message_text).unwrap_or_default(),
            });
        }
        _ => {}
    }

    let parsed: OwCurrentResponse = serde_json::from_str(body)?;

    let weather = parsed
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::MalformedResponse("empty `weather` array".to_string()))?;

    let location = match (parsed.name.filter(|n| !n.is_empty()), parsed.sys.country) {
        (Some(name), Some(country)) => Some(format!("{name}, {country}")),
        (Some(name), None) => Some(name),
        (None, _) => None,
    };

    Ok(WeatherReading {
        temperature_kelvin: parsed.main.temp,
        humidity_percent: parsed.main.humidity,
        wind_speed: parsed.wind.speed,
        weather_code: weather.id,
        description: weather.description,
        sunrise_epoch: parsed.sys.sunrise,
        sunset_epoch: parsed.sys.sunset,
        location,
        utc_offset_seconds: parsed.timezone,
    })
}

fn message_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

fn network_error(err: &reqwest::Error) -> HttpOutcome {
    let kind = if err.is_timeout() {
        NetworkErrorKind::Timeout
    } else if err.is_connect() {
        NetworkErrorKind::Connection
    } else if err.is_redirect() {
        NetworkErrorKind::TooManyRedirects
    } else {
        NetworkErrorKind::Other
    };
    info!("OpenWeather request failed ({kind:?}): {err}");

    HttpOutcome::NetworkError {
        kind,
        message: err.to_string(),
    }
}

/// Raw message for an error status: the body's `message` if it has one,
/// otherwise the status line.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<OwEnvelope>(body)
        .ok()
        .and_then(|env| env.message)
        .map(message_text)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| match status.canonical_reason() {
            Some(reason) => format!("{} {reason}", status.as_u16()),
            None => format!("{} {}", status.as_u16(), truncate_body(body)),
        })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

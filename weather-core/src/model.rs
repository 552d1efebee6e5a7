use std::fmt;

use serde::Serialize;

/// Current conditions parsed from a successful API response.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReading {
    pub temperature_kelvin: f64,
    pub humidity_percent: f64,
    pub wind_speed: f64,
    pub weather_code: i64,
    pub description: String,
    pub sunrise_epoch: i64,
    pub sunset_epoch: i64,
    /// "City, CC" when the provider reports it.
    pub location: Option<String>,
    /// Offset of the city's local time from UTC.
    pub utc_offset_seconds: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkErrorKind {
    Connection,
    Timeout,
    TooManyRedirects,
    Other,
}

/// Result of a single request/response cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum HttpOutcome {
    Success(WeatherReading),
    HttpError { status: u16, message: String },
    NetworkError { kind: NetworkErrorKind, message: String },
    MalformedResponse { message: String },
}

/// Presentation-ready strings for a successful reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayFields {
    pub location: Option<String>,
    /// Degrees Celsius, one decimal.
    pub temperature: String,
    pub humidity: String,
    pub wind: String,
    pub emoji: &'static str,
    pub description: String,
    pub sunrise: String,
    pub sunset: String,
}

impl DisplayFields {
    pub fn summary_line(&self) -> String {
        format!(
            "🌡 Temp: {}°C  |  💧 Humidity: {}%  |  💨 Wind: {} m/s",
            self.temperature, self.humidity, self.wind
        )
    }

    pub fn sun_line(&self) -> String {
        format!("🌅 Sunrise: {}   |   🌇 Sunset: {}", self.sunrise, self.sunset)
    }
}

/// A short user-facing message, typically describing a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DisplayMessage(String);

impl DisplayMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presentation {
    Weather(DisplayFields),
    Error(DisplayMessage),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> DisplayFields {
        DisplayFields {
            location: None,
            temperature: "26.9".into(),
            humidity: "45.0".into(),
            wind: "3.1".into(),
            emoji: "🔆",
            description: "Clear sky".into(),
            sunrise: "06:40 AM".into(),
            sunset: "04:32 PM".into(),
        }
    }

    #[test]
    fn summary_line_contains_all_measurements() {
        assert_eq!(
            fields().summary_line(),
            "🌡 Temp: 26.9°C  |  💧 Humidity: 45.0%  |  💨 Wind: 3.1 m/s"
        );
    }

    #[test]
    fn sun_line_contains_both_times() {
        assert_eq!(fields().sun_line(), "🌅 Sunrise: 06:40 AM   |   🌇 Sunset: 04:32 PM");
    }

    #[test]
    fn display_message_serializes_as_plain_string() {
        let msg = DisplayMessage::new("Gateway Timeout");
        assert_eq!(serde_json::to_string(&msg).unwrap(), "\"Gateway Timeout\"");
        assert_eq!(msg.to_string(), "Gateway Timeout");
    }
}

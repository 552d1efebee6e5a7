use thiserror::Error;

/// Errors raised by the core library.
///
/// Transport and HTTP failures are not errors here: they are classified into
/// [`crate::HttpOutcome`] values and rendered as messages.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The response body did not have the shape we consume.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The body parsed, but its `cod` field reports a failure.
    #[error("API returned code {status}: {message}")]
    Api { status: u16, message: String },

    #[error("no API key configured.\nHint: set OPENWEATHER_API_KEY or run `weather configure`.")]
    MissingApiKey,

    #[error("please enter a city name")]
    EmptyCity,

    #[error("a request for '{0}' is already in progress")]
    RequestInFlight(String),
}

impl From<serde_json::Error> for WeatherError {
    fn from(err: serde_json::Error) -> Self {
        WeatherError::MalformedResponse(err.to_string())
    }
}

//! Lifecycle of a lookup, from city entry to rendered result.

use log::debug;

use crate::{
    WeatherError,
    model::{DisplayFields, DisplayMessage, Presentation},
    presenter::{Clock, present_with_clock},
    provider::WeatherSource,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Loading {
        city: String,
    },
    Loaded(DisplayFields),
    Failed(DisplayMessage),
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading { .. })
    }
}

/// Holds the state of the single request a front end may have in flight.
#[derive(Debug, Default)]
pub struct Session {
    state: RequestState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    /// Start a lookup. Rejects blank input and re-submission while loading.
    /// Returns the trimmed city.
    pub fn begin(&mut self, city: &str) -> Result<String, WeatherError> {
        if let RequestState::Loading { city: pending } = &self.state {
            return Err(WeatherError::RequestInFlight(pending.clone()));
        }

        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::EmptyCity);
        }

        debug!("Looking up weather for {city}");
        self.state = RequestState::Loading {
            city: city.to_string(),
        };
        Ok(city.to_string())
    }

    pub fn finish(&mut self, presentation: Presentation) -> &RequestState {
        self.state = match presentation {
            Presentation::Weather(fields) => RequestState::Loaded(fields),
            Presentation::Error(msg) => RequestState::Failed(msg),
        };
        &self.state
    }

    /// One full cycle: begin, fetch, classify and format, finish.
    pub async fn submit<S>(
        &mut self,
        source: &S,
        city: &str,
        clock: Clock,
    ) -> Result<&RequestState, WeatherError>
    where
        S: WeatherSource + ?Sized,
    {
        let city = self.begin(city)?;
        let outcome = source.fetch(&city).await;
        Ok(self.finish(present_with_clock(&outcome, clock)))
    }
}

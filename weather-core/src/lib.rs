//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeatherMap client and its response parsing
//! - Classification of outcomes and presentation-ready formatting
//! - Request lifecycle state for front ends
//!
//! It is used by `weather-cli`, but can also back other front ends.

pub mod config;
pub mod error;
pub mod model;
pub mod presenter;
pub mod provider;
pub mod session;

pub use config::Config;
pub use error::WeatherError;
pub use model::{
    DisplayFields, DisplayMessage, HttpOutcome, NetworkErrorKind, Presentation, WeatherReading,
};
pub use presenter::Clock;
pub use provider::{WeatherSource, openweather::OpenWeatherClient};
pub use session::{RequestState, Session};

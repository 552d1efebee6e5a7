//! Turns request outcomes into presentation-ready text.
//!
//! Everything here is pure: no I/O, no clock reads. Time zone conversion
//! takes the zone as an argument so callers (and tests) decide it.

use std::fmt::Display;

use chrono::{DateTime, FixedOffset, Local, Offset, TimeZone, Utc};

use crate::model::{
    DisplayFields, DisplayMessage, HttpOutcome, NetworkErrorKind, Presentation, WeatherReading,
};

const KELVIN_OFFSET: f64 = 273.15;

/// Messages for the HTTP statuses we recognize. Anything else falls back to
/// the raw message.
pub const HTTP_STATUS_MESSAGES: &[(u16, &str)] = &[
    (400, "Bad Request: check input city"),
    (401, "Unauthorized: check API key"),
    (403, "Forbidden: access denied"),
    (404, "Not Found: city not found"),
    (500, "Internal Server Error"),
    (502, "Bad Gateway"),
    (503, "Service Unavailable"),
    (504, "Gateway Timeout"),
];

/// Inclusive, non-overlapping ranges of OpenWeatherMap condition codes.
const WEATHER_EMOJI: &[(i64, i64, &str)] = &[
    (200, 232, "⛈"),
    (300, 321, "🌦"),
    (500, 531, "🌧"),
    (600, 622, "❄️"),
    (701, 741, "🌫"),
    (762, 762, "🌋"),
    (771, 771, "🎐🌫"),
    (781, 781, "🌪"),
    (800, 800, "🔆"),
    (801, 804, "☁️"),
];

pub const FALLBACK_EMOJI: &str = "🌈";

const CLOCK_FORMAT: &str = "%I:%M %p";
const UNKNOWN_TIME: &str = "--:--";

pub fn classify_http_status(status: u16, raw: &str) -> DisplayMessage {
    match HTTP_STATUS_MESSAGES.iter().find(|(code, _)| *code == status) {
        Some((_, msg)) => DisplayMessage::new(*msg),
        None => DisplayMessage::new(format!("Unexpected error: {raw}")),
    }
}

pub fn classify_network_failure(kind: NetworkErrorKind, raw: &str) -> DisplayMessage {
    let text = match kind {
        NetworkErrorKind::Connection => "Connection Error: check your internet connection",
        NetworkErrorKind::Timeout => "Timeout Error: request timed out",
        NetworkErrorKind::TooManyRedirects => "Too Many Redirects: check the URL",
        NetworkErrorKind::Other => return DisplayMessage::new(format!("Request error: {raw}")),
    };
    DisplayMessage::new(text)
}

pub fn classify_malformed(raw: &str) -> DisplayMessage {
    DisplayMessage::new(format!("Malformed response: {raw}"))
}

/// Emoji for an OpenWeatherMap condition code. Total over all integers.
pub fn emoji_for_weather_code(code: i64) -> &'static str {
    WEATHER_EMOJI
        .iter()
        .find(|(lo, hi, _)| (*lo..=*hi).contains(&code))
        .map(|(_, _, glyph)| *glyph)
        .unwrap_or(FALLBACK_EMOJI)
}

/// Round to one decimal place, halves away from zero (`0.25 -> 0.3`,
/// `-0.25 -> -0.3`). Negative zero comes back as `0.0`.
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0 + 0.0
}

pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

/// First character uppercased, the rest left as is.
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// 12-hour wall-clock time of a Unix epoch in `tz`, e.g. `10:13 PM`.
pub fn format_clock<Tz>(epoch: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match DateTime::from_timestamp(epoch, 0) {
        Some(utc) => utc.with_timezone(tz).format(CLOCK_FORMAT).to_string(),
        None => UNKNOWN_TIME.to_string(),
    }
}

pub fn format_reading<Tz>(reading: &WeatherReading, tz: &Tz) -> DisplayFields
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let celsius = round_tenth(kelvin_to_celsius(reading.temperature_kelvin));

    DisplayFields {
        location: reading.location.clone(),
        temperature: format!("{celsius:.1}"),
        humidity: format!("{:.1}", round_tenth(reading.humidity_percent)),
        wind: format!("{:.1}", round_tenth(reading.wind_speed)),
        emoji: emoji_for_weather_code(reading.weather_code),
        description: capitalize_first(&reading.description),
        sunrise: format_clock(reading.sunrise_epoch, tz),
        sunset: format_clock(reading.sunset_epoch, tz),
    }
}

/// Classify-and-format step for one outcome.
pub fn present<Tz>(outcome: &HttpOutcome, tz: &Tz) -> Presentation
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match outcome {
        HttpOutcome::Success(reading) => Presentation::Weather(format_reading(reading, tz)),
        HttpOutcome::HttpError { status, message } => {
            Presentation::Error(classify_http_status(*status, message))
        }
        HttpOutcome::NetworkError { kind, message } => {
            Presentation::Error(classify_network_failure(*kind, message))
        }
        HttpOutcome::MalformedResponse { message } => {
            Presentation::Error(classify_malformed(message))
        }
    }
}

/// Which wall clock sunrise and sunset are shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clock {
    /// The machine's local time zone.
    #[default]
    Local,
    /// The queried city's own offset, as reported by the provider.
    City,
    Utc,
}

/// [`present`] with the time zone picked by `clock`. `City` falls back to
/// UTC when the reading carries no offset.
pub fn present_with_clock(outcome: &HttpOutcome, clock: Clock) -> Presentation {
    match clock {
        Clock::Local => present(outcome, &Local),
        Clock::Utc => present(outcome, &Utc),
        Clock::City => {
            let offset = match outcome {
                HttpOutcome::Success(reading) => reading
                    .utc_offset_seconds
                    .and_then(FixedOffset::east_opt)
                    .unwrap_or_else(|| Utc.fix()),
                _ => Utc.fix(),
            };
            present(outcome, &offset)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{WeatherError, provider::openweather::parse_reading};

    fn reading() -> WeatherReading {
        WeatherReading {
            temperature_kelvin: 300.0,
            humidity_percent: 45.0,
            wind_speed: 3.09,
            weather_code: 800,
            description: "clear sky".into(),
            sunrise_epoch: 1_700_000_000,
            sunset_epoch: 1_700_036_000,
            location: Some("Lisbon, PT".into()),
            utc_offset_seconds: Some(0),
        }
    }

    #[test]
    fn every_documented_code_gets_its_glyph() {
        let expected = [
            (200..=232, "⛈"),
            (300..=321, "🌦"),
            (500..=531, "🌧"),
            (600..=622, "❄️"),
            (701..=741, "🌫"),
            (762..=762, "🌋"),
            (771..=771, "🎐🌫"),
            (781..=781, "🌪"),
            (800..=800, "🔆"),
            (801..=804, "☁️"),
        ];
        for (range, glyph) in expected {
            for code in range {
                assert_eq!(emoji_for_weather_code(code), glyph, "code {code}");
            }
        }
    }

    #[test]
    fn unknown_codes_fall_back() {
        for code in [900, -1, 0, 233, 499, 742, 761, 805, i64::MIN, i64::MAX] {
            assert_eq!(emoji_for_weather_code(code), FALLBACK_EMOJI, "code {code}");
        }
    }

    #[test]
    fn emoji_ranges_do_not_overlap() {
        for (i, (lo, hi, _)) in WEATHER_EMOJI.iter().enumerate() {
            assert!(lo <= hi);
            for (other_lo, other_hi, _) in &WEATHER_EMOJI[i + 1..] {
                assert!(hi < other_lo || other_hi < lo);
            }
        }
    }

    #[test]
    fn known_statuses_use_fixed_messages() {
        assert_eq!(classify_http_status(404, "ignored").as_str(), "Not Found: city not found");
        assert_eq!(classify_http_status(401, "").as_str(), "Unauthorized: check API key");
        assert_eq!(classify_http_status(504, "").as_str(), "Gateway Timeout");
    }

    #[test]
    fn unknown_status_includes_raw_text() {
        let msg = classify_http_status(418, "I'm a teapot");
        assert_eq!(msg.as_str(), "Unexpected error: I'm a teapot");
    }

    #[test]
    fn network_failures_have_fixed_messages_except_other() {
        assert_eq!(
            classify_network_failure(NetworkErrorKind::Timeout, "x").as_str(),
            "Timeout Error: request timed out"
        );
        assert_eq!(
            classify_network_failure(NetworkErrorKind::Connection, "x").as_str(),
            "Connection Error: check your internet connection"
        );
        assert_eq!(
            classify_network_failure(NetworkErrorKind::TooManyRedirects, "x").as_str(),
            "Too Many Redirects: check the URL"
        );
        assert_eq!(
            classify_network_failure(NetworkErrorKind::Other, "builder error").as_str(),
            "Request error: builder error"
        );
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(round_tenth(0.25), 0.3);
        assert_eq!(round_tenth(-0.25), -0.3);
        assert_eq!(round_tenth(0.24), 0.2);
        assert!(round_tenth(-0.01).is_sign_positive());
    }

    #[test]
    fn kelvin_300_renders_as_26_9() {
        let fields = format_reading(&reading(), &Utc);
        assert_eq!(fields.temperature, "26.9");
    }

    #[test]
    fn temperature_rounds_down_below_half() {
        let mut r = reading();
        r.temperature_kelvin = 283.19;
        assert_eq!(format_reading(&r, &Utc).temperature, "10.0");
    }

    #[test]
    fn just_below_freezing_shows_no_negative_zero() {
        let mut r = reading();
        r.temperature_kelvin = 273.14;
        assert_eq!(format_reading(&r, &Utc).temperature, "0.0");
    }

    #[test]
    fn humidity_and_wind_have_one_decimal() {
        let fields = format_reading(&reading(), &Utc);
        assert_eq!(fields.humidity, "45.0");
        assert_eq!(fields.wind, "3.1");
    }

    #[test]
    fn sunrise_is_pinned_to_the_given_zone() {
        assert_eq!(format_clock(1_700_000_000, &Utc), "10:13 PM");

        let cet = FixedOffset::east_opt(3600).unwrap();
        assert_eq!(format_clock(1_700_000_000, &cet), "11:13 PM");

        let fields = format_reading(&reading(), &Utc);
        assert_eq!(fields.sunrise, "10:13 PM");
        assert_eq!(fields.sunset, "08:13 AM");
    }

    #[test]
    fn out_of_range_epoch_renders_placeholder() {
        assert_eq!(format_clock(i64::MAX, &Utc), "--:--");
    }

    #[test]
    fn description_only_first_letter_changes() {
        assert_eq!(capitalize_first("clear sky"), "Clear sky");
        assert_eq!(capitalize_first("light RAIN"), "Light RAIN");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn formatting_a_parsed_payload_is_idempotent() {
        let body = r#"{
            "weather": [{"id": 501, "main": "Rain", "description": "moderate rain"}],
            "main": {"temp": 285.37, "humidity": 88},
            "wind": {"speed": 6.2},
            "sys": {"country": "NO", "sunrise": 1700031600, "sunset": 1700058000},
            "timezone": 3600,
            "name": "Bergen",
            "cod": 200
        }"#;
        let r = parse_reading(body).expect("well-formed payload");

        let first = format_reading(&r, &Utc);
        assert_eq!(first, format_reading(&r, &Utc));
        assert_eq!(first.temperature, "12.2");
        assert_eq!(first.emoji, "🌧");
        assert_eq!(first.description, "Moderate rain");
    }

    #[test]
    fn malformed_payload_message_has_a_single_prefix() {
        let message = match parse_reading(r#"{"cod": 200}"#) {
            Err(WeatherError::MalformedResponse(message)) => message,
            other => panic!("expected malformed response, got {other:?}"),
        };
        let shown = present(&HttpOutcome::MalformedResponse { message }, &Utc);

        let Presentation::Error(msg) = shown else {
            panic!("expected error presentation");
        };
        assert!(msg.as_str().starts_with("Malformed response: missing field"));
        assert_eq!(msg.as_str().matches("alformed response").count(), 1);
    }

    #[test]
    fn city_clock_uses_reported_offset() {
        let mut r = reading();
        r.utc_offset_seconds = Some(3600);
        let shown = present_with_clock(&HttpOutcome::Success(r.clone()), Clock::City);
        assert!(matches!(shown, Presentation::Weather(ref f) if f.sunrise == "11:13 PM"));

        r.utc_offset_seconds = None;
        let shown = present_with_clock(&HttpOutcome::Success(r), Clock::City);
        assert!(matches!(shown, Presentation::Weather(ref f) if f.sunrise == "10:13 PM"));
    }

    #[test]
    fn present_routes_each_outcome() {
        let ok = present(&HttpOutcome::Success(reading()), &Utc);
        assert!(matches!(ok, Presentation::Weather(ref f) if f.emoji == "🔆"));

        let http = present(
            &HttpOutcome::HttpError { status: 404, message: "city not found".into() },
            &Utc,
        );
        assert_eq!(http, Presentation::Error(DisplayMessage::new("Not Found: city not found")));

        let bad = present(
            &HttpOutcome::MalformedResponse { message: "missing field `temp`".into() },
            &Utc,
        );
        assert_eq!(
            bad,
            Presentation::Error(DisplayMessage::new("Malformed response: missing field `temp`"))
        );
    }
}

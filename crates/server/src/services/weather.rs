//! Current weather from Open-Meteo, worded by the assistant.
//!
//! Measurements come from the public Open-Meteo forecast API. The assistant
//! then turns the raw readings into a localized sky description, a place
//! name and a farming tip. Results are cached for 10 minutes per rounded
//! coordinate pair and language.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::{Deserialize, Serialize};
use sheti_core::Language;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::ai::Assistant;

const OPEN_METEO_URL: &str = "https://api.open-meteo.com/v1/forecast";
const CURRENT_FIELDS: &str =
    "temperature_2m,relative_humidity_2m,wind_speed_10m,wind_direction_10m,weather_code";
const CACHE_TTL: Duration = Duration::from_secs(600);

const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Errors fetching weather.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Weather API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse weather response: {0}")]
    Parse(String),
}

/// Raw readings at a point.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub latitude: f64,
    pub longitude: f64,
    /// Degrees Celsius
    pub temperature: f64,
    /// Percent
    pub humidity: f64,
    /// km/h
    pub wind_speed: f64,
    /// 16-point compass direction the wind blows from
    pub wind_direction: &'static str,
    pub weather_code: u8,
    /// English description of `weather_code`
    pub description: &'static str,
}

/// Weather card shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weather {
    pub temperature: f64,
    pub condition: String,
    pub wind_speed: f64,
    pub wind_direction: String,
    pub humidity: f64,
    pub recommendation: String,
    pub location: String,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    latitude: f64,
    longitude: f64,
    current: CurrentBlock,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    wind_speed_10m: f64,
    wind_direction_10m: f64,
    weather_code: u8,
}

#[derive(Debug, Deserialize)]
struct ForecastError {
    reason: String,
}

/// Weather lookups with caching.
#[derive(Clone)]
pub struct WeatherService {
    inner: Arc<WeatherServiceInner>,
}

struct WeatherServiceInner {
    client: reqwest::Client,
    endpoint: String,
    assistant: Assistant,
    cache: Cache<String, Weather>,
}

impl std::fmt::Debug for WeatherService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherService")
            .field("endpoint", &self.inner.endpoint)
            .field("cached", &self.inner.cache.entry_count())
            .finish_non_exhaustive()
    }
}

impl WeatherService {
    /// Create a weather service that words readings with `assistant`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(assistant: Assistant, timeout: Duration) -> Result<Self, WeatherError> {
        let cache = Cache::builder()
            .max_capacity(5000)
            .time_to_live(CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(WeatherServiceInner {
                client: reqwest::Client::builder().timeout(timeout).build()?,
                endpoint: OPEN_METEO_URL.to_string(),
                assistant,
                cache,
            }),
        })
    }

    /// Localized weather for a coordinate pair.
    ///
    /// If the assistant cannot word the readings, the English description is
    /// returned with an empty tip and the result is not cached.
    ///
    /// # Errors
    ///
    /// Returns an error for out-of-range coordinates or when Open-Meteo
    /// cannot be reached.
    #[instrument(skip(self), fields(lang = %lang))]
    pub async fn current(&self, lat: f64, lng: f64, lang: Language) -> Result<Weather, WeatherError> {
        validate_coordinates(lat, lng)?;

        let key = cache_key(lat, lng, lang);
        if let Some(weather) = self.inner.cache.get(&key).await {
            debug!("Cache hit for weather");
            return Ok(weather);
        }

        let conditions = self.fetch(lat, lng).await?;

        match self.inner.assistant.describe_weather(&conditions, lang).await {
            Ok(wording) => {
                let weather = Weather {
                    temperature: conditions.temperature,
                    condition: wording.condition,
                    wind_speed: conditions.wind_speed,
                    wind_direction: conditions.wind_direction.to_string(),
                    humidity: conditions.humidity,
                    recommendation: wording.recommendation,
                    location: wording.location,
                };
                self.inner.cache.insert(key, weather.clone()).await;
                Ok(weather)
            }
            Err(e) => {
                warn!(error = %e, "Weather wording failed, returning raw readings");
                Ok(raw_weather(&conditions))
            }
        }
    }

    /// Fetch current readings from Open-Meteo.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn fetch(&self, lat: f64, lng: f64) -> Result<CurrentConditions, WeatherError> {
        let url = url::Url::parse_with_params(
            &self.inner.endpoint,
            &[
                ("latitude", lat.to_string()),
                ("longitude", lng.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("timezone", "auto".to_string()),
            ],
        )
        .map_err(|e| WeatherError::Parse(e.to_string()))?;

        let response = self.inner.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ForecastError>(&body)
                .map_or(body, |e| e.reason);
            return Err(WeatherError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let forecast: ForecastResponse =
            serde_json::from_str(&body).map_err(|e| WeatherError::Parse(e.to_string()))?;
        Ok(conditions_from(&forecast))
    }
}

fn conditions_from(forecast: &ForecastResponse) -> CurrentConditions {
    let current = &forecast.current;
    CurrentConditions {
        latitude: forecast.latitude,
        longitude: forecast.longitude,
        temperature: current.temperature_2m,
        humidity: current.relative_humidity_2m,
        wind_speed: current.wind_speed_10m,
        wind_direction: compass_direction(current.wind_direction_10m),
        weather_code: current.weather_code,
        description: describe_code(current.weather_code),
    }
}

fn raw_weather(conditions: &CurrentConditions) -> Weather {
    Weather {
        temperature: conditions.temperature,
        condition: conditions.description.to_string(),
        wind_speed: conditions.wind_speed,
        wind_direction: conditions.wind_direction.to_string(),
        humidity: conditions.humidity,
        recommendation: String::new(),
        location: format!("{:.2}, {:.2}", conditions.latitude, conditions.longitude),
    }
}

fn validate_coordinates(lat: f64, lng: f64) -> Result<(), WeatherError> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(WeatherError::InvalidCoordinates(format!(
            "latitude {lat} must be between -90 and 90"
        )));
    }
    if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
        return Err(WeatherError::InvalidCoordinates(format!(
            "longitude {lng} must be between -180 and 180"
        )));
    }
    Ok(())
}

/// Two decimals is roughly a kilometre.
fn cache_key(lat: f64, lng: f64, lang: Language) -> String {
    format!("{lat:.2},{lng:.2}:{}", lang.code())
}

/// Convert a bearing in degrees to a 16-point compass direction.
#[must_use]
pub fn compass_direction(degrees: f64) -> &'static str {
    let normalized = degrees.rem_euclid(360.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let index = ((normalized / 22.5) + 0.5).floor() as usize % COMPASS_POINTS.len();
    COMPASS_POINTS.get(index).copied().unwrap_or("N")
}

/// English description of a WMO weather interpretation code.
#[must_use]
pub const fn describe_code(code: u8) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 | 57 => "Freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 | 67 => "Freezing rain",
        71 => "Slight snowfall",
        73 => "Moderate snowfall",
        75 => "Heavy snowfall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 | 86 => "Snow showers",
        95 => "Thunderstorm",
        96 | 99 => "Thunderstorm with hail",
        _ => "Unknown conditions",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_compass_direction() {
        assert_eq!(compass_direction(0.0), "N");
        assert_eq!(compass_direction(11.0), "N");
        assert_eq!(compass_direction(12.0), "NNE");
        assert_eq!(compass_direction(90.0), "E");
        assert_eq!(compass_direction(225.0), "SW");
        assert_eq!(compass_direction(350.0), "N");
        assert_eq!(compass_direction(-90.0), "W");
        assert_eq!(compass_direction(720.0), "N");
    }

    #[test]
    fn test_describe_code() {
        assert_eq!(describe_code(0), "Clear sky");
        assert_eq!(describe_code(63), "Moderate rain");
        assert_eq!(describe_code(99), "Thunderstorm with hail");
        assert_eq!(describe_code(42), "Unknown conditions");
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates(18.52, 73.86).is_ok());
        assert!(validate_coordinates(90.0, -180.0).is_ok());
        assert!(validate_coordinates(90.1, 0.0).is_err());
        assert!(validate_coordinates(0.0, 181.0).is_err());
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_cache_key_rounds() {
        assert_eq!(cache_key(18.5204, 73.8567, Language::Mr), "18.52,73.86:mr");
        assert_eq!(
            cache_key(18.5201, 73.8561, Language::Mr),
            cache_key(18.5204, 73.8567, Language::Mr)
        );
        assert_ne!(
            cache_key(18.52, 73.86, Language::En),
            cache_key(18.52, 73.86, Language::Hi)
        );
    }

    #[test]
    fn test_parse_forecast() {
        let forecast: ForecastResponse = serde_json::from_str(
            r#"{"latitude":18.5,"longitude":73.875,"generationtime_ms":0.05,
                "current_units":{"temperature_2m":"°C"},
                "current":{"time":"2024-06-10T12:00","interval":900,"temperature_2m":31.4,
                  "relative_humidity_2m":48,"wind_speed_10m":14.2,"wind_direction_10m":247,
                  "weather_code":2}}"#,
        )
        .unwrap();
        let conditions = conditions_from(&forecast);
        assert!((conditions.temperature - 31.4).abs() < f64::EPSILON);
        assert!((conditions.humidity - 48.0).abs() < f64::EPSILON);
        assert_eq!(conditions.wind_direction, "WSW");
        assert_eq!(conditions.description, "Partly cloudy");
    }

    #[test]
    fn test_raw_weather_has_empty_tip() {
        let conditions = CurrentConditions {
            latitude: 18.5204,
            longitude: 73.8567,
            temperature: 30.0,
            humidity: 50.0,
            wind_speed: 10.0,
            wind_direction: "W",
            weather_code: 0,
            description: "Clear sky",
        };
        let weather = raw_weather(&conditions);
        assert_eq!(weather.condition, "Clear sky");
        assert!(weather.recommendation.is_empty());
        assert_eq!(weather.location, "18.52, 73.86");
    }
}

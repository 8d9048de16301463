//! Application state shared across handlers.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use sheti_core::Catalog;
use sqlx::PgPool;
use tokio::sync::RwLock;

use crate::ai::{AiError, Assistant};
use crate::config::ShetiConfig;
use crate::services::{IdentityError, IdentityService, WeatherError, WeatherService};

/// Error building application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("AI client: {0}")]
    Ai(#[from] AiError),
    #[error("weather client: {0}")]
    Weather(#[from] WeatherError),
    #[error("identity client: {0}")]
    Identity(#[from] IdentityError),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ShetiConfig,
    pool: PgPool,
    assistant: Assistant,
    weather: WeatherService,
    identity: IdentityService,
    catalog: RwLock<Catalog>,
}

impl AppState {
    /// Build the provider clients and wrap everything in shared state.
    ///
    /// `catalog` is the product list loaded from storage; supplier edits
    /// update it in place after they are written to the database.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built.
    pub fn new(config: ShetiConfig, pool: PgPool, catalog: Catalog) -> Result<Self, StateError> {
        let assistant = Assistant::from_config(&config.ai)?;
        let weather = WeatherService::new(assistant.clone(), config.ai.request_timeout)?;
        let identity = IdentityService::new(&config.identity, config.ai.request_timeout)?;

        Ok(Self::from_parts(
            config, pool, assistant, weather, identity, catalog,
        ))
    }

    /// Assemble state from already built services.
    #[must_use]
    pub fn from_parts(
        config: ShetiConfig,
        pool: PgPool,
        assistant: Assistant,
        weather: WeatherService,
        identity: IdentityService,
        catalog: Catalog,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                assistant,
                weather,
                identity,
                catalog: RwLock::new(catalog),
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ShetiConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[must_use]
    pub fn assistant(&self) -> &Assistant {
        &self.inner.assistant
    }

    #[must_use]
    pub fn weather(&self) -> &WeatherService {
        &self.inner.weather
    }

    #[must_use]
    pub fn identity(&self) -> &IdentityService {
        &self.inner.identity
    }

    /// The in-memory product catalog.
    #[must_use]
    pub fn catalog(&self) -> &RwLock<Catalog> {
        &self.inner.catalog
    }

    /// Today's date in the configured farm timezone.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.inner.config.utc_offset).date_naive()
    }
}

//! Refresh operations and user-triggered loaders over shared [`AppState`].

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    city::CityId,
    client::WeatherApi,
    error::FetchError,
    locale::Locale,
    render::{CardAction, CardView, render_cards},
    report::{ForecastReport, WeatherReport},
    status,
    store::AppState,
};

/// Which cities the periodic data refresh fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPolicy {
    #[default]
    AllCities,
    LastViewed,
}

impl RefreshPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefreshPolicy::AllCities => "all_cities",
            RefreshPolicy::LastViewed => "last_viewed",
        }
    }

    pub const fn all() -> &'static [RefreshPolicy] {
        &[RefreshPolicy::AllCities, RefreshPolicy::LastViewed]
    }
}

impl std::fmt::Display for RefreshPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a bulk refresh. Partial success is normal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    pub refreshed: Vec<CityId>,
    pub failed: Vec<CityId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadResult {
    Weather(WeatherReport),
    Forecast(ForecastReport),
}

#[derive(Debug)]
pub struct Dashboard {
    api: Arc<dyn WeatherApi>,
    state: Arc<AppState>,
    cities: Vec<CityId>,
    locale: Locale,
}

impl Dashboard {
    pub fn new(api: Arc<dyn WeatherApi>, state: Arc<AppState>, cities: Vec<CityId>, locale: Locale) -> Self {
        Self {
            api,
            state,
            cities,
            locale,
        }
    }

    pub fn cities(&self) -> &[CityId] {
        &self.cities
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Fetch one city's current weather into the store.
    ///
    /// Failures are logged and leave the previous snapshot (if any) in place.
    pub async fn refresh_city(&self, city: CityId) -> bool {
        match self.api.current(city.as_str()).await {
            Ok(snapshot) => {
                self.state.record_snapshot(city, snapshot);
                self.state.mark_refreshed(Utc::now());
                tracing::debug!("Refreshed {city}");
                true
            }
            Err(err) => {
                tracing::warn!("Refresh failed for {city}: {err}");
                false
            }
        }
    }

    /// Refresh every configured city concurrently.
    pub async fn refresh_all(&self) -> RefreshSummary {
        let results = join_all(
            self.cities
                .iter()
                .map(|&city| async move { (city, self.refresh_city(city).await) }),
        )
        .await;

        let mut summary = RefreshSummary::default();
        for (city, ok) in results {
            if ok {
                summary.refreshed.push(city);
            } else {
                summary.failed.push(city);
            }
        }

        tracing::info!(
            "Bulk refresh finished: {} refreshed, {} failed",
            summary.refreshed.len(),
            summary.failed.len()
        );
        summary
    }

    /// One tick of the periodic data refresh.
    pub async fn scheduled_refresh(&self, policy: RefreshPolicy) -> RefreshSummary {
        match policy {
            RefreshPolicy::AllCities => self.refresh_all().await,
            RefreshPolicy::LastViewed => {
                // nothing viewed yet: keep the whole board fresh
                let Some(city) = self.state.refresh_state().last_viewed else {
                    tracing::debug!("No city viewed yet, refreshing all cities");
                    return self.refresh_all().await;
                };

                let mut summary = RefreshSummary::default();
                if self.refresh_city(city).await {
                    summary.refreshed.push(city);
                } else {
                    summary.failed.push(city);
                }
                summary
            }
        }
    }

    /// Load current weather for `city` on the user's request.
    pub async fn load_weather(&self, city: CityId) -> Result<WeatherReport, FetchError> {
        self.state.set_last_viewed(city);

        match self.api.current(city.as_str()).await {
            Ok(snapshot) => {
                self.state.record_snapshot(city, snapshot.clone());
                self.state.mark_refreshed(Utc::now());
                Ok(WeatherReport { city, snapshot })
            }
            Err(err) => {
                tracing::error!("Loading weather for {city} failed: {err}");
                Err(err)
            }
        }
    }

    /// Load the 5-day forecast for `city`. Forecasts are not stored.
    pub async fn load_forecast(&self, city: CityId) -> Result<ForecastReport, FetchError> {
        self.state.set_last_viewed(city);

        match self.api.forecast(city.as_str()).await {
            Ok(forecast) => {
                self.state.mark_refreshed(Utc::now());
                Ok(ForecastReport { city, forecast })
            }
            Err(err) => {
                tracing::error!("Loading forecast for {city} failed: {err}");
                Err(err)
            }
        }
    }

    pub async fn dispatch(&self, action: CardAction) -> Result<LoadResult, FetchError> {
        match action {
            CardAction::ShowWeather(city) => self.load_weather(city).await.map(LoadResult::Weather),
            CardAction::ShowForecast(city) => self.load_forecast(city).await.map(LoadResult::Forecast),
        }
    }

    pub fn cards(&self) -> Vec<CardView> {
        render_cards(&self.state.store(), &self.cities)
    }

    pub fn status_label(&self, now: DateTime<Utc>) -> String {
        status::status_label(self.state.refresh_state().last_refresh, now, self.locale)
    }

    pub fn status_line(&self, now: DateTime<Utc>) -> String {
        status::status_line(self.state.refresh_state().last_refresh, now, self.locale)
    }
}

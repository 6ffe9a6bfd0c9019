//! In-memory backend for dashboard and scheduler tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::StatusCode;
use std::{
    collections::HashSet,
    sync::atomic::{AtomicU32, Ordering},
};

use crate::{
    client::WeatherApi,
    error::FetchError,
    model::{Forecast, ForecastDay, WeatherSnapshot},
};

#[derive(Debug, Default)]
pub(crate) struct FakeApi {
    failing: Mutex<HashSet<String>>,
    temperature: Mutex<f64>,
    current_calls: AtomicU32,
    forecast_calls: AtomicU32,
}

impl FakeApi {
    pub(crate) fn failing_for(cities: &[&str]) -> Self {
        let api = Self::default();
        api.failing.lock().extend(cities.iter().map(|c| c.to_string()));
        api
    }

    pub(crate) fn set_failing(&self, city: &str, failing: bool) {
        let mut set = self.failing.lock();
        if failing {
            set.insert(city.to_string());
        } else {
            set.remove(city);
        }
    }

    pub(crate) fn set_temperature(&self, temp: f64) {
        *self.temperature.lock() = temp;
    }

    pub(crate) fn current_calls(&self) -> u32 {
        self.current_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn forecast_calls(&self) -> u32 {
        self.forecast_calls.load(Ordering::SeqCst)
    }

    fn check(&self, city: &str) -> Result<(), FetchError> {
        if self.failing.lock().contains(city) {
            return Err(FetchError::Http {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: "backend down".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl WeatherApi for FakeApi {
    async fn current(&self, city: &str) -> Result<WeatherSnapshot, FetchError> {
        self.current_calls.fetch_add(1, Ordering::SeqCst);
        self.check(city)?;

        let temp = *self.temperature.lock();
        Ok(WeatherSnapshot {
            location: city.to_string(),
            temperature_c: temp,
            condition: "Sunčano".into(),
            emoji: "☀️".into(),
            wind_kmh: 8.0,
            humidity_pct: 65.0,
            feels_like_c: temp - 1.0,
            dramatic_message: Some("Najljepši dan godine!".into()),
        })
    }

    async fn forecast(&self, city: &str) -> Result<Forecast, FetchError> {
        self.forecast_calls.fetch_add(1, Ordering::SeqCst);
        self.check(city)?;

        let days = ["Ponedjeljak", "Utorak", "Srijeda", "Četvrtak", "Petak"]
            .into_iter()
            .map(|date| ForecastDay {
                date: date.into(),
                emoji: "⛅".into(),
                high_c: 12.0,
                low_c: 2.0,
                condition: Some("Djelomično oblačno".into()),
            })
            .collect();

        Ok(Forecast { days })
    }
}

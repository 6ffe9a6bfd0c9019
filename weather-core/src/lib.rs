//! Core library for the `cityweather` dashboard.
//!
//! This crate defines:
//! - The backend client with fixed-delay retry
//! - The per-city snapshot store and refresh state
//! - Card view models and user-facing reports
//! - The background refresh scheduler
//! - Configuration handling
//!
//! It has no terminal code. `cityweather-cli` draws what this crate produces.

pub mod city;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod locale;
pub mod model;
pub mod render;
pub mod report;
pub mod retry;
pub mod scheduler;
pub mod status;
pub mod store;

#[cfg(test)]
mod testing;

pub use city::CityId;
pub use client::{HttpWeatherApi, WeatherApi};
pub use config::Config;
pub use dashboard::{Dashboard, LoadResult, RefreshPolicy, RefreshSummary};
pub use error::FetchError;
pub use locale::Locale;
pub use model::{Forecast, ForecastDay, WeatherSnapshot};
pub use render::{CardAction, CardBoard, CardView, render_cards};
pub use report::{ForecastReport, WeatherReport};
pub use retry::{RetryPolicy, fetch_with_retry};
pub use scheduler::{Scheduler, SchedulerConfig, SchedulerHandle};
pub use status::{status_label, status_line};
pub use store::{AppState, CityStore, RefreshState};

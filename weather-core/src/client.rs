use async_trait::async_trait;
use reqwest::Client;
use std::{fmt::Debug, time::Duration};

use crate::{
    error::FetchError,
    model::{Forecast, WeatherSnapshot, decode_current, decode_forecast},
    retry::{RetryPolicy, fetch_with_retry},
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// The weather backend as seen by the dashboard.
///
/// `city` is passed through as a path segment. It is not checked against
/// the known city list.
#[async_trait]
pub trait WeatherApi: Send + Sync + Debug {
    async fn current(&self, city: &str) -> Result<WeatherSnapshot, FetchError>;

    async fn forecast(&self, city: &str) -> Result<Forecast, FetchError>;
}

/// [`WeatherApi`] over HTTP, with every request wrapped in the retry policy.
#[derive(Debug, Clone)]
pub struct HttpWeatherApi {
    base_url: String,
    retry: RetryPolicy,
    http: Client,
}

impl HttpWeatherApi {
    pub fn new(base_url: impl Into<String>, retry: RetryPolicy) -> Result<Self, FetchError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, kind: &str, city: &str) -> String {
        format!("{}/api/{}/{}", self.base_url, kind, city)
    }

    async fn get_body(&self, url: &str) -> Result<String, FetchError> {
        tracing::debug!("GET {url}");

        let res = self.http.get(url).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(FetchError::http(status, &body));
        }

        Ok(body)
    }
}

#[async_trait]
impl WeatherApi for HttpWeatherApi {
    async fn current(&self, city: &str) -> Result<WeatherSnapshot, FetchError> {
        let url = self.endpoint("weather", city);
        let url = url.as_str();

        fetch_with_retry(self.retry, || async move {
            let body = self.get_body(url).await?;
            decode_current(&body)
        })
        .await
    }

    async fn forecast(&self, city: &str) -> Result<Forecast, FetchError> {
        let url = self.endpoint("forecast", city);
        let url = url.as_str();

        fetch_with_retry(self.retry, || async move {
            let body = self.get_body(url).await?;
            decode_forecast(&body)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_and_city() {
        let api = HttpWeatherApi::new("http://localhost:8080/", RetryPolicy::default()).unwrap();

        assert_eq!(api.base_url(), "http://localhost:8080");
        assert_eq!(
            api.endpoint("weather", "zagreb"),
            "http://localhost:8080/api/weather/zagreb"
        );
        // segments go out exactly as given
        assert_eq!(
            api.endpoint("weather", "Zagreb"),
            "http://localhost:8080/api/weather/Zagreb"
        );
        assert_eq!(
            api.endpoint("forecast", "split"),
            "http://localhost:8080/api/forecast/split"
        );
    }
}

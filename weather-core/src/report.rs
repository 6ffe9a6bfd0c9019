use crate::{
    city::CityId,
    locale::Locale,
    model::{Forecast, ForecastDay, WeatherSnapshot},
};

/// Result of a user-triggered current-weather load.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub city: CityId,
    pub snapshot: WeatherSnapshot,
}

impl WeatherReport {
    pub fn message(&self, locale: Locale) -> String {
        let snap = &self.snapshot;

        let mut msg = format!(
            "{}\n{}: {}°C\n{}: {}\n{}: {}°C",
            snap.location,
            locale.temperature(),
            snap.temperature_c,
            locale.condition(),
            snap.condition,
            locale.feels_like(),
            snap.feels_like_c,
        );

        if let Some(dramatic) = &snap.dramatic_message {
            msg.push_str("\n\n");
            msg.push_str(dramatic);
        }

        msg
    }
}

/// Result of a user-triggered forecast load.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastReport {
    pub city: CityId,
    pub forecast: Forecast,
}

impl ForecastReport {
    /// One line per day, in the order the backend sent them.
    pub fn lines(&self) -> Vec<String> {
        self.forecast.days.iter().map(format_day).collect()
    }

    pub fn message(&self, locale: Locale) -> String {
        let mut msg = locale.forecast_heading(self.city.display_name());
        msg.push('\n');
        for line in self.lines() {
            msg.push('\n');
            msg.push_str(&line);
        }
        msg
    }
}

fn format_day(day: &ForecastDay) -> String {
    let mut line = format!("{}: {} {}°C/{}°C", day.date, day.emoji, day.high_c, day.low_c);
    if let Some(condition) = &day.condition {
        line.push_str(" - ");
        line.push_str(condition);
    }
    line
}

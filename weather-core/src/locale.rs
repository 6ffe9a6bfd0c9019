use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt};

/// Language used for user-facing text. Log output is always English.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Hr,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Hr => "hr",
        }
    }

    pub const fn all() -> &'static [Locale] {
        &[Locale::En, Locale::Hr]
    }

    pub(crate) fn loading(&self) -> &'static str {
        match self {
            Locale::En => "Loading...",
            Locale::Hr => "Učitavanje...",
        }
    }

    pub(crate) fn just_now(&self) -> &'static str {
        match self {
            Locale::En => "just now",
            Locale::Hr => "upravo sada",
        }
    }

    pub(crate) fn minutes_ago(&self, n: i64) -> String {
        match self {
            Locale::En => format!("{n} minutes ago"),
            Locale::Hr => format!("prije {n} minuta"),
        }
    }

    pub(crate) fn hours_ago(&self, n: i64) -> String {
        match self {
            Locale::En => format!("{n} hours ago"),
            Locale::Hr => format!("prije {n} sati"),
        }
    }

    pub(crate) fn last_refresh_prefix(&self) -> &'static str {
        match self {
            Locale::En => "Last refresh: ",
            Locale::Hr => "Zadnje osvježavanje: ",
        }
    }

    pub(crate) fn temperature(&self) -> &'static str {
        match self {
            Locale::En => "Temperature",
            Locale::Hr => "Temperatura",
        }
    }

    pub(crate) fn condition(&self) -> &'static str {
        match self {
            Locale::En => "Condition",
            Locale::Hr => "Stanje",
        }
    }

    pub(crate) fn feels_like(&self) -> &'static str {
        match self {
            Locale::En => "Feels like",
            Locale::Hr => "Osjeća se kao",
        }
    }

    pub(crate) fn forecast_heading(&self, city: &str) -> String {
        match self {
            Locale::En => format!("5-day forecast for {city}:"),
            Locale::Hr => format!("Prognoza od 5 dana za {city}:"),
        }
    }

    pub(crate) fn load_failed(&self) -> &'static str {
        match self {
            Locale::En => "Could not load weather data. Please try again later.",
            Locale::Hr => "Greška pri učitavanju podataka. Pokušajte ponovno kasnije.",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Locale {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "hr" => Ok(Locale::Hr),
            _ => Err(anyhow::anyhow!("Unknown locale '{value}'. Supported locales: en, hr.")),
        }
    }
}

//! Interactive prompts built on `inquire`.
//!
//! Prompts block, so the dashboard runs them on the blocking pool while the
//! scheduler keeps ticking.

use anyhow::{Context, Result};
use cityweather_core::{CardAction, CardView, CityId, Config, Locale, RefreshPolicy};
use inquire::{InquireError, MultiSelect, Select, Text};
use std::fmt;

use crate::view::card_summary;

#[derive(Debug, Clone)]
pub enum MainChoice {
    Card(CardView),
    RefreshAll,
    Quit,
}

impl fmt::Display for MainChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MainChoice::Card(card) => f.write_str(&card_summary(card)),
            MainChoice::RefreshAll => f.write_str("↻ Refresh all cities"),
            MainChoice::Quit => f.write_str("✕ Quit"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ActionChoice {
    Run(CardAction),
    Back,
}

impl fmt::Display for ActionChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionChoice::Run(CardAction::ShowWeather(_)) => f.write_str("Current weather"),
            ActionChoice::Run(CardAction::ShowForecast(_)) => f.write_str("5-day forecast"),
            ActionChoice::Back => f.write_str("Back"),
        }
    }
}

/// Esc and Ctrl-C mean "leave this menu", not an error.
fn cancelled_as<T>(result: Result<T, InquireError>, fallback: T) -> Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(fallback),
        Err(err) => Err(err).context("Prompt failed"),
    }
}

pub async fn choose_card(cards: Vec<CardView>) -> Result<MainChoice> {
    let mut options: Vec<MainChoice> = cards.into_iter().map(MainChoice::Card).collect();
    options.push(MainChoice::RefreshAll);
    options.push(MainChoice::Quit);

    let result = tokio::task::spawn_blocking(move || Select::new("Pick a city:", options).prompt())
        .await
        .context("Prompt task failed")?;

    cancelled_as(result, MainChoice::Quit)
}

pub async fn choose_action(card: &CardView) -> Result<ActionChoice> {
    // Each entry maps to exactly one action; picking the forecast never loads current weather.
    let options = vec![
        ActionChoice::Run(card.primary_action()),
        ActionChoice::Run(card.secondary_action()),
        ActionChoice::Back,
    ];
    let title = format!("{}:", card.title);

    let result = tokio::task::spawn_blocking(move || Select::new(&title, options).prompt())
        .await
        .context("Prompt task failed")?;

    cancelled_as(result, ActionChoice::Back)
}

pub async fn pause() -> Result<()> {
    let result =
        tokio::task::spawn_blocking(|| Text::new("Press Enter to go back to the cards").prompt())
            .await
            .context("Prompt task failed")?;

    cancelled_as(result.map(|_| ()), ())
}

/// Walk the user through the editable settings, starting from `current`.
pub async fn configure(current: Config) -> Result<Config> {
    tokio::task::spawn_blocking(move || configure_blocking(&current))
        .await
        .context("Prompt task failed")?
}

fn configure_blocking(current: &Config) -> Result<Config> {
    let base_url = Text::new("Backend base URL:")
        .with_default(&current.base_url)
        .prompt()
        .context("Failed to read base URL")?;

    let selected: Vec<usize> = CityId::all()
        .iter()
        .enumerate()
        .filter(|(_, city)| current.cities.contains(city))
        .map(|(idx, _)| idx)
        .collect();
    let cities = MultiSelect::new("Cities to show:", CityId::all().to_vec())
        .with_default(&selected)
        .prompt()
        .context("Failed to read city selection")?;

    let policies = RefreshPolicy::all().to_vec();
    let cursor = policies
        .iter()
        .position(|p| *p == current.refresh_policy)
        .unwrap_or(0);
    let refresh_policy = Select::new("Periodic refresh covers:", policies)
        .with_starting_cursor(cursor)
        .prompt()
        .context("Failed to read refresh policy")?;

    let locales = Locale::all().to_vec();
    let cursor = locales.iter().position(|l| *l == current.locale).unwrap_or(0);
    let locale = Select::new("Language:", locales)
        .with_starting_cursor(cursor)
        .prompt()
        .context("Failed to read language")?;

    let cfg = Config {
        base_url,
        cities,
        refresh_policy,
        locale,
        ..current.clone()
    };
    cfg.validate()?;
    Ok(cfg)
}

//! Projection of the city store onto weather cards.
//!
//! [`render_cards`] is a pure function from store to view models. UIs either
//! redraw from its output or feed it to a [`CardBoard`], which patches cards in
//! place keyed by [`CityId`].

use std::collections::HashSet;

use crate::{city::CityId, model::WeatherSnapshot, store::CityStore};

pub const UNAVAILABLE_TEMPERATURE: &str = "N/A";
pub const UNAVAILABLE_CONDITION: &str = "Data unavailable";

/// What a card can ask the dashboard to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardAction {
    ShowWeather(CityId),
    ShowForecast(CityId),
}

impl CardAction {
    pub fn city(&self) -> CityId {
        match self {
            CardAction::ShowWeather(city) | CardAction::ShowForecast(city) => *city,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub city: CityId,
    pub title: String,
    pub emoji: String,
    pub temperature: String,
    pub condition: String,
    pub wind: String,
    pub humidity: String,
    pub available: bool,
}

impl CardView {
    fn live(city: CityId, snap: &WeatherSnapshot) -> Self {
        Self {
            city,
            title: snap.location.clone(),
            emoji: snap.emoji.clone(),
            temperature: format!("{}°C", snap.temperature_c),
            condition: snap.condition.clone(),
            wind: format!("💨 {} km/h", snap.wind_kmh),
            humidity: format!("💧 {}%", snap.humidity_pct),
            available: true,
        }
    }

    fn placeholder(city: CityId) -> Self {
        Self {
            city,
            title: city.display_name().to_string(),
            emoji: "❔".to_string(),
            temperature: UNAVAILABLE_TEMPERATURE.to_string(),
            condition: UNAVAILABLE_CONDITION.to_string(),
            wind: String::new(),
            humidity: String::new(),
            available: false,
        }
    }

    /// Clicking the card body: current weather.
    pub fn primary_action(&self) -> CardAction {
        CardAction::ShowWeather(self.city)
    }

    /// The card's forecast button. Fires on its own, never with the primary action.
    pub fn secondary_action(&self) -> CardAction {
        CardAction::ShowForecast(self.city)
    }
}

/// One card per city in `cities`, in that order.
///
/// Cities without a snapshot get a placeholder card rather than being
/// dropped. Repeated ids produce a single card.
pub fn render_cards(store: &CityStore, cities: &[CityId]) -> Vec<CardView> {
    let mut seen = HashSet::new();

    cities
        .iter()
        .copied()
        .filter(|city| seen.insert(*city))
        .map(|city| match store.get_snapshot(city) {
            Some(snap) => CardView::live(city, snap),
            None => CardView::placeholder(city),
        })
        .collect()
}

/// Retained set of cards, updated in place by city.
#[derive(Debug, Clone, Default)]
pub struct CardBoard {
    cards: Vec<CardView>,
}

impl CardBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Patch the board with freshly rendered views.
    ///
    /// Existing cards are updated in place, new cities are appended. Returns
    /// how many cards changed, so callers can skip redrawing when nothing did.
    pub fn apply(&mut self, views: Vec<CardView>) -> usize {
        let mut changed = 0;

        for view in views {
            match self.cards.iter_mut().find(|card| card.city == view.city) {
                Some(card) if *card == view => {}
                Some(card) => {
                    *card = view;
                    changed += 1;
                }
                None => {
                    self.cards.push(view);
                    changed += 1;
                }
            }
        }

        changed
    }

    pub fn card(&self, city: CityId) -> Option<&CardView> {
        self.cards.iter().find(|card| card.city == city)
    }

    pub fn cards(&self) -> &[CardView] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

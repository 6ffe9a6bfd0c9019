use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use cityweather_core::{
    AppState, CardBoard, CityId, Config, Dashboard, HttpWeatherApi, LoadResult, Scheduler,
    SchedulerHandle,
};
use std::sync::Arc;

use crate::{
    prompt::{self, ActionChoice, MainChoice},
    view,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cityweather", version, about = "Weather cards for Croatian cities")]
pub struct Cli {
    /// Backend base URL, overriding the config file for this run.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Output language ("en" or "hr"), overriding the config file.
    #[arg(long, global = true)]
    pub locale: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive dashboard with background refresh (default).
    Dashboard,

    /// Keep the board on screen and redraw as data and status change.
    Watch,

    /// Show current weather for one city.
    Show {
        /// City name, e.g. "zagreb".
        city: String,
    },

    /// Show the 5-day forecast for one city.
    Forecast {
        /// City name, e.g. "split".
        city: String,
    },

    /// Edit and save the configuration file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let Cli {
            base_url,
            locale,
            command,
        } = self;
        let load = || -> Result<Config> {
            Config::load()?.with_overrides(base_url.as_deref(), locale.as_deref())
        };

        match command.unwrap_or(Command::Dashboard) {
            Command::Configure => {
                if base_url.is_some() || locale.is_some() {
                    tracing::warn!("--base-url and --locale are ignored by `configure`");
                }
                // a broken file must not lock the user out of fixing it
                let updated = prompt::configure(Config::load_or_default()).await?;
                let path = updated.save()?;
                println!("Saved configuration to {}", path.display());
            }
            Command::Show { city } => {
                let config = load()?;
                let city = CityId::try_from(city.as_str())?;
                let dash = build_dashboard(&config)?;
                match dash.load_weather(city).await {
                    Ok(report) => println!("{}", report.message(config.locale)),
                    Err(err) => bail!("{}", err.user_message(config.locale)),
                }
            }
            Command::Forecast { city } => {
                let config = load()?;
                let city = CityId::try_from(city.as_str())?;
                let dash = build_dashboard(&config)?;
                match dash.load_forecast(city).await {
                    Ok(report) => println!("{}", report.message(config.locale)),
                    Err(err) => bail!("{}", err.user_message(config.locale)),
                }
            }
            Command::Dashboard => {
                let config = load()?;
                let dash = build_dashboard(&config)?;
                let handle = start(&dash, &config).await;
                let result = interactive(&dash, &handle).await;
                handle.shutdown().await;
                result?;
            }
            Command::Watch => {
                let config = load()?;
                let dash = build_dashboard(&config)?;
                let handle = start(&dash, &config).await;
                let result = watch(&dash, &handle).await;
                handle.shutdown().await;
                result?;
            }
        }

        Ok(())
    }
}

fn build_dashboard(config: &Config) -> Result<Arc<Dashboard>> {
    let api = HttpWeatherApi::new(config.base_url.clone(), config.retry_policy())
        .context("Failed to create HTTP client")?;

    Ok(Arc::new(Dashboard::new(
        Arc::new(api),
        Arc::new(AppState::new()),
        config.city_ids().to_vec(),
        config.locale,
    )))
}

/// Initial bulk load, then the background timers.
async fn start(dash: &Arc<Dashboard>, config: &Config) -> SchedulerHandle {
    println!("Loading weather for {} cities from {}...", dash.cities().len(), config.base_url);

    let summary = dash.refresh_all().await;
    if !summary.failed.is_empty() {
        tracing::warn!("Initial load failed for: {:?}", summary.failed);
    }

    Scheduler::start(dash.clone(), config.scheduler_config())
}

async fn interactive(dash: &Dashboard, handle: &SchedulerHandle) -> Result<()> {
    let mut board = CardBoard::new();
    let status = handle.status();
    let locale = dash.locale();

    loop {
        board.apply(dash.cards());
        let line = status.borrow().clone();
        view::redraw(board.cards(), &line);

        let card = match prompt::choose_card(board.cards().to_vec()).await? {
            MainChoice::Card(card) => card,
            MainChoice::RefreshAll => {
                dash.refresh_all().await;
                continue;
            }
            MainChoice::Quit => return Ok(()),
        };

        let action = match prompt::choose_action(&card).await? {
            ActionChoice::Run(action) => action,
            ActionChoice::Back => continue,
        };

        let message = match dash.dispatch(action).await {
            Ok(LoadResult::Weather(report)) => report.message(locale),
            Ok(LoadResult::Forecast(report)) => report.message(locale),
            Err(err) => err.user_message(locale).to_string(),
        };

        println!("\n{message}\n");
        prompt::pause().await?;
    }
}

async fn watch(dash: &Dashboard, handle: &SchedulerHandle) -> Result<()> {
    let mut board = CardBoard::new();
    let mut status = handle.status();

    loop {
        board.apply(dash.cards());
        let line = status.borrow_and_update().clone();
        view::redraw(board.cards(), &line);

        tokio::select! {
            res = tokio::signal::ctrl_c() => {
                res.context("Failed to listen for Ctrl-C")?;
                return Ok(());
            }
            res = status.changed() => {
                if res.is_err() {
                    return Ok(());
                }
            }
        }
    }
}

use anyhow::Result;
use clap::{Parser, ValueEnum};
use skypulse::api::{AnalyticsApi, ApiClient};
use skypulse::ui::widgets::{NavState, Navigation, Route};
use skypulse::{logging, App, Config};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StartPage {
    Dashboard,
    Trending,
    UserAnalytics,
}

impl From<StartPage> for Route {
    fn from(page: StartPage) -> Self {
        match page {
            StartPage::Dashboard => Route::Dashboard,
            StartPage::Trending => Route::Trending,
            StartPage::UserAnalytics => Route::UserAnalytics,
        }
    }
}

/// Terminal dashboard for Bluesky analytics
#[derive(Parser, Debug)]
#[command(name = "skypulse", version)]
#[command(about = "Recent posts, trending hashtags and per-user engagement in your terminal", long_about = None)]
struct Cli {
    /// Base URL of the analytics API
    #[arg(long, env = "SKYPULSE_API_URL", value_name = "URL")]
    api_url: Option<String>,

    /// Config file (defaults to the user config directory)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Page shown at startup
    #[arg(long, value_enum, default_value = "dashboard")]
    page: StartPage,

    /// Open user analytics for this account right away
    #[arg(long, value_name = "NAME")]
    user: Option<String>,
}

impl Cli {
    fn start(&self) -> Navigation {
        match &self.user {
            Some(user) => Navigation::with_state(
                Route::UserAnalytics,
                NavState::Username(user.clone()),
            ),
            None => Navigation::to(self.page.into()),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = logging::init()?;
    tracing::info!("Skypulse starting, logging to {}", log_path.display());

    let config = Config::load(cli.config.as_deref())?.with_api_url(cli.api_url.clone())?;
    tracing::info!("Using API at {}", config.api.base_url);

    let api: Arc<dyn AnalyticsApi> = Arc::new(ApiClient::new(&config.api)?);
    let mut app = App::new(config, api, cli.start());

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal).await;
    ratatui::restore();

    if let Err(e) = &result {
        tracing::error!("Exited with error: {:#}", e);
    }
    result
}

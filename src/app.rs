use anyhow::{Context, Result};
use crossterm::terminal;

use crate::config;
use crate::data;
use crate::display::TerminalDisplay;
use crate::input;
use crate::logging;
use crate::nav;
use crate::storage;
use crate::ui;
use crate::v2ex;

pub fn run() -> Result<()> {
    let cfg = config::load(config::LoadOptions::default()).context("load config")?;

    match logging::init(&cfg.log) {
        Ok(path) => tracing::info!(version = crate::VERSION, log = %path.display(), "starting"),
        Err(err) => eprintln!("warning: logging disabled: {err:#}"),
    }

    let client = v2ex::Client::new(v2ex::ClientConfig {
        base_url: cfg.site.base_url.clone(),
        list_path: cfg.site.list_path.clone(),
        user_agent: cfg.site.user_agent.clone(),
        timeout: cfg.site.timeout,
        http_client: None,
    })
    .context("build v2ex client")?;
    let source = data::V2exTopicSource::new(client)?;

    let store = storage::Store::open(storage::Options {
        path: cfg.cache.path.clone(),
    })
    .context("open topic cache")?;
    tracing::debug!(cache = %store.path().display(), "topic cache location");

    let state = nav::ViewState::new(cfg.paging.topics_per_page, cfg.paging.comments_per_page);
    let mut navigator = nav::Navigator::new(source, store, TerminalDisplay::stdout(), state)
        .with_width(screen_width());

    let mut input = input::open_stdin();
    navigator.run(input.as_mut())
}

/// Terminal columns minus one so full-width lines do not trigger autowrap.
fn screen_width() -> usize {
    terminal::size()
        .map(|(cols, _)| usize::from(cols).saturating_sub(1))
        .ok()
        .filter(|cols| *cols > 0)
        .unwrap_or(ui::DEFAULT_WIDTH)
}

use std::time::Duration;

use anyhow::{bail, Context};
use log::LevelFilter;
use news_app::{
    open_article, CommandViewer, LoadController, SettingsStore, TcpProbe, TerminalPresenter,
};
use news_core::SearchEndpoint;
use news_engine::{EngineHandle, FetchSettings};
use news_logging::{news_info, LogDestination};

const LOAD_TIMEOUT: Duration = Duration::from_secs(45);

/// Loads the news list once with the settings in `./news_settings.ron` and
/// prints it. `news_app <n>` additionally opens the n-th article.
fn main() -> anyhow::Result<()> {
    news_logging::initialize(LogDestination::default_file(), LevelFilter::Info);

    let selection = std::env::args()
        .nth(1)
        .map(|arg| arg.parse::<usize>().context("selection must be a row number"))
        .transpose()?;

    let mut endpoint = SearchEndpoint::default();
    if let Ok(key) = std::env::var("GUARDIAN_API_KEY") {
        endpoint = endpoint.with_api_key(key);
    }

    let store = SettingsStore::in_dir(&std::env::current_dir()?);
    news_info!("Using settings file {:?}", store.path());

    let mut controller = LoadController::new(
        EngineHandle::new(FetchSettings::default()),
        Box::new(TcpProbe::for_endpoint(&endpoint)),
        Box::new(store),
        TerminalPresenter::new(std::io::stdout()),
    )
    .with_endpoint(endpoint);

    controller.start();
    if !controller.pump_until_settled(LOAD_TIMEOUT) {
        controller.dispose();
        bail!("no response within {LOAD_TIMEOUT:?}");
    }

    if let Some(row) = selection {
        let article = row
            .checked_sub(1)
            .and_then(|index| controller.articles().get(index))
            .cloned()
            .with_context(|| format!("no article at row {row}"))?;
        open_article(&CommandViewer::platform_default(), &article)?;
    }

    controller.dispose();
    Ok(())
}

use anyhow::Context;
use clap::Parser;
use geolist::api::local::{GeoData, LocalGeoApi};
use geolist::api::{GeoApi, HttpGeoApi};
use geolist::config::{Backend, Cli, Config, read_geo_data};
use geolist::core::suggestions::SuggestionList;
use geolist::logging;
use geolist::runtime::{RequestExecutor, Runtime, Session};
use geolist::terminal::Terminal;
use geolist::widgets::{GeoListOptions, GeoListWidget};
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::resolve(cli).context("loading configuration")?;
    logging::init(config.log_file.as_deref()).context("setting up logging")?;

    let (api, default_states): (Arc<dyn GeoApi>, SuggestionList) = match &config.backend {
        Backend::Http { base_url, timeout } => {
            tracing::info!(%base_url, ?timeout, "using geo server");
            (
                Arc::new(HttpGeoApi::new(base_url.clone(), *timeout)),
                SuggestionList::us_states(),
            )
        }
        Backend::Local { geo_data } => {
            let data = match geo_data {
                Some(path) => read_geo_data(path).context("loading geography data")?,
                None => GeoData::demo(),
            };
            tracing::info!(states = data.states().len(), "using offline geo data");
            let states = SuggestionList::new(data.states());
            (Arc::new(LocalGeoApi::new(data)), states)
        }
    };

    let widget = GeoListWidget::new(GeoListOptions {
        known_states: config.known_states.clone().unwrap_or(default_states),
        removal_policy: config.removal_policy,
        highlight: config.highlight,
    });
    let session = Session::new(widget, RequestExecutor::new(api));

    let terminal = Terminal::new().context("opening terminal")?;
    Runtime::new(session, terminal)
        .run()
        .context("running terminal session")
}

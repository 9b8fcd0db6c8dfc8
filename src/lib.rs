pub mod api;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod runtime;
pub mod terminal;
pub mod ui;
pub mod widgets;

pub use api::{GeoApi, HttpGeoApi, LocalGeoApi};
pub use config::{Cli, Config};
pub use widgets::{GeoListOptions, GeoListWidget};

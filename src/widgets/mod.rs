pub mod base;
pub mod geo_list;
pub mod text_field;
pub mod traits;

pub use geo_list::{GeoListOptions, GeoListWidget};

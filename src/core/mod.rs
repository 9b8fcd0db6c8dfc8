pub mod geo;
pub mod search;
pub mod store;
pub mod suggestions;

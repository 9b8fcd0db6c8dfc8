pub mod effect;
pub mod executor;
pub mod runner;

pub use executor::RequestExecutor;
pub use runner::{Runtime, Session};

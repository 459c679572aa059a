//! Pipeline module - load, profile, prune and impute

pub mod clean;
pub mod config;
pub mod error;
pub mod impute;
pub mod loader;
pub mod missing;
pub mod prune;

pub use clean::*;
pub use config::*;
pub use error::*;
pub use impute::*;
pub use loader::*;
pub use missing::*;
pub use prune::*;

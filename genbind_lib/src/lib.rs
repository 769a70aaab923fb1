pub mod cast;
pub mod config;
pub mod context;
pub mod error;
pub mod generate;
pub mod passes;

pub use config::{Config, ConfigBuilder, ConfigErr};
pub use error::BindError;
pub use generate::generate;

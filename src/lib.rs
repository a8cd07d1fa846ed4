pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{toml_config::TomlConfig, LocalStorage};

pub use crate::core::classifier::classify;
pub use crate::core::legend::generate_legend;
pub use crate::core::{etl::MapEngine, pipeline::MapPipeline};
pub use utils::error::{MapError, Result};

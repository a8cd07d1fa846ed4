#[cfg(feature = "cli")]
pub mod cli;
pub mod local;
pub mod toml_config;

pub const DEFAULT_ARCHIVE_NAME: &str = "quakemap_output.zip";

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use local::LocalStorage;

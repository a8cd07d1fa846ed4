use crate::config::DEFAULT_ARCHIVE_NAME;
use crate::core::source::USGS_ALL_WEEK;
use crate::domain::model::{InvalidFeaturePolicy, OutputFormat};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "quakemap")]
#[command(about = "Builds a depth-colored earthquake map document from a GeoJSON feed")]
pub struct CliConfig {
    /// Earthquake GeoJSON feed (URL or local file)
    #[arg(long, default_value = USGS_ALL_WEEK)]
    pub quake_endpoint: String,

    /// Tectonic plate GeoJSON (URL or local file); enables the plate map
    #[arg(long)]
    pub plates_source: Option<String>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, value_enum, value_delimiter = ',', default_values = ["json", "csv"])]
    pub formats: Vec<OutputFormat>,

    /// Bundle the output files into a single zip archive
    #[arg(long)]
    pub compress: bool,

    #[arg(long, default_value = DEFAULT_ARCHIVE_NAME)]
    pub archive_name: String,

    #[arg(long, default_value = "30")]
    pub timeout_seconds: u64,

    /// Fail on the first malformed feature instead of skipping it
    #[arg(long)]
    pub strict: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage after each phase")]
    pub monitor: bool,
}

impl ConfigProvider for CliConfig {
    fn quake_endpoint(&self) -> &str {
        &self.quake_endpoint
    }

    fn plates_source(&self) -> Option<&str> {
        self.plates_source.as_deref()
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[OutputFormat] {
        &self.formats
    }

    fn compression_filename(&self) -> Option<&str> {
        self.compress.then_some(self.archive_name.as_str())
    }

    fn request_timeout(&self) -> Option<Duration> {
        Some(Duration::from_secs(self.timeout_seconds))
    }

    fn invalid_feature_policy(&self) -> InvalidFeaturePolicy {
        if self.strict {
            InvalidFeaturePolicy::Fail
        } else {
            InvalidFeaturePolicy::Skip
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_source("quake_endpoint", &self.quake_endpoint)?;
        if let Some(plates) = &self.plates_source {
            validation::validate_source("plates_source", plates)?;
        }
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_non_empty("formats", &self.formats)?;
        validation::validate_unique("formats", &self.formats)?;
        if self.compress {
            validation::validate_path("archive_name", &self.archive_name)?;
        }
        validation::validate_positive_number("timeout_seconds", self.timeout_seconds, 1)
    }
}

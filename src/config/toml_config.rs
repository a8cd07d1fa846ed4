use crate::config::DEFAULT_ARCHIVE_NAME;
use crate::domain::model::{InvalidFeaturePolicy, LatLng, MapView, OutputFormat};
use crate::domain::ports::{ConfigProvider, DEFAULT_LEGEND_TITLE};
use crate::utils::error::{MapError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub map: MapConfig,
    pub source: SourceConfig,
    pub load: LoadConfig,
    pub error_handling: Option<ErrorHandlingConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    pub name: String,
    pub description: Option<String>,
    /// `[latitude, longitude]`
    pub center: Option<[f64; 2]>,
    pub zoom: Option<u8>,
    pub legend_title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub earthquakes: String,
    pub plates: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub headers: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<OutputFormat>,
    pub compression: Option<CompressionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorHandlingConfig {
    pub on_invalid_feature: Option<InvalidFeaturePolicy>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static regex is valid"))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| MapError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${USGS_FEED})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("map.name", &self.map.name)?;
        validation::validate_source("source.earthquakes", &self.source.earthquakes)?;
        if let Some(plates) = &self.source.plates {
            validation::validate_source("source.plates", plates)?;
        }
        if let Some(timeout) = self.source.timeout_seconds {
            validation::validate_positive_number("source.timeout_seconds", timeout, 1)?;
        }

        if let Some([lat, lng]) = self.map.center {
            validation::validate_range("map.center.latitude", lat, -90.0, 90.0)?;
            validation::validate_range("map.center.longitude", lng, -180.0, 180.0)?;
        }
        if let Some(zoom) = self.map.zoom {
            validation::validate_range("map.zoom", zoom, 0, 20)?;
        }

        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_non_empty("load.output_formats", &self.load.output_formats)?;
        validation::validate_unique("load.output_formats", &self.load.output_formats)?;
        if let Some(name) = self.compression_filename() {
            validation::validate_path("load.compression.filename", name)?;
        }

        Ok(())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().is_some_and(|m| m.enabled)
    }

    /// `RUST_LOG`-style directive from `[monitoring] log_level`, if set.
    pub fn log_level(&self) -> Option<&str> {
        self.monitoring.as_ref()?.log_level.as_deref()
    }
}

impl ConfigProvider for TomlConfig {
    fn quake_endpoint(&self) -> &str {
        &self.source.earthquakes
    }

    fn plates_source(&self) -> Option<&str> {
        self.source.plates.as_deref()
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> &[OutputFormat] {
        &self.load.output_formats
    }

    fn compression_filename(&self) -> Option<&str> {
        let compression = self.load.compression.as_ref().filter(|c| c.enabled)?;
        Some(compression.filename.as_deref().unwrap_or(DEFAULT_ARCHIVE_NAME))
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.source.timeout_seconds.map(Duration::from_secs)
    }

    fn invalid_feature_policy(&self) -> InvalidFeaturePolicy {
        self.error_handling
            .as_ref()
            .and_then(|eh| eh.on_invalid_feature)
            .unwrap_or_default()
    }

    fn request_headers(&self) -> Option<&HashMap<String, String>> {
        self.source.headers.as_ref()
    }

    fn map_view(&self) -> MapView {
        let default = MapView::default();
        MapView {
            center: self
                .map
                .center
                .map_or(default.center, |[lat, lng]| LatLng(lat, lng)),
            zoom: self.map.zoom.unwrap_or(default.zoom),
        }
    }

    fn legend_title(&self) -> &str {
        self.map.legend_title.as_deref().unwrap_or(DEFAULT_LEGEND_TITLE)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MINIMAL: &str = r#"
[map]
name = "weekly"

[source]
earthquakes = "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson"

[load]
output_path = "./output"
output_formats = ["json"]
"#;

    #[test]
    fn test_parse_minimal_config_uses_defaults() {
        let config = TomlConfig::from_toml_str(MINIMAL).unwrap();

        assert_eq!(config.map.name, "weekly");
        assert!(config.plates_source().is_none());
        assert_eq!(config.map_view(), MapView::default());
        assert_eq!(config.legend_title(), "Magnitude");
        assert_eq!(config.invalid_feature_policy(), InvalidFeaturePolicy::Skip);
        assert!(config.compression_filename().is_none());
        assert!(config.request_timeout().is_none());
        assert!(!config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[map]
name = "plates"
description = "Earthquakes with tectonic plates"
center = [0.0, 160.0]
zoom = 3
legend_title = "Depth (km)"

[source]
earthquakes = "https://example.com/all_day.geojson"
plates = "./data/PB2002_plates.json"
timeout_seconds = 15

[source.headers]
User-Agent = "quakemap"

[load]
output_path = "./maps"
output_formats = ["json", "csv"]

[load.compression]
enabled = true

[error_handling]
on_invalid_feature = "fail"

[monitoring]
enabled = true
log_level = "quakemap=debug"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.plates_source(), Some("./data/PB2002_plates.json"));
        assert_eq!(config.map_view().center, LatLng(0.0, 160.0));
        assert_eq!(config.map_view().zoom, 3);
        assert_eq!(config.legend_title(), "Depth (km)");
        assert_eq!(config.output_formats(), &[OutputFormat::Json, OutputFormat::Csv]);
        assert_eq!(config.compression_filename(), Some(DEFAULT_ARCHIVE_NAME));
        assert_eq!(config.invalid_feature_policy(), InvalidFeaturePolicy::Fail);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(15)));
        assert_eq!(
            config.request_headers().unwrap().get("User-Agent").map(String::as_str),
            Some("quakemap")
        );
        assert!(config.monitoring_enabled());
        assert_eq!(config.log_level(), Some("quakemap=debug"));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("QUAKEMAP_TEST_FEED", "https://test.example.com/feed.geojson");

        let toml_content = MINIMAL.replace(
            "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson",
            "${QUAKEMAP_TEST_FEED}",
        );
        let config = TomlConfig::from_toml_str(&toml_content).unwrap();
        assert_eq!(config.source.earthquakes, "https://test.example.com/feed.geojson");

        std::env::remove_var("QUAKEMAP_TEST_FEED");
    }

    #[test]
    fn test_unset_env_var_is_left_in_place() {
        let toml_content = MINIMAL.replace("./output", "${QUAKEMAP_UNSET_VAR_FOR_TEST}");
        let config = TomlConfig::from_toml_str(&toml_content).unwrap();
        assert_eq!(config.load.output_path, "${QUAKEMAP_UNSET_VAR_FOR_TEST}");
    }

    #[test]
    fn test_config_validation() {
        let bad_zoom = MINIMAL.replace("name = \"weekly\"", "name = \"weekly\"\nzoom = 25");
        assert!(TomlConfig::from_toml_str(&bad_zoom).unwrap().validate().is_err());

        let bad_center = MINIMAL.replace("name = \"weekly\"", "name = \"weekly\"\ncenter = [95.0, 0.0]");
        assert!(TomlConfig::from_toml_str(&bad_center).unwrap().validate().is_err());

        let no_formats = MINIMAL.replace("[\"json\"]", "[]");
        assert!(TomlConfig::from_toml_str(&no_formats).unwrap().validate().is_err());

        let repeated_formats = MINIMAL.replace("[\"json\"]", "[\"json\", \"csv\", \"json\"]");
        assert!(matches!(
            TomlConfig::from_toml_str(&repeated_formats).unwrap().validate(),
            Err(MapError::InvalidConfigValueError { ref field, .. }) if field == "load.output_formats"
        ));

        let uppercase_scheme = MINIMAL.replace("https://earthquake", "HTTPS://earthquake");
        assert!(TomlConfig::from_toml_str(&uppercase_scheme).unwrap().validate().is_ok());

        let bad_format = MINIMAL.replace("[\"json\"]", "[\"xml\"]");
        assert!(TomlConfig::from_toml_str(&bad_format).is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(MINIMAL.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.map.name, "weekly");
    }
}

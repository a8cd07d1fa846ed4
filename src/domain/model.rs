use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `[latitude, longitude]`, the order web map libraries expect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng(pub f64, pub f64);

impl LatLng {
    pub fn latitude(&self) -> f64 {
        self.0
    }

    pub fn longitude(&self) -> f64 {
        self.1
    }
}

/// One earthquake from the feed. Never mutated after decoding.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuakeFeature {
    pub id: Option<String>,
    pub place: String,
    pub magnitude: f64,
    pub depth_km: f64,
    pub position: LatLng,
    pub occurred_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct QuakeBatch {
    pub features: Vec<QuakeFeature>,
    /// Features dropped by the `Skip` policy.
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlateFeature {
    pub name: Option<String>,
    pub geometry: serde_json::Value,
}

/// One interval of the depth partition. Lower bound inclusive, upper exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorBucket {
    pub lower_bound_km: f64,
    pub upper_bound_km: Option<f64>,
    pub color: &'static str,
}

impl ColorBucket {
    pub fn contains(&self, depth_km: f64) -> bool {
        depth_km >= self.lower_bound_km && self.upper_bound_km.map_or(true, |upper| depth_km < upper)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerStyle {
    pub radius: f64,
    pub fill_color: &'static str,
    pub stroke_color: &'static str,
    pub stroke_weight: f64,
    pub stroke_opacity: f64,
    pub fill_opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopupInfo {
    pub location: String,
    pub depth: f64,
    pub magnitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuakeMarker {
    pub id: Option<String>,
    pub position: LatLng,
    pub style: MarkerStyle,
    pub popup: PopupInfo,
    pub popup_html: String,
    pub occurred_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlateStyle {
    pub stroke_color: &'static str,
    pub stroke_weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlateOverlay {
    pub name: Option<String>,
    pub geometry: serde_json::Value,
    pub style: PlateStyle,
}

/// Raw input handed from extract to transform.
#[derive(Debug, Clone, Default)]
pub struct FeedData {
    pub earthquakes: QuakeBatch,
    pub plates: Option<Vec<PlateFeature>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapVariant {
    Earthquakes,
    EarthquakesWithPlates,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidFeaturePolicy {
    #[default]
    Skip,
    Fail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Csv,
}

impl OutputFormat {
    pub fn file_name(self) -> &'static str {
        match self {
            OutputFormat::Json => "map.json",
            OutputFormat::Csv => "markers.csv",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapView {
    pub center: LatLng,
    pub zoom: u8,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: LatLng(37.09, -95.71),
            zoom: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileLayer {
    pub name: &'static str,
    pub url_template: &'static str,
    pub attribution: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_zoom: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subdomains: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overlays {
    /// Display names of the overlays present, in layer-control order.
    pub names: Vec<&'static str>,
    pub earthquakes: Vec<QuakeMarker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tectonic_plates: Option<Vec<PlateOverlay>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerControl {
    pub collapsed: bool,
    pub base_layers: Vec<&'static str>,
    pub overlays: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub title: String,
    pub position: &'static str,
    pub entries: Vec<LegendEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MapStats {
    pub earthquakes: usize,
    pub plates: usize,
    pub skipped: usize,
}

/// Everything a web map front end needs to draw the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDocument {
    pub generated_at: DateTime<Utc>,
    pub variant: MapVariant,
    pub view: MapView,
    pub base_layers: Vec<TileLayer>,
    pub overlays: Overlays,
    pub initial_layers: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer_control: Option<LayerControl>,
    pub legend: Legend,
    pub stats: MapStats,
}

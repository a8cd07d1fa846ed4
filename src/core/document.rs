use crate::core::adapter::{adapt_plate, adapt_quake};
use crate::core::legend::generate_legend;
use crate::domain::model::{
    FeedData, InvalidFeaturePolicy, LayerControl, Legend, MapDocument, MapStats, MapVariant,
    MapView, Overlays, QuakeMarker, TileLayer,
};
use crate::utils::error::{MapError, Result};
use chrono::Utc;

pub const EARTHQUAKES_OVERLAY: &str = "Earthquakes";
pub const PLATES_OVERLAY: &str = "Tectonic Plates";
const LEGEND_POSITION: &str = "bottomright";

pub const STREET_LAYER: TileLayer = TileLayer {
    name: "Street",
    url_template: "https://tile.openstreetmap.org/{z}/{x}/{y}.png",
    attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors",
    max_zoom: Some(19),
    subdomains: None,
};

pub const TOPOGRAPHIC_LAYER: TileLayer = TileLayer {
    name: "Topographic",
    url_template: "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png",
    attribution: "Map data: &copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors, \
                  <a href=\"http://viewfinderpanoramas.org\">SRTM</a> | Map style: &copy; \
                  <a href=\"https://opentopomap.org\">OpenTopoMap</a> \
                  (<a href=\"https://creativecommons.org/licenses/by-sa/3.0/\">CC-BY-SA</a>)",
    max_zoom: None,
    subdomains: None,
};

pub const DARK_LAYER: TileLayer = TileLayer {
    name: "Dark",
    url_template: "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png",
    attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors \
                  &copy; <a href=\"https://carto.com/attributions\">CARTO</a>",
    max_zoom: Some(20),
    subdomains: Some("abcd"),
};

/// Options for assembling a [`MapDocument`].
#[derive(Debug, Clone)]
pub struct DocumentOptions {
    pub view: MapView,
    pub legend_title: String,
    pub policy: InvalidFeaturePolicy,
}

fn adapt_quakes(data: &FeedData, policy: InvalidFeaturePolicy) -> Result<(Vec<QuakeMarker>, usize)> {
    let mut markers = Vec::with_capacity(data.earthquakes.features.len());
    let mut skipped = 0;

    for (index, feature) in data.earthquakes.features.iter().enumerate() {
        match adapt_quake(feature) {
            Ok(marker) => markers.push(marker),
            Err(e) if policy == InvalidFeaturePolicy::Skip => {
                tracing::warn!("Skipping earthquake {}: {}", index, e);
                skipped += 1;
            }
            Err(e) => {
                return Err(MapError::InvalidFeature {
                    index,
                    reason: e.to_string(),
                })
            }
        }
    }

    Ok((markers, skipped))
}

/// Turns decoded feeds into the document handed to the map front end.
pub fn build_document(data: FeedData, options: &DocumentOptions) -> Result<MapDocument> {
    let (earthquakes, adapt_skipped) = adapt_quakes(&data, options.policy)?;
    let tectonic_plates = data
        .plates
        .as_ref()
        .map(|plates| plates.iter().map(adapt_plate).collect::<Vec<_>>());

    let (variant, base_layers, overlay_names) = match tectonic_plates {
        Some(_) => (
            MapVariant::EarthquakesWithPlates,
            vec![STREET_LAYER, TOPOGRAPHIC_LAYER, DARK_LAYER],
            vec![EARTHQUAKES_OVERLAY, PLATES_OVERLAY],
        ),
        None => (MapVariant::Earthquakes, vec![STREET_LAYER], vec![EARTHQUAKES_OVERLAY]),
    };

    let (initial_layers, layer_control) = match variant {
        MapVariant::EarthquakesWithPlates => (
            vec![STREET_LAYER.name, TOPOGRAPHIC_LAYER.name, EARTHQUAKES_OVERLAY],
            Some(LayerControl {
                collapsed: false,
                base_layers: base_layers.iter().map(|layer| layer.name).collect(),
                overlays: overlay_names.clone(),
            }),
        ),
        MapVariant::Earthquakes => (vec![STREET_LAYER.name, EARTHQUAKES_OVERLAY], None),
    };

    let stats = MapStats {
        earthquakes: earthquakes.len(),
        plates: tectonic_plates.as_ref().map_or(0, Vec::len),
        skipped: data.earthquakes.skipped + adapt_skipped,
    };

    Ok(MapDocument {
        generated_at: Utc::now(),
        variant,
        view: options.view,
        base_layers,
        overlays: Overlays {
            names: overlay_names,
            earthquakes,
            tectonic_plates,
        },
        initial_layers,
        layer_control,
        legend: Legend {
            title: options.legend_title.clone(),
            position: LEGEND_POSITION,
            entries: generate_legend()?,
        },
        stats,
    })
}

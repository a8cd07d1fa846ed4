use crate::domain::model::{InvalidFeaturePolicy, LatLng, PlateFeature, QuakeBatch, QuakeFeature};
use crate::utils::error::{MapError, Result};
use chrono::DateTime;
use serde::Deserialize;

const UNKNOWN_PLACE: &str = "Unknown location";

#[derive(Debug, Deserialize)]
struct RawCollection {
    #[serde(rename = "type")]
    kind: Option<String>,
    features: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawQuake {
    id: Option<serde_json::Value>,
    geometry: Option<RawPoint>,
    properties: Option<RawQuakeProperties>,
}

#[derive(Debug, Deserialize)]
struct RawPoint {
    coordinates: Vec<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawQuakeProperties {
    place: Option<String>,
    mag: Option<f64>,
    time: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawPlate {
    geometry: Option<serde_json::Value>,
    properties: Option<serde_json::Value>,
}

fn parse_collection(bytes: &[u8]) -> Result<RawCollection> {
    let collection: RawCollection = serde_json::from_slice(bytes)
        .map_err(|e| MapError::geojson(format!("not a FeatureCollection: {}", e)))?;

    match collection.kind.as_deref() {
        None | Some("FeatureCollection") => Ok(collection),
        Some(other) => Err(MapError::geojson(format!(
            "expected type FeatureCollection, found {}",
            other
        ))),
    }
}

fn feature_id(id: Option<serde_json::Value>) -> Option<String> {
    match id? {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn decode_quake(value: serde_json::Value) -> std::result::Result<QuakeFeature, String> {
    let raw: RawQuake = serde_json::from_value(value).map_err(|e| e.to_string())?;
    let point = raw.geometry.ok_or("feature has no geometry")?;

    let (longitude, latitude, depth_km) = match point.coordinates.as_slice() {
        [lon, lat, depth, ..] => (*lon, *lat, *depth),
        coords => {
            return Err(format!(
                "expected [longitude, latitude, depth], got {} coordinate(s)",
                coords.len()
            ))
        }
    };

    let properties = raw.properties.unwrap_or_default();
    Ok(QuakeFeature {
        id: feature_id(raw.id),
        place: properties.place.unwrap_or_else(|| UNKNOWN_PLACE.to_string()),
        // a missing magnitude draws as a zero-radius marker
        magnitude: properties.mag.unwrap_or(0.0),
        depth_km,
        position: LatLng(latitude, longitude),
        occurred_at: properties.time.and_then(DateTime::from_timestamp_millis),
    })
}

/// Decodes an earthquake FeatureCollection.
///
/// Malformed features are dropped and counted under `Skip`, and abort the
/// decode under `Fail`. A document without a `features` array always fails.
pub fn decode_quakes(bytes: &[u8], policy: InvalidFeaturePolicy) -> Result<QuakeBatch> {
    let collection = parse_collection(bytes)?;
    let mut batch = QuakeBatch {
        features: Vec::with_capacity(collection.features.len()),
        skipped: 0,
    };

    for (index, value) in collection.features.into_iter().enumerate() {
        match decode_quake(value) {
            Ok(feature) => batch.features.push(feature),
            Err(reason) => match policy {
                InvalidFeaturePolicy::Fail => {
                    return Err(MapError::InvalidFeature { index, reason });
                }
                InvalidFeaturePolicy::Skip => {
                    tracing::warn!("Skipping earthquake feature {}: {}", index, reason);
                    batch.skipped += 1;
                }
            },
        }
    }

    tracing::debug!(
        "Decoded {} earthquake features ({} skipped)",
        batch.features.len(),
        batch.skipped
    );
    Ok(batch)
}

/// Decodes a plate boundary FeatureCollection. Features without geometry are ignored.
pub fn decode_plates(bytes: &[u8]) -> Result<Vec<PlateFeature>> {
    let collection = parse_collection(bytes)?;
    let mut plates = Vec::with_capacity(collection.features.len());

    for (index, value) in collection.features.into_iter().enumerate() {
        let raw: RawPlate = serde_json::from_value(value).map_err(|e| MapError::InvalidFeature {
            index,
            reason: e.to_string(),
        })?;

        let Some(geometry) = raw.geometry.filter(|g| !g.is_null()) else {
            tracing::debug!("Plate feature {} has no geometry", index);
            continue;
        };

        let name = raw
            .properties
            .as_ref()
            .and_then(|p| p.get("PlateName"))
            .and_then(|n| n.as_str())
            .map(str::to_string);

        plates.push(PlateFeature { name, geometry });
    }

    Ok(plates)
}

use crate::core::classifier::classify;
use crate::domain::model::{
    MarkerStyle, PlateFeature, PlateOverlay, PlateStyle, PopupInfo, QuakeFeature, QuakeMarker,
};
use crate::utils::error::Result;

const RADIUS_PER_MAGNITUDE: f64 = 4.0;

pub const PLATE_STYLE: PlateStyle = PlateStyle {
    stroke_color: "blue",
    stroke_weight: 2.5,
};

/// Circle marker for one earthquake. Radius scales linearly with magnitude;
/// zero or negative magnitudes pass through unchanged.
pub fn adapt_quake(feature: &QuakeFeature) -> Result<QuakeMarker> {
    let style = MarkerStyle {
        radius: RADIUS_PER_MAGNITUDE * feature.magnitude,
        fill_color: classify(feature.depth_km)?,
        stroke_color: "black",
        stroke_weight: 1.0,
        stroke_opacity: 1.0,
        fill_opacity: 0.8,
    };
    let popup = PopupInfo {
        location: feature.place.clone(),
        depth: feature.depth_km,
        magnitude: feature.magnitude,
    };

    Ok(QuakeMarker {
        id: feature.id.clone(),
        position: feature.position,
        style,
        popup_html: popup.to_html(),
        popup,
        occurred_at: feature.occurred_at,
    })
}

pub fn adapt_plate(feature: &PlateFeature) -> PlateOverlay {
    PlateOverlay {
        name: feature.name.clone(),
        geometry: feature.geometry.clone(),
        style: PLATE_STYLE,
    }
}

impl PopupInfo {
    pub fn to_html(&self) -> String {
        format!(
            "<h3 style='text-align: center;'>Information</h3><hr/>\
             <p><b>Location:</b> {}</p>\
             <p><b>Depth:</b> {}</p>\
             <p><b>Magnitude:</b> {}</p>",
            escape_html(&self.location),
            self.depth,
            self.magnitude
        )
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

use crate::core::classifier::classify;
use crate::domain::model::LegendEntry;
use crate::utils::error::Result;

const LEGEND_START_KM: i32 = -10;
const LEGEND_END_KM: i32 = 110;
const LEGEND_STEP_KM: i32 = 20;
const OPEN_ENDED_FROM_KM: i32 = 90;

/// Legend rows for the depth palette, shallowest first.
///
/// Each row samples the classifier at the bottom of its range, so the colors
/// always agree with the markers.
pub fn generate_legend() -> Result<Vec<LegendEntry>> {
    (LEGEND_START_KM..LEGEND_END_KM)
        .step_by(LEGEND_STEP_KM as usize)
        .map(|depth| -> Result<LegendEntry> {
            let color = classify(f64::from(depth))?;
            let label = if depth >= OPEN_ENDED_FROM_KM {
                format!("{}+", OPEN_ENDED_FROM_KM)
            } else {
                format!("{}-{}", depth, depth + LEGEND_STEP_KM)
            };
            Ok(LegendEntry { label, color })
        })
        .collect()
}

//! Depth to color classification.
//!
//! The partition covers the whole real line. Depths below -10 km fall into
//! the first bucket, which reuses the deepest color.

use crate::domain::model::ColorBucket;
use crate::utils::error::{MapError, Result};

pub const SHALLOW: &str = "#a2f601";
pub const DEPTH_10_30: &str = "#dcf400";
pub const DEPTH_30_50: &str = "#f6db12";
pub const DEPTH_50_70: &str = "#fdb72a";
pub const DEPTH_70_90: &str = "#fca25d";
pub const DEEP: &str = "#ff5f65";

/// Ordered, non-overlapping, and total over every non-NaN depth.
pub static DEPTH_BUCKETS: [ColorBucket; 7] = [
    ColorBucket {
        lower_bound_km: f64::NEG_INFINITY,
        upper_bound_km: Some(-10.0),
        color: DEEP,
    },
    ColorBucket {
        lower_bound_km: -10.0,
        upper_bound_km: Some(10.0),
        color: SHALLOW,
    },
    ColorBucket {
        lower_bound_km: 10.0,
        upper_bound_km: Some(30.0),
        color: DEPTH_10_30,
    },
    ColorBucket {
        lower_bound_km: 30.0,
        upper_bound_km: Some(50.0),
        color: DEPTH_30_50,
    },
    ColorBucket {
        lower_bound_km: 50.0,
        upper_bound_km: Some(70.0),
        color: DEPTH_50_70,
    },
    ColorBucket {
        lower_bound_km: 70.0,
        upper_bound_km: Some(90.0),
        color: DEPTH_70_90,
    },
    ColorBucket {
        lower_bound_km: 90.0,
        upper_bound_km: None,
        color: DEEP,
    },
];

pub fn bucket_for(depth_km: f64) -> Result<&'static ColorBucket> {
    if depth_km.is_nan() {
        return Err(MapError::invalid_input("depth_km", "depth is NaN"));
    }

    DEPTH_BUCKETS
        .iter()
        .find(|bucket| bucket.contains(depth_km))
        .ok_or_else(|| {
            MapError::invalid_input("depth_km", format!("no bucket contains {}", depth_km))
        })
}

/// Display color for a hypocenter depth in kilometers.
pub fn classify(depth_km: f64) -> Result<&'static str> {
    bucket_for(depth_km).map(|bucket| bucket.color)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PALETTE: [&str; 6] = [SHALLOW, DEPTH_10_30, DEPTH_30_50, DEPTH_50_70, DEPTH_70_90, DEEP];

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(classify(-10.0).unwrap(), "#a2f601");
        assert_eq!(classify(9.999).unwrap(), "#a2f601");
        assert_eq!(classify(10.0).unwrap(), "#dcf400");
        assert_eq!(classify(29.5).unwrap(), "#dcf400");
        assert_eq!(classify(30.0).unwrap(), "#f6db12");
        assert_eq!(classify(50.0).unwrap(), "#fdb72a");
        assert_eq!(classify(70.0).unwrap(), "#fca25d");
        assert_eq!(classify(89.999).unwrap(), "#fca25d");
        assert_eq!(classify(90.0).unwrap(), "#ff5f65");
    }

    #[test]
    fn test_below_minus_ten_falls_back_to_deep_color() {
        assert_eq!(classify(-50.0).unwrap(), "#ff5f65");
        assert_eq!(classify(-10.001).unwrap(), "#ff5f65");
        assert_eq!(classify(f64::NEG_INFINITY).unwrap(), "#ff5f65");
    }

    #[test]
    fn test_large_and_infinite_depths() {
        assert_eq!(classify(700.0).unwrap(), "#ff5f65");
        assert_eq!(classify(f64::MAX).unwrap(), "#ff5f65");
        assert_eq!(classify(f64::INFINITY).unwrap(), "#ff5f65");
    }

    #[test]
    fn test_nan_is_invalid_input() {
        let err = classify(f64::NAN).unwrap_err();
        assert!(matches!(err, MapError::InvalidInput { ref field, .. } if field == "depth_km"));
    }

    #[test]
    fn test_every_depth_maps_to_palette_color() {
        let mut depth = -200.0;
        while depth <= 800.0 {
            let color = classify(depth).unwrap();
            assert!(PALETTE.contains(&color), "unexpected color {} for {}", color, depth);
            depth += 0.25;
        }
    }

    #[test]
    fn test_partition_has_exactly_one_bucket_per_depth() {
        for depth in [-1e9, -10.0, -0.0, 0.0, 9.999_999, 10.0, 49.9, 90.0, 1e9] {
            let hits = DEPTH_BUCKETS.iter().filter(|b| b.contains(depth)).count();
            assert_eq!(hits, 1, "depth {} matched {} buckets", depth, hits);
        }
    }

    #[test]
    fn test_partition_is_contiguous() {
        for pair in DEPTH_BUCKETS.windows(2) {
            assert_eq!(pair[0].upper_bound_km, Some(pair[1].lower_bound_km));
        }
        assert_eq!(DEPTH_BUCKETS[0].lower_bound_km, f64::NEG_INFINITY);
        assert_eq!(DEPTH_BUCKETS[DEPTH_BUCKETS.len() - 1].upper_bound_km, None);
    }

    #[test]
    fn test_classify_is_repeatable() {
        for depth in [-50.0, 0.0, 15.0, 95.0] {
            assert_eq!(classify(depth).unwrap(), classify(depth).unwrap());
        }
    }
}

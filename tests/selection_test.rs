//! Tests for ratio and picture-size selection
//!
//! Covers the documented examples plus properties over random capability lists.

use crabshot::selection::{select_ratio, select_resolution, TARGET_HEIGHT};
use crabshot::{CameraError, RatioSelector, Resolution, ResolutionAxis, ResolutionSelector};
use proptest::prelude::*;

#[cfg(test)]
mod ratio_tests {
    use super::*;

    #[test]
    fn test_exact_match_wins() {
        let chosen = select_ratio(&["16:9", "4:3", "3:2"]).unwrap();
        assert_eq!(chosen.unwrap().as_str(), "4:3");
    }

    #[test]
    fn test_closest_non_exact() {
        // 11/9 is 0.111 away from 4/3, 5/4 is 0.083 away
        let chosen = select_ratio(&["11:9", "5:4"]).unwrap();
        assert_eq!(chosen.unwrap().as_str(), "5:4");
    }

    #[test]
    fn test_empty_returns_none() {
        let empty: Vec<String> = Vec::new();
        assert!(select_ratio(&empty).unwrap().is_none());
    }

    #[test]
    fn test_tie_keeps_earliest() {
        // Same value, different labels
        let chosen = select_ratio(&["1:1", "16:9", "32:18"]).unwrap();
        assert_eq!(chosen.unwrap().as_str(), "16:9");

        let chosen = select_ratio(&["32:18", "16:9"]).unwrap();
        assert_eq!(chosen.unwrap().as_str(), "32:18");
    }

    #[test]
    fn test_zero_height_is_invalid_format() {
        let result = select_ratio(&["4:0"]);
        assert!(matches!(result, Err(CameraError::InvalidRatioFormat(ref s)) if s == "4:0"));
    }

    #[test]
    fn test_lenient_skips_garbage() {
        let chosen = RatioSelector::default().select_lenient(&["", "4-3", "1:0", "1:1"]);
        assert_eq!(chosen.unwrap().as_str(), "1:1");
    }
}

#[cfg(test)]
mod resolution_tests {
    use super::*;

    #[test]
    fn test_empty_returns_none() {
        let empty: [&str; 0] = [];
        assert!(select_resolution(&empty).unwrap().is_none());
    }

    #[test]
    fn test_exact_target_height() {
        let chosen = select_resolution(&["2560x1920", "3264x2448"]).unwrap();
        assert_eq!(chosen.unwrap().to_string(), "2560x1920");
    }

    #[test]
    fn test_all_below_target_picks_tallest() {
        let chosen = select_resolution(&["1920x1440", "4000x1000", "1280x960"]).unwrap();
        assert_eq!(chosen.unwrap().to_string(), "1920x1440");
    }

    #[test]
    fn test_below_target_first_does_not_stick() {
        // A below-target first entry must not survive against a qualifying one
        let chosen = select_resolution(&["640x480", "4000x3000", "2560x1920"]).unwrap();
        assert_eq!(chosen.unwrap().to_string(), "2560x1920");
    }

    #[test]
    fn test_custom_target() {
        let selector = ResolutionSelector::new(1080, ResolutionAxis::Height);
        let chosen = selector.select(&["3840x2160", "1920x1080", "1280x720"]).unwrap();
        assert_eq!(chosen.unwrap().to_string(), "1920x1080");
    }

    #[test]
    fn test_malformed_resolution() {
        let result = select_resolution(&["1920x1080", "big"]);
        assert!(matches!(result, Err(CameraError::InvalidResolutionFormat(ref s)) if s == "big"));

        let lenient = ResolutionSelector::default().select_lenient(&["big", "2560x1920"]);
        assert_eq!(lenient, Some(Resolution::new(2560, 1920)));
    }
}

fn ratio_strategy() -> impl Strategy<Value = (u32, u32)> {
    (1u32..64, 1u32..64)
}

fn size_strategy() -> impl Strategy<Value = (u32, u32)> {
    (1u32..5000, 1u32..5000)
}

proptest! {
    #[test]
    fn prop_ratio_result_is_from_input(ratios in prop::collection::vec(ratio_strategy(), 1..12)) {
        let labels: Vec<String> = ratios.iter().map(|(w, h)| format!("{}:{}", w, h)).collect();
        let chosen = select_ratio(&labels).unwrap().unwrap();
        prop_assert!(labels.contains(&chosen.label));

        let target = 4.0 / 3.0;
        let best = (chosen.value() - target).abs();
        for (w, h) in &ratios {
            prop_assert!(best <= (*w as f64 / *h as f64 - target).abs());
        }
    }

    #[test]
    fn prop_resolution_policy(sizes in prop::collection::vec(size_strategy(), 1..12)) {
        let labels: Vec<String> = sizes.iter().map(|(w, h)| format!("{}x{}", w, h)).collect();
        let chosen = select_resolution(&labels).unwrap().unwrap();
        prop_assert!(labels.contains(&chosen.to_string()));

        let heights: Vec<u32> = sizes.iter().map(|(_, h)| *h).collect();
        let qualifying: Vec<u32> = heights.iter().copied().filter(|h| *h >= TARGET_HEIGHT).collect();
        if let Some(min) = qualifying.iter().min() {
            prop_assert_eq!(chosen.height, *min);
        } else {
            prop_assert_eq!(chosen.height, *heights.iter().max().unwrap());
        }
    }
}

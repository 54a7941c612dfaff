//! Filtering and summary statistics over a feed snapshot.
//!
//! Everything here is a pure function of the snapshot and the active
//! minimum-magnitude threshold. Nothing is cached; callers recompute on every
//! frame.

use crate::feed::Feature;

/// Magnitude from which an event counts as significant.
pub const SIGNIFICANT_MAGNITUDE: f64 = 4.0;

/// Upper bound (inclusive) of the shallow depth range, in km.
pub const SHALLOW_MAX_DEPTH_KM: f64 = 50.0;

/// Upper bound (inclusive) of the intermediate depth range, in km.
pub const INTERMEDIATE_MAX_DEPTH_KM: f64 = 100.0;

/// Depth category of a hypocenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepthBucket {
    /// 0-50 km.
    Shallow,
    /// 50-100 km.
    Intermediate,
    /// Deeper than 100 km.
    Deep,
}

impl DepthBucket {
    /// All buckets, shallowest first.
    pub const ALL: [DepthBucket; 3] = [
        DepthBucket::Shallow,
        DepthBucket::Intermediate,
        DepthBucket::Deep,
    ];

    /// Classify a depth in km. NaN has no bucket.
    pub fn classify(depth_km: f64) -> Option<Self> {
        if depth_km.is_nan() {
            None
        } else if depth_km > INTERMEDIATE_MAX_DEPTH_KM {
            Some(DepthBucket::Deep)
        } else if depth_km > SHALLOW_MAX_DEPTH_KM {
            Some(DepthBucket::Intermediate)
        } else {
            Some(DepthBucket::Shallow)
        }
    }

    /// Legend label.
    pub fn label(self) -> &'static str {
        match self {
            DepthBucket::Shallow => "0-50 km (Shallow)",
            DepthBucket::Intermediate => "50-100 km (Intermediate)",
            DepthBucket::Deep => "100+ km (Deep)",
        }
    }

    /// Short name.
    pub fn name(self) -> &'static str {
        match self {
            DepthBucket::Shallow => "Shallow",
            DepthBucket::Intermediate => "Intermediate",
            DepthBucket::Deep => "Deep",
        }
    }
}

/// Per-bucket event counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DepthBuckets {
    /// Events no deeper than 50 km.
    pub shallow: usize,
    /// Events between 50 and 100 km.
    pub intermediate: usize,
    /// Events deeper than 100 km.
    pub deep: usize,
}

impl DepthBuckets {
    /// Count for one bucket.
    pub fn get(&self, bucket: DepthBucket) -> usize {
        match bucket {
            DepthBucket::Shallow => self.shallow,
            DepthBucket::Intermediate => self.intermediate,
            DepthBucket::Deep => self.deep,
        }
    }

    /// Sum over all buckets.
    pub fn total(&self) -> usize {
        self.shallow + self.intermediate + self.deep
    }

    fn add(&mut self, bucket: DepthBucket) {
        match bucket {
            DepthBucket::Shallow => self.shallow += 1,
            DepthBucket::Intermediate => self.intermediate += 1,
            DepthBucket::Deep => self.deep += 1,
        }
    }
}

/// Whether a feature passes the minimum-magnitude filter.
///
/// Inclusive comparison; an event without a numeric magnitude never passes.
pub fn passes_threshold(feature: &Feature, threshold: f64) -> bool {
    feature
        .numeric_magnitude()
        .is_some_and(|mag| mag >= threshold)
}

/// Features at or above `threshold`, in snapshot order.
pub fn filter_by_magnitude(snapshot: &[Feature], threshold: f64) -> Vec<&Feature> {
    snapshot
        .iter()
        .filter(|f| passes_threshold(f, threshold))
        .collect()
}

/// Derived statistics for one snapshot and threshold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    /// Every feature in the snapshot.
    pub total: usize,
    /// Features passing the threshold.
    pub filtered_count: usize,
    /// Largest numeric magnitude, 0.0 when there is none.
    pub max_magnitude: f64,
    /// Mean numeric magnitude, 0.0 when there is none.
    pub average_magnitude: f64,
    /// Features at or above [`SIGNIFICANT_MAGNITUDE`], independent of the threshold.
    pub significant_count: usize,
    /// Counts per depth category over features with a numeric depth.
    pub depth_buckets: DepthBuckets,
    /// Features carrying a numeric magnitude.
    pub magnitude_samples: usize,
    /// Features carrying a numeric depth.
    pub depth_samples: usize,
    /// Largest numeric depth, 0.0 when there is none.
    pub max_depth: f64,
    /// Mean numeric depth, 0.0 when there is none.
    pub average_depth: f64,
}

impl Summary {
    /// Compute the summary for `snapshot` under `threshold`.
    pub fn compute(snapshot: &[Feature], threshold: f64) -> Self {
        let mut summary = Summary {
            total: snapshot.len(),
            ..Summary::default()
        };

        let mut mag_sum = 0.0;
        let mut max_mag: Option<f64> = None;
        let mut depth_sum = 0.0;
        let mut max_depth: Option<f64> = None;

        for feature in snapshot {
            if let Some(mag) = feature.numeric_magnitude() {
                summary.magnitude_samples += 1;
                mag_sum += mag;
                max_mag = Some(max_mag.map_or(mag, |m| m.max(mag)));
                if mag >= threshold {
                    summary.filtered_count += 1;
                }
                if mag >= SIGNIFICANT_MAGNITUDE {
                    summary.significant_count += 1;
                }
            }

            if let Some(depth) = feature.numeric_depth() {
                summary.depth_samples += 1;
                depth_sum += depth;
                max_depth = Some(max_depth.map_or(depth, |d| d.max(depth)));
                if let Some(bucket) = DepthBucket::classify(depth) {
                    summary.depth_buckets.add(bucket);
                }
            }
        }

        summary.max_magnitude = max_mag.unwrap_or(0.0);
        summary.max_depth = max_depth.unwrap_or(0.0);
        if summary.magnitude_samples > 0 {
            summary.average_magnitude = mag_sum / summary.magnitude_samples as f64;
        }
        if summary.depth_samples > 0 {
            summary.average_depth = depth_sum / summary.depth_samples as f64;
        }

        summary
    }

    /// Whether there is enough numeric data for the education statistics.
    pub fn has_numeric_data(&self) -> bool {
        self.magnitude_samples > 0 && self.depth_samples > 0
    }

    /// Average magnitude rounded to one decimal place.
    pub fn display_average_magnitude(&self) -> f64 {
        round_one_decimal(self.average_magnitude)
    }

    /// Average depth rounded to one decimal place.
    pub fn display_average_depth(&self) -> f64 {
        round_one_decimal(self.average_depth)
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::feed::Position;

    pub(crate) fn quake(id: &str, mag: Option<f64>, depth: Option<f64>) -> Feature {
        Feature {
            id: id.to_string(),
            position: Some(Position {
                longitude: 0.0,
                latitude: 0.0,
                depth_km: depth,
            }),
            magnitude: mag,
            mag_type: None,
            place: format!("Place {}", id),
            time_ms: 0,
            tsunami: false,
            url: None,
        }
    }

    fn scenario() -> Vec<Feature> {
        vec![
            quake("a", Some(5.2), Some(30.0)),
            quake("b", Some(2.1), Some(80.0)),
            quake("c", Some(6.8), Some(150.0)),
        ]
    }

    #[test]
    fn three_event_scenario() {
        let snapshot = scenario();
        let filtered = filter_by_magnitude(&snapshot, 4.0);
        let ids: Vec<_> = filtered.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);

        let summary = Summary::compute(&snapshot, 4.0);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.filtered_count, 2);
        assert_eq!(summary.max_magnitude, 6.8);
        assert_eq!(summary.significant_count, 2);
        assert_eq!(
            summary.depth_buckets,
            DepthBuckets {
                shallow: 1,
                intermediate: 1,
                deep: 1
            }
        );
        assert_eq!(summary.display_average_magnitude(), 4.7);
    }

    #[test]
    fn empty_snapshot_yields_sentinels() {
        let summary = Summary::compute(&[], 0.0);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.filtered_count, 0);
        assert_eq!(summary.significant_count, 0);
        assert_eq!(summary.max_magnitude, 0.0);
        assert_eq!(summary.average_magnitude, 0.0);
        assert_eq!(summary.depth_buckets.total(), 0);
        assert!(!summary.has_numeric_data());
    }

    #[test]
    fn threshold_above_every_magnitude_empties_filter() {
        let snapshot = scenario();
        assert!(filter_by_magnitude(&snapshot, 8.1).is_empty());

        let summary = Summary::compute(&snapshot, 8.1);
        assert_eq!(summary.filtered_count, 0);
        assert_eq!(summary.total, 3);
    }

    #[test]
    fn threshold_is_inclusive() {
        let snapshot = scenario();
        assert_eq!(filter_by_magnitude(&snapshot, 5.2).len(), 2);
        assert_eq!(filter_by_magnitude(&snapshot, 5.21).len(), 1);
    }

    #[test]
    fn significant_count_ignores_threshold() {
        let snapshot = scenario();
        for threshold in [0.0, 3.0, 6.0, 8.0] {
            assert_eq!(Summary::compute(&snapshot, threshold).significant_count, 2);
        }
    }

    #[test]
    fn missing_values_count_in_total_only() {
        let mut snapshot = scenario();
        snapshot.push(quake("d", None, None));
        snapshot.push(quake("e", Some(f64::NAN), Some(f64::NAN)));
        let mut no_position = quake("f", Some(1.0), None);
        no_position.position = None;
        snapshot.push(no_position);

        let summary = Summary::compute(&snapshot, 0.0);
        assert_eq!(summary.total, 6);
        assert_eq!(summary.magnitude_samples, 4);
        assert_eq!(summary.filtered_count, 4);
        assert_eq!(summary.depth_samples, 3);
        assert_eq!(summary.depth_buckets.total(), summary.depth_samples);
        assert_eq!(summary.max_depth, 150.0);
        assert_eq!(summary.display_average_magnitude(), 3.8);
    }

    #[test]
    fn bucket_boundaries() {
        assert_eq!(DepthBucket::classify(-1.5), Some(DepthBucket::Shallow));
        assert_eq!(DepthBucket::classify(50.0), Some(DepthBucket::Shallow));
        assert_eq!(DepthBucket::classify(50.1), Some(DepthBucket::Intermediate));
        assert_eq!(DepthBucket::classify(100.0), Some(DepthBucket::Intermediate));
        assert_eq!(DepthBucket::classify(100.1), Some(DepthBucket::Deep));
        assert_eq!(DepthBucket::classify(f64::NAN), None);
    }
}

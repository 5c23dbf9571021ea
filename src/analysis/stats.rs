use crate::analysis::band::Band;
use crate::analysis::config::ElementProfile;

/// Order statistics for one summarization window of a single element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStats {
    /// Index of the first occurrence of the maximum value.
    pub max_idx: usize,
    /// Index of the first occurrence of the minimum value.
    pub min_idx: usize,
    /// Integer-rounded arithmetic mean.
    pub mean: i64,
    /// Average of the two central order statistics; identical to the middle
    /// value for odd lengths.
    pub median: f64,
}

impl SeriesStats {
    pub fn compute(values: &[i64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut max_idx = 0;
        let mut min_idx = 0;
        for (idx, &value) in values.iter().enumerate() {
            if value > values[max_idx] {
                max_idx = idx;
            }
            if value < values[min_idx] {
                min_idx = idx;
            }
        }

        let sum: i64 = values.iter().sum();
        let mean = (sum as f64 / values.len() as f64).round() as i64;

        let mut sorted = values.to_vec();
        sorted.sort_unstable();
        let n = sorted.len();
        let median = (sorted[(n - 1) / 2] + sorted[n / 2]) as f64 / 2.0;

        Some(Self {
            max_idx,
            min_idx,
            mean,
            median,
        })
    }
}

/// Signed spike magnitude for a window, or 0 when nothing qualifies.
///
/// The extreme has to deviate from the mean by strictly more than the
/// element's threshold, and its band must not be ideal. A value the band
/// table cannot place still counts as outside the ideal band.
pub fn detect_spike(values: &[i64], stats: &SeriesStats, profile: &ElementProfile) -> i64 {
    let max = values[stats.max_idx];
    if max - stats.mean > profile.spike_threshold && profile.classify(max) != Some(Band::Ideal) {
        return max - stats.mean;
    }

    let min = values[stats.min_idx];
    if stats.mean - min > profile.spike_threshold && profile.classify(min) != Some(Band::Ideal) {
        return min - stats.mean;
    }

    0
}

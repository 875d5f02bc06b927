//! Statistics Calculator Module
//! Summaries, correlations, histogram binning and kernel density estimates
//! behind the chart payloads.

use crate::config::HISTOGRAM_MAX_BINS;
use statrs::distribution::{Continuous, Normal};
use statrs::statistics::Statistics;

/// Box plot summary of one column.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub count: usize,
    pub mean: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub fliers: Vec<f64>,
}

impl Default for BoxSummary {
    fn default() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            q1: f64::NAN,
            median: f64::NAN,
            q3: f64::NAN,
            whisker_low: f64::NAN,
            whisker_high: f64::NAN,
            fliers: Vec::new(),
        }
    }
}

/// One histogram bin, `[left, right)` except the last which is closed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub left: f64,
    pub right: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.left + self.right) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }
}

/// Gaussian kernel density estimate with Scott's bandwidth.
#[derive(Debug, Clone)]
pub struct GaussianKde {
    samples: Vec<f64>,
    bandwidth: f64,
    kernel: Normal,
}

impl GaussianKde {
    /// Returns `None` when the bandwidth is undefined: fewer than two samples
    /// or zero spread.
    pub fn new(samples: &[f64]) -> Option<Self> {
        let bandwidth = StatsCalculator::scott_bandwidth(samples)?;
        Some(Self {
            samples: samples.to_vec(),
            bandwidth,
            kernel: Normal::standard(),
        })
    }

    pub fn density(&self, x: f64) -> f64 {
        let n = self.samples.len() as f64;
        self.samples
            .iter()
            .map(|s| self.kernel.pdf((x - s) / self.bandwidth))
            .sum::<f64>()
            / (n * self.bandwidth)
    }

    /// Evaluate on `points` evenly spaced positions spanning the sample range
    /// extended by `cut` bandwidths on each side.
    pub fn curve(&self, cut: f64, points: usize) -> Vec<[f64; 2]> {
        let (min, max) = StatsCalculator::min_max(&self.samples);
        let lo = min - cut * self.bandwidth;
        let hi = max + cut * self.bandwidth;
        StatsCalculator::linspace(lo, hi, points)
            .into_iter()
            .map(|x| [x, self.density(x)])
            .collect()
    }
}

/// Value and its number of occurrences.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueCount {
    pub value: f64,
    pub count: usize,
}

/// Stateless statistical helpers.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Arithmetic mean; NaN for an empty slice.
    pub fn mean(values: &[f64]) -> f64 {
        if values.is_empty() {
            return f64::NAN;
        }
        values.iter().sum::<f64>() / values.len() as f64
    }

    pub fn min_max(values: &[f64]) -> (f64, f64) {
        values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    pub fn sorted(values: &[f64]) -> Vec<f64> {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        sorted
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Quartiles, 1.5 IQR whiskers and fliers.
    pub fn box_summary(values: &[f64]) -> BoxSummary {
        if values.is_empty() {
            return BoxSummary::default();
        }

        let sorted = Self::sorted(values);
        let q1 = Self::percentile(&sorted, 25.0);
        let median = Self::percentile(&sorted, 50.0);
        let q3 = Self::percentile(&sorted, 75.0);
        let iqr = q3 - q1;
        let low_fence = q1 - 1.5 * iqr;
        let high_fence = q3 + 1.5 * iqr;

        let whisker_low = sorted
            .iter()
            .copied()
            .find(|&v| v >= low_fence)
            .unwrap_or(q1);
        let whisker_high = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= high_fence)
            .unwrap_or(q3);
        let fliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < whisker_low || v > whisker_high)
            .collect();

        BoxSummary {
            count: sorted.len(),
            mean: Self::mean(&sorted),
            q1,
            median,
            q3,
            whisker_low,
            whisker_high,
            fliers,
        }
    }

    /// Pearson correlation over rows where both values are present.
    /// NaN with fewer than two pairs or a zero-variance side.
    pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> f64 {
        let (xs, ys): (Vec<f64>, Vec<f64>) = x
            .iter()
            .zip(y.iter())
            .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
            .unzip();

        if xs.len() < 2 {
            return f64::NAN;
        }

        let sx = xs.iter().std_dev();
        let sy = ys.iter().std_dev();
        if sx == 0.0 || sy == 0.0 {
            return f64::NAN;
        }

        let r = xs.iter().covariance(ys.iter()) / (sx * sy);
        r.clamp(-1.0, 1.0)
    }

    /// Pairwise Pearson matrix, row/column order matching the input.
    pub fn correlation_matrix(columns: &[&[Option<f64>]]) -> Vec<Vec<f64>> {
        columns
            .iter()
            .map(|a| columns.iter().map(|b| Self::pearson(a, b)).collect())
            .collect()
    }

    /// Bin edges by NumPy's `auto` rule: the narrower of Sturges and
    /// Freedman-Diaconis, Sturges alone when the IQR is zero.
    ///
    /// Freedman-Diaconis is dropped in favour of Sturges when it would need
    /// more than `HISTOGRAM_MAX_BINS` bins, as with a single far outlier.
    pub fn histogram_edges(values: &[f64]) -> Vec<f64> {
        if values.is_empty() {
            return vec![0.0, 1.0];
        }

        let (min, max) = Self::min_max(values);
        let range = max - min;
        if range == 0.0 {
            return vec![min - 0.5, min + 0.5];
        }

        let n = values.len() as f64;
        let sturges_bins = (n.log2() + 1.0).ceil().max(1.0);

        // max - min can overflow for values near f64::MAX
        let bins = if range.is_finite() {
            let sturges = range / (n.log2() + 1.0);
            let sorted = Self::sorted(values);
            let iqr = Self::percentile(&sorted, 75.0) - Self::percentile(&sorted, 25.0);
            let fd = 2.0 * iqr * n.powf(-1.0 / 3.0);

            let width = if fd > 0.0 { fd.min(sturges) } else { sturges };
            let auto_bins = (range / width).ceil().max(1.0);
            if auto_bins > HISTOGRAM_MAX_BINS as f64 {
                sturges_bins
            } else {
                auto_bins
            }
        } else {
            sturges_bins
        };

        Self::linspace(min, max, (bins as usize).saturating_add(1))
    }

    /// Count values into bins defined by ascending edges.
    pub fn histogram(values: &[f64], edges: &[f64]) -> Vec<HistogramBin> {
        if edges.len() < 2 {
            return Vec::new();
        }

        let first = edges[0];
        let last = edges[edges.len() - 1];
        let mut bins: Vec<HistogramBin> = edges
            .windows(2)
            .map(|w| HistogramBin {
                left: w[0],
                right: w[1],
                count: 0,
            })
            .collect();

        for &v in values {
            if v < first || v > last {
                continue;
            }
            // partition_point gives the first edge greater than v
            let idx = edges.partition_point(|&e| e <= v).saturating_sub(1);
            let idx = idx.min(bins.len() - 1);
            bins[idx].count += 1;
        }

        bins
    }

    /// Histogram with `auto` edges.
    pub fn auto_histogram(values: &[f64]) -> Vec<HistogramBin> {
        let edges = Self::histogram_edges(values);
        Self::histogram(values, &edges)
    }

    /// Scott's rule: sample standard deviation times n^(-1/5).
    pub fn scott_bandwidth(values: &[f64]) -> Option<f64> {
        if values.len() < 2 {
            return None;
        }
        let std = values.iter().std_dev();
        if !std.is_finite() || std <= 0.0 {
            return None;
        }
        Some(std * (values.len() as f64).powf(-0.2))
    }

    /// Occurrence counts, most frequent first, ties by ascending value.
    pub fn value_counts(values: &[f64]) -> Vec<ValueCount> {
        let sorted = Self::sorted(values);
        let mut counts: Vec<ValueCount> = Vec::new();

        for v in sorted {
            match counts.last_mut() {
                Some(last) if last.value == v => last.count += 1,
                _ => counts.push(ValueCount { value: v, count: 1 }),
            }
        }

        counts.sort_by(|a, b| b.count.cmp(&a.count));
        counts
    }

    #[allow(dead_code)]
    pub fn distinct_count(values: &[f64]) -> usize {
        Self::value_counts(values).len()
    }

    pub fn linspace(start: f64, end: f64, points: usize) -> Vec<f64> {
        match points {
            0 => Vec::new(),
            1 => vec![start],
            _ => {
                // Interpolating instead of stepping keeps wide spans finite
                let last = (points - 1) as f64;
                (0..points)
                    .map(|i| {
                        if i == points - 1 {
                            end
                        } else {
                            let t = i as f64 / last;
                            start * (1.0 - t) + end * t
                        }
                    })
                    .collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn percentile_matches_numpy_linear() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert!((StatsCalculator::percentile(&sorted, 25.0) - 1.75).abs() < EPS);
        assert!((StatsCalculator::percentile(&sorted, 50.0) - 2.5).abs() < EPS);
        assert!((StatsCalculator::percentile(&sorted, 100.0) - 4.0).abs() < EPS);
        assert!(StatsCalculator::percentile(&[], 50.0).is_nan());
    }

    #[test]
    fn box_summary_separates_fliers() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let summary = StatsCalculator::box_summary(&values);

        assert_eq!(summary.count, 6);
        assert!((summary.median - 3.5).abs() < EPS);
        assert_eq!(summary.whisker_low, 1.0);
        assert_eq!(summary.whisker_high, 5.0);
        assert_eq!(summary.fliers, vec![100.0]);
    }

    #[test]
    fn box_summary_of_empty_column_is_nan() {
        let summary = StatsCalculator::box_summary(&[]);
        assert_eq!(summary.count, 0);
        assert!(summary.median.is_nan());
    }

    #[test]
    fn pearson_of_two_point_line_is_one() {
        let a = [Some(1.0), Some(3.0)];
        let b = [Some(2.0), Some(4.0)];
        assert!((StatsCalculator::pearson(&a, &b) - 1.0).abs() < EPS);

        let matrix = StatsCalculator::correlation_matrix(&[&a, &b]);
        assert_eq!(matrix.len(), 2);
        for i in 0..2 {
            assert_eq!(matrix[i].len(), 2);
            assert!((matrix[i][i] - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn pearson_uses_pairwise_complete_rows() {
        let a = [Some(1.0), Some(2.0), None, Some(3.0)];
        let b = [Some(3.0), Some(2.0), Some(9.0), Some(1.0)];
        assert!((StatsCalculator::pearson(&a, &b) + 1.0).abs() < EPS);
    }

    #[test]
    fn pearson_of_constant_column_is_nan() {
        let a = [Some(1.0), Some(1.0), Some(1.0)];
        let b = [Some(1.0), Some(2.0), Some(3.0)];
        assert!(StatsCalculator::pearson(&a, &b).is_nan());
        assert!(StatsCalculator::pearson(&[Some(1.0)], &[Some(2.0)]).is_nan());
    }

    #[test]
    fn histogram_counts_every_value_once() {
        let values: Vec<f64> = (0..50).map(|i| (i % 10) as f64).collect();
        let bins = StatsCalculator::auto_histogram(&values);

        assert!(!bins.is_empty());
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
        assert_eq!(bins.first().unwrap().left, 0.0);
        assert_eq!(bins.last().unwrap().right, 9.0);
    }

    #[test]
    fn histogram_of_constant_column_is_one_unit_bin() {
        let bins = StatsCalculator::auto_histogram(&[4.0, 4.0, 4.0]);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].left, 3.5);
        assert_eq!(bins[0].right, 4.5);
        assert_eq!(bins[0].count, 3);
    }

    #[test]
    fn far_outlier_keeps_bin_count_bounded() {
        let mut values: Vec<f64> = (0..100).map(|i| i as f64).collect();
        values.push(1e15);

        let edges = StatsCalculator::histogram_edges(&values);
        assert!(edges.len() <= HISTOGRAM_MAX_BINS + 1, "{} edges", edges.len());
        assert_eq!(edges[0], 0.0);
        assert_eq!(*edges.last().unwrap(), 1e15);

        let bins = StatsCalculator::histogram(&values, &edges);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
    }

    #[test]
    fn overflowing_range_still_bins_every_value() {
        let values = [-1e308, 0.0, 1.0, 2.0, 1e308];

        let edges = StatsCalculator::histogram_edges(&values);
        assert!(edges.len() >= 2 && edges.len() <= HISTOGRAM_MAX_BINS + 1);
        assert!(edges.iter().all(|e| e.is_finite()));
        assert!(edges.windows(2).all(|w| w[0] < w[1]));

        let bins = StatsCalculator::histogram(&values, &edges);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
    }

    #[test]
    fn kde_integrates_to_about_one() {
        let samples = [1.0, 2.0, 2.5, 3.0, 7.0];
        let kde = GaussianKde::new(&samples).unwrap();
        let curve = kde.curve(3.0, 400);

        let area: f64 = curve
            .windows(2)
            .map(|w| (w[1][0] - w[0][0]) * (w[0][1] + w[1][1]) / 2.0)
            .sum();
        assert!((area - 1.0).abs() < 0.01, "area was {}", area);
        assert_eq!(curve.len(), 400);
    }

    #[test]
    fn kde_requires_spread() {
        assert!(GaussianKde::new(&[2.0, 2.0, 2.0]).is_none());
        assert!(GaussianKde::new(&[2.0]).is_none());
    }

    #[test]
    fn value_counts_orders_by_frequency() {
        let counts = StatsCalculator::value_counts(&[3.0, 1.0, 3.0, 2.0, 3.0, 1.0]);
        assert_eq!(
            counts,
            vec![
                ValueCount { value: 3.0, count: 3 },
                ValueCount { value: 1.0, count: 2 },
                ValueCount { value: 2.0, count: 1 },
            ]
        );
        assert_eq!(StatsCalculator::distinct_count(&[0.0, -0.0, 1.0]), 2);
    }

    #[test]
    fn linspace_hits_both_ends() {
        let xs = StatsCalculator::linspace(0.0, 1.0, 5);
        assert_eq!(xs, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }
}

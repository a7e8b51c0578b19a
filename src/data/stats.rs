//! Descriptive statistics behind the charts: box plots, correlation,
//! histogram and density curve. Every function accepts an empty input and
//! answers `None` or an empty result instead of panicking.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use super::aggregate::Metric;
use super::model::DayRecord;

// ---------------------------------------------------------------------------
// Box plots
// ---------------------------------------------------------------------------

/// Five-number summary with Tukey whiskers (1.5 × IQR).
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    /// Values beyond the whiskers, ascending.
    pub outliers: Vec<f64>,
    pub count: usize,
}

impl BoxStats {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile(&sorted, 0.25);
        let median = quantile(&sorted, 0.5);
        let q3 = quantile(&sorted, 0.75);
        let reach = 1.5 * (q3 - q1);
        let (low_fence, high_fence) = (q1 - reach, q3 + reach);

        let inside = || sorted.iter().copied().filter(|v| (low_fence..=high_fence).contains(v));
        // The quartiles always lie inside the fences, so `inside` is non-empty.
        let lower_whisker = inside().next().unwrap_or(q1);
        let upper_whisker = inside().last().unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| !(low_fence..=high_fence).contains(v))
            .collect();

        Some(BoxStats {
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
            outliers,
            count: sorted.len(),
        })
    }
}

/// Linear interpolation between closest ranks. `sorted` must be non-empty.
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let pos = p * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// One box per group present in `records`, in the group key's order.
pub fn group_box_stats<'a, I, K, F>(records: I, key: F, metric: Metric) -> Vec<(K, BoxStats)>
where
    I: IntoIterator<Item = &'a DayRecord>,
    K: Ord,
    F: Fn(&DayRecord) -> K,
{
    let mut groups: BTreeMap<K, Vec<f64>> = BTreeMap::new();
    for rec in records {
        groups.entry(key(rec)).or_default().push(metric.value(rec));
    }
    groups
        .into_iter()
        .filter_map(|(k, values)| BoxStats::from_values(&values).map(|b| (k, b)))
        .collect()
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// Pearson correlation. `None` with fewer than two pairs or a constant side.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);
    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let (dx, dy) = (x - mean_x, y - mean_y);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx <= 0.0 || syy <= 0.0 {
        return None;
    }
    Some((sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0))
}

/// Pairwise Pearson correlations between dataset columns.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub variables: Vec<Metric>,
    /// Row-major, `variables.len()` squared entries.
    values: Vec<Option<f64>>,
}

impl CorrelationMatrix {
    pub fn compute<'a, I>(records: I, variables: &[Metric]) -> Self
    where
        I: IntoIterator<Item = &'a DayRecord>,
    {
        let records: Vec<&DayRecord> = records.into_iter().collect();
        let columns: Vec<Vec<f64>> = variables
            .iter()
            .map(|m| records.iter().map(|r| m.value(r)).collect())
            .collect();

        let n = variables.len();
        let mut values = vec![None; n * n];
        for i in 0..n {
            for j in i..n {
                let r = pearson(&columns[i], &columns[j]);
                values[i * n + j] = r;
                values[j * n + i] = r;
            }
        }

        CorrelationMatrix {
            variables: variables.to_vec(),
            values,
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values
            .get(row * self.variables.len() + col)
            .copied()
            .flatten()
    }

    pub fn size(&self) -> usize {
        self.variables.len()
    }
}

// ---------------------------------------------------------------------------
// Histogram and density
// ---------------------------------------------------------------------------

/// Equal-width bins over the data range; the last bin is closed on the right.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `counts.len() + 1` ascending edges.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn new(values: &[f64], bins: usize) -> Option<Self> {
        let bins = bins.max(1);
        let (mut lo, mut hi) = values.iter().fold(None, |acc: Option<(f64, f64)>, &v| {
            Some(match acc {
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
                None => (v, v),
            })
        })?;
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let edges = (0..=bins)
            .map(|i| if i == bins { hi } else { lo + width * i as f64 })
            .collect();
        let mut counts = vec![0; bins];
        for &v in values {
            let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Some(Histogram { edges, counts })
    }

    pub fn bin_width(&self) -> f64 {
        self.edges[1] - self.edges[0]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Factor turning a probability density into expected counts per bin.
    pub fn density_scale(&self) -> f64 {
        self.total() as f64 * self.bin_width()
    }
}

/// Gaussian kernel density estimate across the data range, multiplied by
/// `scale`. Bandwidth follows Scott's rule: σ · n^(-1/5).
pub fn kde_curve(values: &[f64], points: usize, scale: f64) -> Vec<[f64; 2]> {
    let n = values.len();
    if n < 2 || points < 2 {
        return Vec::new();
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    if variance <= 0.0 {
        return Vec::new();
    }
    let bandwidth = variance.sqrt() * (n as f64).powf(-0.2);
    let norm = 1.0 / (n as f64 * bandwidth * (2.0 * PI).sqrt());

    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let step = (hi - lo) / (points - 1) as f64;

    (0..points)
        .map(|i| {
            let x = lo + step * i as f64;
            let density: f64 = values
                .iter()
                .map(|v| (-0.5 * ((x - v) / bandwidth).powi(2)).exp())
                .sum::<f64>()
                * norm;
            [x, density * scale]
        })
        .collect()
}

use serde::Serialize;

/// Variances below this are treated as zero by the shape statistics
const ZERO_VARIANCE: f64 = 1e-19;

/// Summary statistics of a sample of scores.
///
/// Variance and standard deviation are population values; skewness and
/// kurtosis are the bias-corrected sample estimators. Anything undefined for
/// the sample size is `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DescriptiveStats {
    #[serde(rename = "N")]
    pub n: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub median: Option<f64>,
    pub mean: Option<f64>,
    pub standard_deviation: Option<f64>,
    pub variance: Option<f64>,
    pub skewness: Option<f64>,
    pub kurtosis: Option<f64>,
}

impl DescriptiveStats {
    pub fn from_values(values: &[f64]) -> Self {
        let n = values.len();
        if n == 0 {
            return Self {
                n,
                min: None,
                max: None,
                median: None,
                mean: None,
                standard_deviation: None,
                variance: None,
                skewness: None,
                kurtosis: None,
            };
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let nf = n as f64;
        let mean = values.iter().sum::<f64>() / nf;
        let m2: f64 = values.iter().map(|x| (x - mean).powi(2)).sum();
        let m3: f64 = values.iter().map(|x| (x - mean).powi(3)).sum();
        let m4: f64 = values.iter().map(|x| (x - mean).powi(4)).sum();
        let variance = m2 / nf;

        Self {
            n,
            min: sorted.first().copied(),
            max: sorted.last().copied(),
            median: Some(percentile(&sorted, 50.0)),
            mean: Some(mean),
            standard_deviation: Some(variance.sqrt()),
            variance: Some(variance),
            skewness: skewness(nf, m2, m3),
            kurtosis: kurtosis(nf, m2, m4),
        }
    }
}

/// Percentile of an ascending, non-empty sample, interpolating between the
/// neighbours of position `p * (n + 1) / 100`
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let pos = p * (n as f64 + 1.0) / 100.0;
    let floor = pos.floor();
    if pos < 1.0 {
        return sorted[0];
    }
    if pos >= n as f64 {
        return sorted[n - 1];
    }
    let lower = sorted[floor as usize - 1];
    let upper = sorted[floor as usize];
    lower + (pos - floor) * (upper - lower)
}

fn skewness(n: f64, m2: f64, m3: f64) -> Option<f64> {
    if n < 3.0 {
        return None;
    }
    let variance = m2 / (n - 1.0);
    if variance < ZERO_VARIANCE {
        return Some(0.0);
    }
    let scaled = m3 / (variance * variance.sqrt());
    Some(n / ((n - 1.0) * (n - 2.0)) * scaled)
}

fn kurtosis(n: f64, m2: f64, m4: f64) -> Option<f64> {
    if n < 4.0 {
        return None;
    }
    let variance = m2 / (n - 1.0);
    if variance < ZERO_VARIANCE {
        return Some(0.0);
    }
    let numerator = n * (n + 1.0) * m4 - 3.0 * m2 * m2 * (n - 1.0);
    let denominator = (n - 1.0) * (n - 2.0) * (n - 3.0) * variance * variance;
    Some(numerator / denominator)
}

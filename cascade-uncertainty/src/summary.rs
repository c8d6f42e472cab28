//! Order-statistic summary of one endpoint across draws.

use cascade_core::constants::MEDIAN_SE_FACTOR;
use cascade_core::models::UncertaintySummary;
use statrs::statistics::{Data, Median, OrderStatistics, Statistics};

/// Median, central interval at `ci_level`, mean, standard deviation and the
/// median's standard error. `None` for an empty sample.
pub fn summarize(samples: &[f64], ci_level: f64) -> Option<UncertaintySummary> {
    if samples.is_empty() {
        return None;
    }
    let mut data = Data::new(samples.to_vec());
    let tail = (1.0 - ci_level) / 2.0;
    let lower = data.quantile(tail);
    let upper = data.quantile(1.0 - tail);
    let median = data.median();

    let mean = samples.iter().mean();
    // Sample standard deviation is undefined below two draws.
    let std_dev = if samples.len() < 2 {
        0.0
    } else {
        samples.iter().std_dev()
    };
    let n = samples.len() as f64;
    Some(UncertaintySummary {
        median,
        ci_95: (lower, upper),
        mean,
        std_dev,
        median_standard_error: MEDIAN_SE_FACTOR * std_dev / n.sqrt(),
        samples: samples.len(),
    })
}

use crate::domain::model::{DomainSalary, SalaryStats};
use crate::utils::error::{InsightsError, Result};

/// Min, max, mean and median of a salary list.
///
/// An empty list is an error rather than a row of zeros, and so is any NaN
/// or infinite salary. The median of an even-length list is the mean of its
/// two middle values.
pub fn compute_salary_stats(salaries: &[f64]) -> Result<SalaryStats> {
    if salaries.is_empty() {
        return Err(InsightsError::empty("salary data"));
    }
    if let Some(&value) = salaries.iter().find(|s| !s.is_finite()) {
        return Err(InsightsError::NonFiniteValue { value });
    }

    let mut sorted = salaries.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let count = sorted.len();
    let min = sorted[0];
    let max = sorted[count - 1];
    let mid = count / 2;
    let median = if count % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    };
    // Summation error can push the mean a hair outside [min, max].
    let mean = (sorted.iter().sum::<f64>() / count as f64).clamp(min, max);

    Ok(SalaryStats {
        min,
        max,
        mean,
        median,
        count,
    })
}

/// Statistics over the per-domain average salaries.
pub fn salary_stats_from_insights(insights: &[DomainSalary]) -> Result<SalaryStats> {
    let salaries: Vec<f64> = insights.iter().map(|entry| entry.avg_salary).collect();
    compute_salary_stats(&salaries)
}

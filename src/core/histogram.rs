//! Salary range buckets such as `"5K-10K"` and `"30K+"`.

use crate::domain::model::SalaryRangeCount;
use crate::utils::error::{InsightsError, Result};
use serde::Serialize;

/// Range labels the backend uses, in display order.
pub const STANDARD_RANGE_LABELS: [&str; 7] = [
    "0-5K", "5K-10K", "10K-15K", "15K-20K", "20K-25K", "25K-30K", "30K+",
];

/// `[lower, upper)`; an `upper` of `None` makes this the catch-all top bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryBucket {
    pub label: String,
    pub lower: f64,
    pub upper: Option<f64>,
}

fn invalid_label(label: &str, reason: &str) -> InsightsError {
    InsightsError::InvalidConfigValueError {
        field: "salary_range.label".to_string(),
        value: label.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_amount(label: &str, raw: &str) -> Result<f64> {
    let raw = raw.trim();
    let (digits, multiplier) = match raw.strip_suffix(['K', 'k']) {
        Some(digits) => (digits, 1000.0),
        None => (raw, 1.0),
    };
    digits
        .trim()
        .parse::<f64>()
        .map(|value| value * multiplier)
        .map_err(|_| invalid_label(label, "Bound is not a number"))
}

impl SalaryBucket {
    pub fn parse(label: &str) -> Result<Self> {
        let trimmed = label.trim();

        if let Some(lower) = trimmed.strip_suffix('+') {
            return Ok(Self {
                label: trimmed.to_string(),
                lower: parse_amount(label, lower)?,
                upper: None,
            });
        }

        let (lower, upper) = trimmed
            .split_once('-')
            .ok_or_else(|| invalid_label(label, "Expected 'LOW-HIGH' or 'LOW+'"))?;
        let lower = parse_amount(label, lower)?;
        let upper = parse_amount(label, upper)?;
        if upper <= lower {
            return Err(invalid_label(label, "Upper bound must exceed lower bound"));
        }

        Ok(Self {
            label: trimmed.to_string(),
            lower,
            upper: Some(upper),
        })
    }

    /// NaN and infinities belong to no bucket.
    pub fn contains(&self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        match self.upper {
            Some(upper) => value >= self.lower && value < upper,
            None => value >= self.lower,
        }
    }
}

pub fn buckets_from_labels<S: AsRef<str>>(labels: &[S]) -> Result<Vec<SalaryBucket>> {
    let buckets = labels
        .iter()
        .map(|label| SalaryBucket::parse(label.as_ref()))
        .collect::<Result<Vec<_>>>()?;

    if let Some(pos) = buckets.iter().position(|b| b.upper.is_none()) {
        if pos + 1 != buckets.len() {
            return Err(invalid_label(
                &buckets[pos].label,
                "Only the last range may be open-ended",
            ));
        }
    }

    Ok(buckets)
}

pub fn standard_buckets() -> Vec<SalaryBucket> {
    STANDARD_RANGE_LABELS
        .iter()
        .filter_map(|label| SalaryBucket::parse(label).ok())
        .collect()
}

/// Counts salaries per bucket, zero-filled, in bucket order.
///
/// A value no bucket covers fails with `UnboundedValue`; only an open-ended
/// top bucket absorbs values past the last bounded range.
pub fn range_histogram(salaries: &[f64], buckets: &[SalaryBucket]) -> Result<Vec<SalaryRangeCount>> {
    let mut counts = vec![0u64; buckets.len()];

    for &value in salaries {
        let slot = buckets
            .iter()
            .position(|bucket| bucket.contains(value))
            .ok_or(InsightsError::UnboundedValue { value })?;
        counts[slot] += 1;
    }

    Ok(buckets
        .iter()
        .zip(counts)
        .map(|(bucket, count)| SalaryRangeCount {
            range: bucket.label.clone(),
            count,
        })
        .collect())
}

/// Puts backend range counts into bucket order, filling gaps with zero.
/// Labels outside `buckets` are dropped.
pub fn order_range_counts(counts: &[SalaryRangeCount], buckets: &[SalaryBucket]) -> Vec<SalaryRangeCount> {
    for unknown in counts
        .iter()
        .filter(|c| !buckets.iter().any(|b| b.label == c.range))
    {
        tracing::debug!("Dropping unknown salary range label: {}", unknown.range);
    }

    buckets
        .iter()
        .map(|bucket| SalaryRangeCount {
            range: bucket.label.clone(),
            count: counts
                .iter()
                .filter(|c| c.range == bucket.label)
                .map(|c| c.count)
                .sum(),
        })
        .collect()
}

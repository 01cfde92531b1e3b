//! Ranking, grouping and joining over flat backend records.
//!
//! Every function borrows its input and returns fresh values, so callers can
//! run several summaries over the same fetched dataset.

use crate::core::stats::compute_salary_stats;
use crate::domain::model::{
    CompanyStat, DomainComparison, DomainCount, DomainSalary, DomainStat, JobRecord, LocationStat,
    SalaryStats, REMOTE_LOCATION,
};
use std::collections::HashMap;
use std::hash::Hash;

/// First `n` records by descending `key`. Ties keep their input order.
pub fn top_n<T: Clone>(records: &[T], n: usize, key: impl Fn(&T) -> f64) -> Vec<T> {
    let mut sorted: Vec<&T> = records.iter().collect();
    // sort_by is stable, which is what keeps tied records in input order
    sorted.sort_by(|a, b| key(b).total_cmp(&key(a)));
    sorted.into_iter().take(n).cloned().collect()
}

/// Occurrence count per key, in the order keys were first seen.
pub fn group_count_by<T, K>(records: &[T], key_fn: impl Fn(&T) -> K) -> Vec<(K, u64)>
where
    K: Eq + Hash + Clone,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut counts: Vec<(K, u64)> = Vec::new();

    for record in records {
        let key = key_fn(record);
        match index.get(&key) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(key.clone(), counts.len());
                counts.push((key, 1));
            }
        }
    }

    counts
}

/// Inner join of demand and pay on domain name, in `counts` order.
///
/// Domains present in only one input are dropped. A duplicated domain in
/// `salaries` resolves to its first entry.
pub fn join_domain_count_and_salary(
    counts: &[DomainCount],
    salaries: &[DomainSalary],
) -> Vec<DomainStat> {
    let mut salary_by_domain: HashMap<&str, f64> = HashMap::with_capacity(salaries.len());
    for entry in salaries {
        salary_by_domain
            .entry(entry.domain.as_str())
            .or_insert(entry.avg_salary);
    }

    counts
        .iter()
        .filter_map(|entry| {
            salary_by_domain
                .get(entry.domain.as_str())
                .map(|&avg_salary| DomainStat {
                    domain: entry.domain.clone(),
                    count: entry.count,
                    avg_salary,
                })
        })
        .collect()
}

/// Splits the remote bucket off a location list.
///
/// Returns the merged remote entry (if any) and the physical locations sorted
/// by descending count.
pub fn split_remote(locations: &[LocationStat]) -> (Option<LocationStat>, Vec<LocationStat>) {
    let mut remote: Option<LocationStat> = None;
    let mut physical = Vec::with_capacity(locations.len());

    for location in locations {
        if location.city.eq_ignore_ascii_case(REMOTE_LOCATION) {
            match remote.as_mut() {
                Some(existing) => existing.count += location.count,
                None => remote = Some(location.clone()),
            }
        } else {
            physical.push(location.clone());
        }
    }

    let physical_len = physical.len();
    (remote, top_n(&physical, physical_len, |l| l.count as f64))
}

/// Job counts per city. A listing with `"Delhi, Mumbai"` counts once for each.
pub fn location_counts(jobs: &[JobRecord]) -> Vec<LocationStat> {
    let cities: Vec<String> = jobs
        .iter()
        .flat_map(|job| job.location.split(','))
        .map(str::trim)
        .filter(|city| !city.is_empty())
        .map(str::to_string)
        .collect();

    let counts: Vec<LocationStat> = group_count_by(&cities, |city| city.clone())
        .into_iter()
        .map(|(city, count)| LocationStat { city, count })
        .collect();

    top_n(&counts, counts.len(), |l| l.count as f64)
}

pub fn company_counts(jobs: &[JobRecord]) -> Vec<CompanyStat> {
    let counts: Vec<CompanyStat> = group_count_by(jobs, |job| job.company.clone())
        .into_iter()
        .map(|(company, count)| CompanyStat { company, count })
        .collect();

    top_n(&counts, counts.len(), |c| c.count as f64)
}

/// Listing count and mean salary per domain, busiest domain first.
pub fn domain_stats(jobs: &[JobRecord]) -> Vec<DomainStat> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<(String, u64, f64)> = Vec::new();

    for job in jobs {
        match index.get(job.domain.as_str()) {
            Some(&slot) => {
                totals[slot].1 += 1;
                totals[slot].2 += job.avg_salary;
            }
            None => {
                index.insert(job.domain.as_str(), totals.len());
                totals.push((job.domain.clone(), 1, job.avg_salary));
            }
        }
    }

    let stats: Vec<DomainStat> = totals
        .into_iter()
        .map(|(domain, count, salary_sum)| DomainStat {
            domain,
            count,
            avg_salary: salary_sum / count as f64,
        })
        .collect();

    top_n(&stats, stats.len(), |s| s.count as f64)
}

/// Client-side summary of one filtered listing set.
#[derive(Debug, Clone, PartialEq)]
pub struct JobSummary {
    pub total: usize,
    pub domains: Vec<DomainStat>,
    pub companies: Vec<CompanyStat>,
    pub locations: Vec<LocationStat>,
    /// `None` when the set is empty; there is no meaningful median then.
    pub salary: Option<SalaryStats>,
}

pub fn summarize_jobs(jobs: &[JobRecord]) -> JobSummary {
    let salaries: Vec<f64> = jobs.iter().map(|job| job.avg_salary).collect();

    JobSummary {
        total: jobs.len(),
        domains: domain_stats(jobs),
        companies: company_counts(jobs),
        locations: location_counts(jobs),
        salary: compute_salary_stats(&salaries).ok(),
    }
}

/// `part` as a rounded percentage of `total`; `None` when `total` is zero.
pub fn share_percent(part: u64, total: u64) -> Option<u32> {
    if total == 0 {
        return None;
    }
    Some(((part as f64 / total as f64) * 100.0).round() as u32)
}

pub const BALANCED_DEMAND_FACTOR: f64 = 1.2;
pub const BALANCED_SALARY_FACTOR: f64 = 1.1;

/// Domains clearly above average on both demand and pay.
pub fn balanced_domains(stats: &[DomainStat], demand_factor: f64, salary_factor: f64) -> Vec<DomainStat> {
    if stats.is_empty() {
        return Vec::new();
    }

    let len = stats.len() as f64;
    let mean_count = stats.iter().map(|s| s.count as f64).sum::<f64>() / len;
    let mean_salary = stats.iter().map(|s| s.avg_salary).sum::<f64>() / len;

    stats
        .iter()
        .filter(|s| {
            s.count as f64 > mean_count * demand_factor && s.avg_salary > mean_salary * salary_factor
        })
        .cloned()
        .collect()
}

/// Differences of `first` relative to `second`.
#[derive(Debug, Clone, PartialEq)]
pub struct PairComparison {
    pub first: String,
    pub second: String,
    pub salary_diff: f64,
    pub count_diff: i64,
}

pub fn compare_pair(first: &DomainComparison, second: &DomainComparison) -> PairComparison {
    PairComparison {
        first: first.domain.clone(),
        second: second.domain.clone(),
        salary_diff: first.avg_salary - second.avg_salary,
        count_diff: first.count as i64 - second.count as i64,
    }
}

//! Templated sentences describing the aggregates on each page.

use crate::app::presentation::format_currency;
use crate::core::aggregate::{
    balanced_domains, share_percent, top_n, PairComparison, BALANCED_DEMAND_FACTOR,
    BALANCED_SALARY_FACTOR,
};
use crate::domain::model::{CompanyStat, DomainCount, DomainSalary, DomainStat};
use std::cmp::Ordering;

pub fn most_in_demand(top: &DomainCount) -> String {
    format!("{} with {} openings", top.domain, top.count)
}

pub fn highest_paying(top: &DomainSalary, currency: &str) -> String {
    format!("{} ({})", top.domain, format_currency(top.avg_salary, currency))
}

pub fn top_domains_insight(domains: &[DomainCount]) -> Option<String> {
    let ranked = top_n(domains, 2, |d| d.count as f64);
    match ranked.as_slice() {
        [first, second] => Some(format!(
            "{} leads the pack with {} openings, followed by {} with {} opportunities.",
            first.domain, first.count, second.domain, second.count
        )),
        [only] => Some(format!("{} is the only domain with {} openings.", only.domain, only.count)),
        _ => None,
    }
}

pub fn salary_vs_demand_insight(stats: &[DomainStat], currency: &str) -> Option<String> {
    let highest_demand = top_n(stats, 1, |s| s.count as f64).into_iter().next()?;
    let highest_paying = top_n(stats, 1, |s| s.avg_salary).into_iter().next()?;

    let mut text = format!(
        "{} shows the highest demand, while {} offers the highest average salary ({}).",
        highest_demand.domain,
        highest_paying.domain,
        format_currency(highest_paying.avg_salary, currency)
    );

    let balanced = balanced_domains(stats, BALANCED_DEMAND_FACTOR, BALANCED_SALARY_FACTOR);
    if !balanced.is_empty() {
        let names: Vec<&str> = balanced.iter().take(2).map(|s| s.domain.as_str()).collect();
        let verb = if names.len() == 1 { "provides" } else { "provide" };
        text.push_str(&format!(
            " {} {} the best balance of demand and compensation for job seekers.",
            names.join(" and "),
            verb
        ));
    }

    Some(text)
}

pub fn company_hiring_insight(companies: &[CompanyStat]) -> Option<String> {
    let ranked = top_n(companies, 3, |c| c.count as f64);
    let (leader, followers) = ranked.split_first()?;

    let mut text = format!("{} leads with {} openings", leader.company, leader.count);
    if !followers.is_empty() {
        let rest: Vec<String> = followers
            .iter()
            .map(|c| format!("{} ({})", c.company, c.count))
            .collect();
        text.push_str(&format!(", followed by {}", rest.join(" and ")));
    }
    text.push('.');

    Some(text)
}

/// Remote share headline plus the work-mode trend, e.g.
/// `("62% of internships are remote (Work from Home)", "Remote work dominates ...")`.
pub fn remote_work_trend(remote: u64, total: u64) -> Option<(String, String)> {
    let percent = share_percent(remote, total)?.min(100);
    let headline = format!("{}% of internships are remote (Work from Home)", percent);
    let trend = if percent > 50 {
        format!("Remote work dominates the internship market at {}%", percent)
    } else {
        format!("In-office internships are more common ({}%)", 100 - percent)
    };
    Some((headline, trend))
}

pub fn comparison_analysis(diff: &PairComparison, currency: &str) -> Vec<String> {
    let (first, second) = (&diff.first, &diff.second);
    // Differences that format as zero currency count as ties.
    let salary = diff.salary_diff.round().partial_cmp(&0.0).unwrap_or(Ordering::Equal);
    let demand = diff.count_diff.cmp(&0);

    let salary_line = match salary {
        Ordering::Greater => format!(
            "{} offers a higher average salary by {} compared to {}.",
            first,
            format_currency(diff.salary_diff, currency),
            second
        ),
        Ordering::Less => format!(
            "{} has a lower average salary by {} compared to {}.",
            first,
            format_currency(diff.salary_diff.abs(), currency),
            second
        ),
        Ordering::Equal => format!("{} and {} offer the same average salary.", first, second),
    };

    let demand_line = match demand {
        Ordering::Greater => format!(
            "In terms of demand, {} has more openings with {} more listings compared to {}.",
            first, diff.count_diff, second
        ),
        Ordering::Less => format!(
            "In terms of demand, {} has fewer openings with {} less listings compared to {}.",
            first,
            diff.count_diff.unsigned_abs(),
            second
        ),
        Ordering::Equal => format!(
            "In terms of demand, {} and {} have the same number of listings.",
            first, second
        ),
    };

    let recommendation = match (salary, demand) {
        (Ordering::Greater, Ordering::Greater) => format!(
            "{} currently offers better opportunities with both higher demand and better compensation.",
            first
        ),
        (Ordering::Less, Ordering::Less) => format!(
            "{} currently offers better opportunities with both higher demand and better compensation.",
            second
        ),
        (Ordering::Greater, Ordering::Less) => format!(
            "{} offers better compensation but {} has more openings. Consider your priorities between salary and job availability.",
            first, second
        ),
        (Ordering::Less, Ordering::Greater) => format!(
            "{} has more openings but {} offers better compensation. Consider your priorities between salary and job availability.",
            first, second
        ),
        (Ordering::Greater, Ordering::Equal) => format!(
            "{} offers better compensation with a similar number of openings.",
            first
        ),
        (Ordering::Less, Ordering::Equal) => format!(
            "{} offers better compensation with a similar number of openings.",
            second
        ),
        (Ordering::Equal, Ordering::Greater) => {
            format!("{} has more openings at a comparable salary.", first)
        }
        (Ordering::Equal, Ordering::Less) => {
            format!("{} has more openings at a comparable salary.", second)
        }
        (Ordering::Equal, Ordering::Equal) => format!(
            "{} and {} offer comparable demand and compensation.",
            first, second
        ),
    };

    vec![
        salary_line,
        demand_line,
        format!("Recommendation: {}", recommendation),
    ]
}

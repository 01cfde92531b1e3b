//! Demand/salary quadrants relative to a dataset's own averages.

use crate::domain::model::DomainStat;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    HighDemandHighSalary,
    LowDemandHighSalary,
    HighDemandLowSalary,
    LowDemandLowSalary,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::HighDemandHighSalary,
        Quadrant::LowDemandHighSalary,
        Quadrant::HighDemandLowSalary,
        Quadrant::LowDemandLowSalary,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Quadrant::HighDemandHighSalary => "High demand / high salary",
            Quadrant::LowDemandHighSalary => "Low demand / high salary",
            Quadrant::HighDemandLowSalary => "High demand / low salary",
            Quadrant::LowDemandLowSalary => "Low demand / low salary",
        }
    }

    fn from_flags(high_demand: bool, high_salary: bool) -> Self {
        match (high_demand, high_salary) {
            (true, true) => Quadrant::HighDemandHighSalary,
            (false, true) => Quadrant::LowDemandHighSalary,
            (true, false) => Quadrant::HighDemandLowSalary,
            (false, false) => Quadrant::LowDemandLowSalary,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuadrantThresholds {
    pub avg_demand: f64,
    pub avg_salary: f64,
}

impl QuadrantThresholds {
    /// Values equal to a threshold land on the low side.
    pub fn quadrant_of(&self, stat: &DomainStat) -> Quadrant {
        Quadrant::from_flags(
            stat.count as f64 > self.avg_demand,
            stat.avg_salary > self.avg_salary,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuadrantClassification {
    /// Absent when classifying an empty set.
    pub thresholds: Option<QuadrantThresholds>,
    pub high_demand_high_salary: Vec<DomainStat>,
    pub low_demand_high_salary: Vec<DomainStat>,
    pub high_demand_low_salary: Vec<DomainStat>,
    pub low_demand_low_salary: Vec<DomainStat>,
}

impl QuadrantClassification {
    pub fn bucket(&self, quadrant: Quadrant) -> &[DomainStat] {
        match quadrant {
            Quadrant::HighDemandHighSalary => &self.high_demand_high_salary,
            Quadrant::LowDemandHighSalary => &self.low_demand_high_salary,
            Quadrant::HighDemandLowSalary => &self.high_demand_low_salary,
            Quadrant::LowDemandLowSalary => &self.low_demand_low_salary,
        }
    }

    fn bucket_mut(&mut self, quadrant: Quadrant) -> &mut Vec<DomainStat> {
        match quadrant {
            Quadrant::HighDemandHighSalary => &mut self.high_demand_high_salary,
            Quadrant::LowDemandHighSalary => &mut self.low_demand_high_salary,
            Quadrant::HighDemandLowSalary => &mut self.high_demand_low_salary,
            Quadrant::LowDemandLowSalary => &mut self.low_demand_low_salary,
        }
    }

    pub fn quadrant_of(&self, domain: &str) -> Option<Quadrant> {
        Quadrant::ALL
            .into_iter()
            .find(|&q| self.bucket(q).iter().any(|s| s.domain == domain))
    }

    pub fn len(&self) -> usize {
        Quadrant::ALL.iter().map(|&q| self.bucket(q).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partitions every record into exactly one quadrant, preserving input order
/// within each bucket.
pub fn classify_quadrants(stats: &[DomainStat]) -> QuadrantClassification {
    let mut classification = QuadrantClassification::default();
    if stats.is_empty() {
        return classification;
    }

    let len = stats.len() as f64;
    let thresholds = QuadrantThresholds {
        avg_demand: stats.iter().map(|s| s.count as f64).sum::<f64>() / len,
        avg_salary: stats.iter().map(|s| s.avg_salary).sum::<f64>() / len,
    };

    for stat in stats {
        classification
            .bucket_mut(thresholds.quadrant_of(stat))
            .push(stat.clone());
    }
    classification.thresholds = Some(thresholds);

    classification
}

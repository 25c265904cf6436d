//! Threshold heuristics shown under the correlation charts.

use std::fmt;

use crate::config::DashboardConfig;
use crate::data::aggregate;
use crate::data::model::{Employee, Numeric};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Healthy,
    Attention,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightKind {
    /// Share of employees scoring at or above the high-performance threshold.
    HighPerformance,
    /// Mean satisfaction level.
    Satisfaction,
    /// Mean monthly hours against the unfiltered median.
    Workload,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Insight {
    pub kind: InsightKind,
    pub value: Option<f64>,
    pub verdict: Verdict,
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = |precision: usize| {
            self.value
                .map(|v| format!("{v:.precision$}"))
                .unwrap_or_else(|| "no data".to_string())
        };
        match (self.kind, self.verdict) {
            (InsightKind::HighPerformance, verdict) => {
                write!(f, "High performance: {}% of staff at the top scores. ", value(1))?;
                f.write_str(match verdict {
                    Verdict::Healthy => "Healthy level.",
                    Verdict::Attention => "Room for improvement.",
                })
            }
            (InsightKind::Satisfaction, verdict) => {
                write!(f, "Average satisfaction: {}. ", value(2))?;
                f.write_str(match verdict {
                    Verdict::Healthy => "Within a good range.",
                    Verdict::Attention => "Review the work climate.",
                })
            }
            (InsightKind::Workload, verdict) => {
                write!(f, "Average hours: {} h/month. ", value(1))?;
                f.write_str(match verdict {
                    Verdict::Healthy => "In line with the median.",
                    Verdict::Attention => "Watch workloads of teams above the median.",
                })
            }
        }
    }
}

/// Evaluate every heuristic over `rows`. `baseline_hours` is the median
/// monthly hours of the unfiltered dataset.
pub fn insights<'a, I>(rows: I, baseline_hours: Option<f64>, config: &DashboardConfig) -> Vec<Insight>
where
    I: IntoIterator<Item = &'a Employee>,
    I::IntoIter: Clone,
{
    let rows = rows.into_iter();

    let high_share = aggregate::proportion_at_least(
        rows.clone(),
        Numeric::PerformanceScore,
        config.high_performance_threshold,
    );
    let satisfaction = aggregate::mean(rows.clone(), Numeric::SatisfactionLevel);
    let hours = aggregate::mean(rows, Numeric::AverageWorkHours);

    let verdict = |healthy: bool| if healthy { Verdict::Healthy } else { Verdict::Attention };
    let overworked = matches!((hours, baseline_hours), (Some(h), Some(m)) if h > m);

    vec![
        Insight {
            kind: InsightKind::HighPerformance,
            value: Some(high_share),
            verdict: verdict(high_share >= config.healthy_high_performance_share),
        },
        Insight {
            kind: InsightKind::Satisfaction,
            value: satisfaction,
            verdict: verdict(satisfaction.is_some_and(|s| s >= config.healthy_satisfaction)),
        },
        Insight {
            kind: InsightKind::Workload,
            value: hours,
            verdict: verdict(!overworked),
        },
    ]
}

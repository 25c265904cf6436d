//! Pure aggregations over any sequence of records.
//!
//! Every function takes an iterator of `&Employee`, so it works equally on a
//! whole table (`&table.records`) and on a [`FilteredView`](super::FilteredView)
//! (`view.iter()`). Missing values are skipped per column; an empty input
//! never panics.

use std::collections::BTreeMap;

use super::model::{Category, Employee, Numeric};

/// Mean of one numeric column inside one group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMean {
    pub key: String,
    pub mean: f64,
    /// Rows that contributed to the mean.
    pub count: usize,
}

/// Mean of one numeric column inside a two-level group.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossMean {
    pub row: String,
    pub col: String,
    pub mean: f64,
    pub count: usize,
}

/// Means of two numeric columns inside one group.
#[derive(Debug, Clone, PartialEq)]
pub struct PairedMean {
    pub key: String,
    pub x: f64,
    pub y: f64,
    pub count: usize,
}

/// Count and percentage of one category value.
#[derive(Debug, Clone, PartialEq)]
pub struct Share {
    pub key: String,
    pub count: usize,
    /// Percentage of all non-missing values, rounded to one decimal.
    pub pct: f64,
}

/// One histogram bin covering `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trend {
    pub slope: f64,
    pub intercept: f64,
}

impl Trend {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Accumulator {
    sum: f64,
    count: usize,
}

impl Accumulator {
    fn push(&mut self, v: f64) {
        self.sum += v;
        self.count += 1;
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

pub fn count<'a>(rows: impl IntoIterator<Item = &'a Employee>) -> usize {
    rows.into_iter().count()
}

/// Arithmetic mean, ignoring missing values. `None` when there is no data.
pub fn mean<'a>(rows: impl IntoIterator<Item = &'a Employee>, col: Numeric) -> Option<f64> {
    let mut acc = Accumulator::default();
    for v in rows.into_iter().filter_map(|r| r.numeric(col)) {
        acc.push(v);
    }
    acc.mean()
}

/// Median, ignoring missing values. `None` when there is no data.
pub fn median<'a>(rows: impl IntoIterator<Item = &'a Employee>, col: Numeric) -> Option<f64> {
    let mut values: Vec<f64> = rows.into_iter().filter_map(|r| r.numeric(col)).collect();
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// Percentage of non-missing values satisfying `test`. 0 when there are none.
pub fn share_where<'a>(
    rows: impl IntoIterator<Item = &'a Employee>,
    col: Numeric,
    test: impl Fn(f64) -> bool,
) -> f64 {
    let (hits, total) = rows
        .into_iter()
        .filter_map(|r| r.numeric(col))
        .fold((0usize, 0usize), |(hits, total), v| {
            (hits + usize::from(test(v)), total + 1)
        });
    if total == 0 {
        0.0
    } else {
        hits as f64 * 100.0 / total as f64
    }
}

/// Percentage of non-missing values `>= threshold`.
pub fn proportion_at_least<'a>(
    rows: impl IntoIterator<Item = &'a Employee>,
    col: Numeric,
    threshold: f64,
) -> f64 {
    share_where(rows, col, |v| v >= threshold)
}

// ---------------------------------------------------------------------------
// Grouped
// ---------------------------------------------------------------------------

/// Mean of `target` per value of `by`, sorted by key. Rows missing either
/// column are dropped; unobserved keys have no entry.
pub fn group_mean<'a>(
    rows: impl IntoIterator<Item = &'a Employee>,
    by: Category,
    target: Numeric,
) -> Vec<GroupMean> {
    let mut groups: BTreeMap<&str, Accumulator> = BTreeMap::new();
    for r in rows {
        if let (Some(key), Some(v)) = (r.category(by), r.numeric(target)) {
            groups.entry(key).or_default().push(v);
        }
    }
    groups
        .into_iter()
        .filter_map(|(key, acc)| {
            Some(GroupMean {
                key: key.to_string(),
                mean: acc.mean()?,
                count: acc.count,
            })
        })
        .collect()
}

/// Mean of `target` per observed `(row, col)` combination, sorted by key.
pub fn group_mean2<'a>(
    rows: impl IntoIterator<Item = &'a Employee>,
    row_by: Category,
    col_by: Category,
    target: Numeric,
) -> Vec<CrossMean> {
    let mut groups: BTreeMap<(&str, &str), Accumulator> = BTreeMap::new();
    for r in rows {
        if let (Some(a), Some(b), Some(v)) =
            (r.category(row_by), r.category(col_by), r.numeric(target))
        {
            groups.entry((a, b)).or_default().push(v);
        }
    }
    groups
        .into_iter()
        .filter_map(|((a, b), acc)| {
            Some(CrossMean {
                row: a.to_string(),
                col: b.to_string(),
                mean: acc.mean()?,
                count: acc.count,
            })
        })
        .collect()
}

/// Means of `x` and `y` per value of `by`, over rows where all three are
/// present.
pub fn paired_group_mean<'a>(
    rows: impl IntoIterator<Item = &'a Employee>,
    by: Category,
    x: Numeric,
    y: Numeric,
) -> Vec<PairedMean> {
    let mut groups: BTreeMap<&str, (Accumulator, Accumulator)> = BTreeMap::new();
    for r in rows {
        if let (Some(key), Some(vx), Some(vy)) = (r.category(by), r.numeric(x), r.numeric(y)) {
            let (ax, ay) = groups.entry(key).or_default();
            ax.push(vx);
            ay.push(vy);
        }
    }
    groups
        .into_iter()
        .filter_map(|(key, (ax, ay))| {
            Some(PairedMean {
                key: key.to_string(),
                x: ax.mean()?,
                y: ay.mean()?,
                count: ax.count,
            })
        })
        .collect()
}

/// The `n` groups with the highest mean, descending. Ties keep key order.
pub fn top_group_means<'a>(
    rows: impl IntoIterator<Item = &'a Employee>,
    by: Category,
    target: Numeric,
    n: usize,
) -> Vec<GroupMean> {
    let mut groups = group_mean(rows, by, target);
    groups.sort_by(|a, b| b.mean.total_cmp(&a.mean));
    groups.truncate(n);
    groups
}

/// Count and percentage per observed category value, sorted by key.
pub fn category_shares<'a>(rows: impl IntoIterator<Item = &'a Employee>, by: Category) -> Vec<Share> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for key in rows.into_iter().filter_map(|r| r.category(by)) {
        *counts.entry(key).or_default() += 1;
    }
    let total: usize = counts.values().sum();
    counts
        .into_iter()
        .map(|(key, count)| Share {
            key: key.to_string(),
            count,
            pct: (count as f64 / total as f64 * 1000.0).round() / 10.0,
        })
        .collect()
}

/// Fixed-width histogram with bins aligned at multiples of `step`. Only
/// occupied bins are returned, ascending. A non-positive step yields nothing.
pub fn histogram<'a>(rows: impl IntoIterator<Item = &'a Employee>, col: Numeric, step: f64) -> Vec<Bin> {
    if step <= 0.0 || !step.is_finite() {
        return Vec::new();
    }
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for v in rows.into_iter().filter_map(|r| r.numeric(col)) {
        *counts.entry(bin_index(v, step)).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(k, count)| Bin {
            start: k as f64 * step,
            end: (k + 1) as f64 * step,
            count,
        })
        .collect()
}

/// Index of the bin holding `v`. A value on a bin edge belongs to the bin it
/// starts, even when `v / step` lands just below a whole number.
fn bin_index(v: f64, step: f64) -> i64 {
    let q = v / step;
    let nearest = q.round();
    if (q - nearest).abs() < 1e-9 {
        nearest as i64
    } else {
        q.floor() as i64
    }
}

// ---------------------------------------------------------------------------
// Regression
// ---------------------------------------------------------------------------

/// Ordinary least-squares fit. `None` with fewer than two points or when
/// every `x` is equal.
pub fn linear_regression(points: &[(f64, f64)]) -> Option<Trend> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;
    let (sxy, sxx) = points.iter().fold((0.0, 0.0), |(sxy, sxx), &(x, y)| {
        let dx = x - mean_x;
        (sxy + dx * (y - mean_y), sxx + dx * dx)
    });
    // Relative to the magnitude of x, so tiny but distinct values still fit.
    let scale = points.iter().map(|p| p.0 * p.0).sum::<f64>();
    if sxx <= f64::EPSILON * scale {
        return None;
    }
    let slope = sxy / sxx;
    Some(Trend {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}

/// Endpoints of the fitted line over the observed `x` extent.
pub fn trend_segment(points: &[(f64, f64)]) -> Option<[[f64; 2]; 2]> {
    let trend = linear_regression(points)?;
    let (lo, hi) = points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
        (lo.min(p.0), hi.max(p.0))
    });
    Some([[lo, trend.predict(lo)], [hi, trend.predict(hi)]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::sample_table;

    fn scored(salary: Option<f64>, performance: Option<f64>) -> Employee {
        Employee {
            salary,
            performance_score: performance,
            ..Default::default()
        }
    }

    #[test]
    fn mean_skips_missing_values() {
        let rows = vec![
            scored(Some(10.0), None),
            scored(Some(20.0), None),
            scored(Some(30.0), None),
            scored(None, None),
        ];
        assert_eq!(mean(&rows, Numeric::Salary), Some(20.0));
        assert_eq!(count(&rows), 4);
    }

    #[test]
    fn proportion_counts_only_present_values() {
        let rows = vec![
            scored(None, Some(1.0)),
            scored(None, Some(4.0)),
            scored(None, Some(5.0)),
            scored(None, None),
        ];
        let pct = proportion_at_least(&rows, Numeric::PerformanceScore, 4.0);
        assert!((pct - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(format!("{pct:.1}"), "66.7");
    }

    #[test]
    fn empty_input_is_safe() {
        let rows: Vec<Employee> = Vec::new();
        assert_eq!(count(&rows), 0);
        assert_eq!(mean(&rows, Numeric::Salary), None);
        assert_eq!(median(&rows, Numeric::Salary), None);
        assert_eq!(proportion_at_least(&rows, Numeric::PerformanceScore, 4.0), 0.0);
        assert!(group_mean(&rows, Category::Gender, Numeric::Salary).is_empty());
        assert!(category_shares(&rows, Category::MaritalStatus).is_empty());
        assert!(histogram(&rows, Numeric::PerformanceScore, 1.0).is_empty());
        assert_eq!(linear_regression(&[]), None);
    }

    #[test]
    fn median_handles_odd_and_even_counts() {
        let table = sample_table();
        // Hours: 160, 175, 182, 150, 168 (Jorge missing).
        assert_eq!(median(&table.records, Numeric::AverageWorkHours), Some(168.0));
        let rows = vec![scored(Some(1.0), None), scored(Some(4.0), None)];
        assert_eq!(median(&rows, Numeric::Salary), Some(2.5));
    }

    #[test]
    fn group_mean_drops_incomplete_rows() {
        let table = sample_table();
        let by_gender = group_mean(&table.records, Category::Gender, Numeric::AverageWorkHours);
        assert_eq!(
            by_gender,
            vec![
                GroupMean { key: "F".into(), mean: 170.0, count: 3 },
                GroupMean { key: "M".into(), mean: 162.5, count: 2 },
            ]
        );
    }

    #[test]
    fn group_mean2_only_reports_observed_combinations() {
        let table = sample_table();
        let cells = group_mean2(
            &table.records,
            Category::Gender,
            Category::MaritalStatus,
            Numeric::PerformanceScore,
        );
        let keys: Vec<(&str, &str)> = cells.iter().map(|c| (c.row.as_str(), c.col.as_str())).collect();
        assert_eq!(
            keys,
            vec![("F", "Divorced"), ("F", "Married"), ("F", "Single"), ("M", "Married"), ("M", "Single")]
        );
        // Jorge has no score, so M/Married is Pedro alone.
        let m_married = &cells[3];
        assert_eq!((m_married.mean, m_married.count), (2.0, 1));
    }

    #[test]
    fn top_groups_sort_descending_and_truncate() {
        let table = sample_table();
        let top = top_group_means(&table.records, Category::Position, Numeric::Salary, 2);
        let keys: Vec<&str> = top.iter().map(|g| g.key.as_str()).collect();
        // Manager: 78000 (Luis missing), Engineer: 59500, Analyst: 46500.
        assert_eq!(keys, vec!["Manager", "Engineer"]);
        assert_eq!(top[1].mean, 59500.0);
    }

    #[test]
    fn paired_means_require_all_three_values() {
        let table = sample_table();
        let pairs = paired_group_mean(
            &table.records,
            Category::Position,
            Numeric::SatisfactionLevel,
            Numeric::PerformanceScore,
        );
        let engineer = pairs.iter().find(|p| p.key == "Engineer").unwrap();
        assert_eq!((engineer.x, engineer.y, engineer.count), (3.6, 3.0, 1));
    }

    #[test]
    fn shares_round_to_one_decimal() {
        let table = sample_table();
        let shares = category_shares(&table.records, Category::MaritalStatus);
        let pcts: Vec<(&str, usize, f64)> = shares.iter().map(|s| (s.key.as_str(), s.count, s.pct)).collect();
        assert_eq!(
            pcts,
            vec![("Divorced", 1, 16.7), ("Married", 3, 50.0), ("Single", 2, 33.3)]
        );
    }

    #[test]
    fn histogram_bins_align_to_step() {
        let table = sample_table();
        let bins = histogram(&table.records, Numeric::PerformanceScore, 1.0);
        let summary: Vec<(f64, usize)> = bins.iter().map(|b| (b.start, b.count)).collect();
        assert_eq!(summary, vec![(2.0, 1), (3.0, 1), (4.0, 2), (5.0, 1)]);
        assert_eq!(bins[0].end, 3.0);
        assert!(histogram(&table.records, Numeric::PerformanceScore, 0.0).is_empty());
    }

    #[test]
    fn histogram_edge_values_start_their_bin() {
        // 0.3 / 0.1 is 2.9999999999999996 in floating point.
        let rows = [scored(None, Some(0.3)), scored(None, Some(0.29)), scored(None, Some(0.3))];
        let bins = histogram(&rows, Numeric::PerformanceScore, 0.1);
        assert_eq!(bins.len(), 2);
        assert!((bins[0].start - 0.2).abs() < 1e-12);
        assert_eq!(bins[0].count, 1);
        assert!((bins[1].start - 0.3).abs() < 1e-12);
        assert_eq!(bins[1].count, 2);
    }

    #[test]
    fn regression_fits_exact_line() {
        let points = [(1.0, 3.0), (2.0, 5.0), (3.0, 7.0)];
        let trend = linear_regression(&points).unwrap();
        assert!((trend.slope - 2.0).abs() < 1e-12);
        assert!((trend.intercept - 1.0).abs() < 1e-12);
        assert_eq!(trend_segment(&points), Some([[1.0, 3.0], [3.0, 7.0]]));
    }

    #[test]
    fn regression_needs_two_distinct_x_values() {
        assert_eq!(linear_regression(&[(1.0, 2.0)]), None);
        assert_eq!(linear_regression(&[(1.0, 2.0), (1.0, 5.0)]), None);
        assert_eq!(linear_regression(&[(0.1, 1.0), (0.1, 2.0), (0.1, 3.0)]), None);
        assert_eq!(linear_regression(&[(0.0, 1.0), (0.0, 2.0)]), None);
        assert_eq!(trend_segment(&[]), None);
    }

    #[test]
    fn regression_is_independent_of_x_scale() {
        let trend = linear_regression(&[(1e-9, 1.0), (2e-9, 2.0), (3e-9, 3.0)]).unwrap();
        assert!((trend.slope - 1e9).abs() < 1.0);
        assert!(trend.intercept.abs() < 1e-6);
    }
}

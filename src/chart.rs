//! Chart specifications: plain data built from aggregations, consumed by
//! whatever renders them. Nothing here depends on a UI toolkit.

use crate::color::{ColorMap, ColorScheme, Rgb};
use crate::config::DashboardConfig;
use crate::data::aggregate::{self, Bin};
use crate::data::filter::FilteredView;
use crate::data::model::{Category, Employee, Numeric};

// ---------------------------------------------------------------------------
// Chart data structures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBar {
    pub bin: Bin,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub bars: Vec<HistogramBar>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bars {
    pub title: &'static str,
    pub category_label: &'static str,
    pub value_label: &'static str,
    /// Bars grow along the x axis, categories stacked vertically.
    pub horizontal: bool,
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    /// Hover text.
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scatter {
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub points: Vec<ScatterPoint>,
    pub color: Rgb,
    /// Regression segment over the observed x extent, if one can be fitted.
    pub trend: Option<[[f64; 2]; 2]>,
    pub trend_color: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatCell {
    /// Index into [`Heatmap::x_keys`].
    pub x: usize,
    /// Index into [`Heatmap::y_keys`].
    pub y: usize,
    pub value: f64,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Heatmap {
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub x_keys: Vec<String>,
    pub y_keys: Vec<String>,
    pub cells: Vec<HeatCell>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: String,
    pub count: usize,
    pub pct: f64,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Donut {
    pub title: &'static str,
    pub slices: Vec<Slice>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    Histogram(Histogram),
    Bars(Bars),
    Scatter(Scatter),
    Heatmap(Heatmap),
    Donut(Donut),
}

impl Chart {
    pub fn title(&self) -> &'static str {
        match self {
            Chart::Histogram(c) => c.title,
            Chart::Bars(c) => c.title,
            Chart::Scatter(c) => c.title,
            Chart::Heatmap(c) => c.title,
            Chart::Donut(c) => c.title,
        }
    }

    /// Whether there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        match self {
            Chart::Histogram(c) => c.bars.is_empty(),
            Chart::Bars(c) => c.bars.is_empty(),
            Chart::Scatter(c) => c.points.is_empty(),
            Chart::Heatmap(c) => c.cells.is_empty(),
            Chart::Donut(c) => c.slices.is_empty(),
        }
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Performance score distribution, bins of `step`.
pub fn performance_histogram(view: &FilteredView<'_>, step: f64, scheme: &ColorScheme) -> Histogram {
    let bins = aggregate::histogram(view.iter(), Numeric::PerformanceScore, step);
    let lo = bins.first().map_or(0.0, |b| b.start);
    let hi = bins.last().map_or(0.0, |b| b.start);
    Histogram {
        title: "Performance distribution",
        x_label: "Performance score",
        y_label: "Employees",
        bars: bins
            .into_iter()
            .map(|bin| HistogramBar {
                color: scheme.performance_bin(bin.start, lo, hi),
                bin,
            })
            .collect(),
    }
}

/// Headcount share per marital status.
pub fn marital_donut(view: &FilteredView<'_>) -> Donut {
    let shares = aggregate::category_shares(view.iter(), Category::MaritalStatus);
    let colors = ColorMap::new(shares.iter().map(|s| s.key.as_str()));
    Donut {
        title: "Marital status",
        slices: shares
            .into_iter()
            .map(|s| Slice {
                color: colors.color_for(&s.key),
                label: s.key,
                count: s.count,
                pct: s.pct,
            })
            .collect(),
    }
}

/// Mean monthly hours per gender.
pub fn hours_by_gender(view: &FilteredView<'_>, scheme: &ColorScheme) -> Bars {
    let groups = aggregate::group_mean(view.iter(), Category::Gender, Numeric::AverageWorkHours);
    let colors = scheme.genders(groups.iter().map(|g| g.key.as_str()));
    Bars {
        title: "Average hours by gender",
        category_label: "Gender",
        value_label: "Average hours/month",
        horizontal: false,
        bars: groups
            .into_iter()
            .map(|g| Bar {
                color: colors.color_for(&g.key),
                label: g.key,
                value: g.mean,
            })
            .collect(),
    }
}

/// Mean performance per gender × marital status.
pub fn performance_heatmap(view: &FilteredView<'_>, scheme: &ColorScheme) -> Heatmap {
    let cross = aggregate::group_mean2(
        view.iter(),
        Category::Gender,
        Category::MaritalStatus,
        Numeric::PerformanceScore,
    );

    let mut x_keys: Vec<String> = cross.iter().map(|c| c.row.clone()).collect();
    x_keys.dedup();
    let mut y_keys: Vec<String> = cross.iter().map(|c| c.col.clone()).collect();
    y_keys.sort();
    y_keys.dedup();

    let (lo, hi) = cross.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), c| {
        (lo.min(c.mean), hi.max(c.mean))
    });
    let cells = cross
        .iter()
        .filter_map(|c| {
            let x = x_keys.iter().position(|k| *k == c.row)?;
            let y = y_keys.iter().position(|k| *k == c.col)?;
            let t = if hi > lo { (c.mean - lo) / (hi - lo) } else { 0.5 };
            Some(HeatCell {
                x,
                y,
                value: c.mean,
                color: scheme.heat(t),
            })
        })
        .collect();

    Heatmap {
        title: "Average performance by gender and marital status",
        x_label: "Gender",
        y_label: "Marital status",
        x_keys,
        y_keys,
        cells,
    }
}

/// Scatter of two numeric columns with a least-squares overlay.
fn scatter_with_trend(
    view: &FilteredView<'_>,
    x: Numeric,
    y: Numeric,
    labels: (&'static str, &'static str, &'static str),
    scheme: &ColorScheme,
) -> Scatter {
    let (title, x_label, y_label) = labels;
    let points: Vec<ScatterPoint> = view
        .iter()
        .filter_map(|r| {
            Some(ScatterPoint {
                x: r.numeric(x)?,
                y: r.numeric(y)?,
                label: hover_label(r),
            })
        })
        .collect();
    let pairs: Vec<(f64, f64)> = points.iter().map(|p| (p.x, p.y)).collect();
    Scatter {
        title,
        x_label,
        y_label,
        trend: aggregate::trend_segment(&pairs),
        points,
        color: scheme.series(),
        trend_color: scheme.trend(),
    }
}

fn hover_label(r: &Employee) -> String {
    match (r.name.as_deref(), r.position.as_deref()) {
        (Some(name), Some(position)) => format!("{name} ({position})"),
        (Some(name), None) => name.to_string(),
        (None, Some(position)) => position.to_string(),
        (None, None) => String::new(),
    }
}

pub fn age_vs_salary(view: &FilteredView<'_>, scheme: &ColorScheme) -> Scatter {
    scatter_with_trend(
        view,
        Numeric::Age,
        Numeric::Salary,
        ("Age vs salary", "Age", "Salary"),
        scheme,
    )
}

pub fn hours_vs_performance(view: &FilteredView<'_>, scheme: &ColorScheme) -> Scatter {
    scatter_with_trend(
        view,
        Numeric::AverageWorkHours,
        Numeric::PerformanceScore,
        ("Hours vs performance", "Average hours/month", "Performance score"),
        scheme,
    )
}

/// Highest mean salaries by position, largest first.
pub fn salary_by_position(view: &FilteredView<'_>, top: usize, scheme: &ColorScheme) -> Bars {
    let groups = aggregate::top_group_means(view.iter(), Category::Position, Numeric::Salary, top);
    Bars {
        title: "Average salary by position",
        category_label: "Position",
        value_label: "Average salary",
        horizontal: true,
        bars: groups
            .into_iter()
            .map(|g| Bar {
                label: g.key,
                value: g.mean,
                color: scheme.series(),
            })
            .collect(),
    }
}

/// One point per position: mean satisfaction against mean performance.
/// No trend line; the points are already averages.
pub fn satisfaction_vs_performance(view: &FilteredView<'_>, scheme: &ColorScheme) -> Scatter {
    let pairs = aggregate::paired_group_mean(
        view.iter(),
        Category::Position,
        Numeric::SatisfactionLevel,
        Numeric::PerformanceScore,
    );
    Scatter {
        title: "Satisfaction vs performance by position",
        x_label: "Average satisfaction",
        y_label: "Average performance",
        points: pairs
            .into_iter()
            .map(|p| ScatterPoint {
                label: format!("{}: {:.2} / {:.2}", p.key, p.x, p.y),
                x: p.x,
                y: p.y,
            })
            .collect(),
        color: scheme.series(),
        trend: None,
        trend_color: scheme.trend(),
    }
}

// ---------------------------------------------------------------------------
// Dashboard layout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: &'static str,
    pub charts: Vec<Chart>,
}

/// Every chart of the dashboard, grouped into its sections.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub sections: Vec<Section>,
}

impl Dashboard {
    pub fn build(view: &FilteredView<'_>, config: &DashboardConfig) -> Self {
        let scheme = ColorScheme::new(config.variant);
        let sections = vec![
            Section {
                title: "Overview",
                charts: vec![
                    Chart::Histogram(performance_histogram(view, config.histogram_step, &scheme)),
                    Chart::Donut(marital_donut(view)),
                ],
            },
            Section {
                title: "Performance",
                charts: vec![
                    Chart::Bars(hours_by_gender(view, &scheme)),
                    Chart::Heatmap(performance_heatmap(view, &scheme)),
                ],
            },
            Section {
                title: "Workforce",
                charts: vec![
                    Chart::Scatter(age_vs_salary(view, &scheme)),
                    Chart::Bars(salary_by_position(view, config.top_positions, &scheme)),
                ],
            },
            Section {
                title: "Correlations",
                charts: vec![
                    Chart::Scatter(hours_vs_performance(view, &scheme)),
                    Chart::Scatter(satisfaction_vs_performance(view, &scheme)),
                ],
            },
        ];
        Dashboard { sections }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{self, PRIMARY};
    use crate::config::Variant;
    use crate::data::fixtures::sample_table;

    #[test]
    fn dashboard_has_every_section() {
        let table = sample_table();
        let view = FilteredView::all(&table);
        let dashboard = Dashboard::build(&view, &DashboardConfig::default());
        let titles: Vec<&str> = dashboard.sections.iter().map(|s| s.title).collect();
        assert_eq!(titles, vec!["Overview", "Performance", "Workforce", "Correlations"]);
        assert!(dashboard
            .sections
            .iter()
            .flat_map(|s| &s.charts)
            .all(|c| !c.is_empty()));
    }

    #[test]
    fn empty_view_builds_empty_charts() {
        let table = sample_table();
        let view = FilteredView::from_indices(&table, Vec::new());
        let dashboard = Dashboard::build(&view, &DashboardConfig::default());
        for chart in dashboard.sections.iter().flat_map(|s| &s.charts) {
            assert!(chart.is_empty(), "{} should be empty", chart.title());
        }
        let scatter = age_vs_salary(&view, &ColorScheme::new(Variant::Executive));
        assert_eq!(scatter.trend, None);
    }

    #[test]
    fn scatter_has_trend_only_with_enough_points() {
        let table = sample_table();
        let scheme = ColorScheme::new(Variant::Executive);
        let all = FilteredView::all(&table);
        let scatter = age_vs_salary(&all, &scheme);
        assert!(scatter.trend.is_some());
        // Luis has no salary and Jorge no age.
        assert_eq!(scatter.points.len(), 4);

        let single = FilteredView::from_indices(&table, vec![0]);
        let scatter = age_vs_salary(&single, &scheme);
        assert_eq!(scatter.points.len(), 1);
        assert_eq!(scatter.points[0].label, "Ana Ruiz (Analyst)");
        assert_eq!(scatter.trend, None);
    }

    #[test]
    fn heatmap_indexes_observed_keys() {
        let table = sample_table();
        let heat = performance_heatmap(&FilteredView::all(&table), &ColorScheme::new(Variant::Executive));
        assert_eq!(heat.x_keys, vec!["F", "M"]);
        assert_eq!(heat.y_keys, vec!["Divorced", "Married", "Single"]);
        assert_eq!(heat.cells.len(), 5);
        // Marta's 5.0 is the hottest cell, Pedro's 2.0 the coolest.
        let hottest = heat.cells.iter().find(|c| c.value == 5.0).unwrap();
        assert_eq!((hottest.x, hottest.y), (0, 2));
        assert_eq!(hottest.color, ColorScheme::new(Variant::Executive).heat(1.0));
    }

    #[test]
    fn salary_bars_are_horizontal_and_ranked() {
        let table = sample_table();
        let bars = salary_by_position(&FilteredView::all(&table), 10, &ColorScheme::new(Variant::Executive));
        assert!(bars.horizontal);
        let labels: Vec<&str> = bars.bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Manager", "Engineer", "Analyst"]);
        assert!(bars.bars.iter().all(|b| b.color == PRIMARY));
    }

    #[test]
    fn classic_variant_colours_bins_and_genders() {
        let table = sample_table();
        let view = FilteredView::all(&table);
        let classic = ColorScheme::new(Variant::Classic);

        let hist = performance_histogram(&view, 1.0, &classic);
        assert_eq!(hist.bars.first().map(|b| b.color), Some(color::ALERT));
        assert_eq!(hist.bars.last().map(|b| b.color), Some(color::OK));

        let bars = hours_by_gender(&view, &classic);
        assert_ne!(bars.bars[0].color, bars.bars[1].color);
        assert_ne!(bars.bars[0].color, PRIMARY);
    }
}

use std::f64::consts::{FRAC_PI_2, TAU};
use std::hash::Hash;

use eframe::egui::{self, Color32, RichText, Stroke, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Polygon, Text};

use hr_dashboard::chart::{Bars, Chart, Donut, Heatmap, Histogram, Scatter};
use hr_dashboard::color::Rgb;

const CHART_HEIGHT: f32 = 320.0;
const DONUT_INNER: f64 = 0.55;

pub fn to_color32(c: Rgb) -> Color32 {
    Color32::from_rgb(c.red, c.green, c.blue)
}

// ---------------------------------------------------------------------------
// Chart dispatch
// ---------------------------------------------------------------------------

/// Render one chart specification. `id` must be unique within the frame.
pub fn chart(ui: &mut Ui, chart: &Chart, id: impl Hash) {
    ui.strong(chart.title());
    if chart.is_empty() {
        ui.allocate_ui(egui::vec2(ui.available_width(), CHART_HEIGHT), |ui: &mut Ui| {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.label(RichText::new("No data for the current filters.").weak());
            });
        });
        return;
    }
    match chart {
        Chart::Histogram(h) => histogram(ui, h, id),
        Chart::Bars(b) => bars(ui, b, id),
        Chart::Scatter(s) => scatter(ui, s, id),
        Chart::Heatmap(h) => heatmap(ui, h, id),
        Chart::Donut(d) => donut(ui, d, id),
    }
}

fn histogram(ui: &mut Ui, h: &Histogram, id: impl Hash) {
    let bars: Vec<Bar> = h
        .bars
        .iter()
        .map(|b| {
            let width = b.bin.end - b.bin.start;
            Bar::new(b.bin.start + width / 2.0, b.bin.count as f64)
                .width(width * 0.95)
                .fill(to_color32(b.color))
                .name(format!("{} – {}", b.bin.start, b.bin.end))
        })
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .x_axis_label(h.x_label)
        .y_axis_label(h.y_label)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(h.title));
        });
}

fn bars(ui: &mut Ui, b: &Bars, id: impl Hash) {
    let (x_label, y_label) = if b.horizontal {
        (b.value_label, b.category_label)
    } else {
        (b.category_label, b.value_label)
    };

    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, bar) in b.bars.iter().enumerate() {
                let color = to_color32(bar.color);
                // Horizontal bars list the first entry on top.
                let position = if b.horizontal { -(i as f64) } else { i as f64 };
                let item = Bar::new(position, bar.value)
                    .width(0.7)
                    .name(&bar.label)
                    .fill(color);
                let mut series = BarChart::new(vec![item]).name(&bar.label).color(color);
                if b.horizontal {
                    series = series.horizontal();
                }
                plot_ui.bar_chart(series);
            }
        });
}

fn scatter(ui: &mut Ui, s: &Scatter, id: impl Hash) {
    let points: PlotPoints = s.points.iter().map(|p| [p.x, p.y]).collect();
    let hover: Vec<(f64, f64, String)> = s
        .points
        .iter()
        .map(|p| (p.x, p.y, p.label.clone()))
        .collect();
    let (x_label, y_label) = (s.x_label, s.y_label);

    Plot::new(id)
        .height(CHART_HEIGHT)
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .allow_scroll(false)
        .label_formatter(move |_name, value| {
            match hover.iter().find(|(x, y, _)| *x == value.x && *y == value.y) {
                Some((_, _, label)) => {
                    format!("{label}\n{x_label}: {:.2}\n{y_label}: {:.2}", value.x, value.y)
                }
                None => format!("{x_label}: {:.2}\n{y_label}: {:.2}", value.x, value.y),
            }
        })
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(points)
                    .radius(3.5)
                    .color(to_color32(s.color))
                    .name(s.title),
            );
            if let Some([from, to]) = s.trend {
                plot_ui.line(
                    Line::new(PlotPoints::from(vec![from, to]))
                        .color(to_color32(s.trend_color))
                        .width(3.0)
                        .name("Trend"),
                );
            }
        });
}

fn heatmap(ui: &mut Ui, h: &Heatmap, id: impl Hash) {
    Plot::new(id)
        .height(CHART_HEIGHT)
        .x_axis_label(h.x_label)
        .y_axis_label(h.y_label)
        .show_grid(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for cell in &h.cells {
                let (x, y) = (cell.x as f64, cell.y as f64);
                let color = to_color32(cell.color);
                let rect = vec![
                    [x - 0.5, y - 0.5],
                    [x + 0.5, y - 0.5],
                    [x + 0.5, y + 0.5],
                    [x - 0.5, y + 0.5],
                ];
                plot_ui.polygon(
                    Polygon::new(PlotPoints::from(rect))
                        .fill_color(color)
                        .stroke(Stroke::new(1.0, Color32::WHITE)),
                );
                let caption = format!(
                    "{} · {}\n{:.2}",
                    h.x_keys[cell.x], h.y_keys[cell.y], cell.value
                );
                plot_ui.text(Text::new(PlotPoint::new(x, y), caption).color(Color32::BLACK));
            }
        });
}

fn donut(ui: &mut Ui, d: &Donut, id: impl Hash) {
    let total: f64 = d.slices.iter().map(|s| s.count as f64).sum();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            // Clockwise from twelve o'clock; each slice is split into small
            // convex quads so it fills correctly.
            let mut start = FRAC_PI_2;
            for slice in &d.slices {
                let sweep = slice.count as f64 / total * TAU;
                let steps = ((sweep / 0.05).ceil() as usize).max(1);
                let color = to_color32(slice.color);
                let name = format!("{} ({}, {:.1}%)", slice.label, slice.count, slice.pct);
                for k in 0..steps {
                    let a0 = start - sweep * k as f64 / steps as f64;
                    let a1 = start - sweep * (k + 1) as f64 / steps as f64;
                    let quad = vec![
                        [a0.cos(), a0.sin()],
                        [a1.cos(), a1.sin()],
                        [DONUT_INNER * a1.cos(), DONUT_INNER * a1.sin()],
                        [DONUT_INNER * a0.cos(), DONUT_INNER * a0.sin()],
                    ];
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(quad))
                            .fill_color(color)
                            .stroke(Stroke::new(0.5, color))
                            .name(&name),
                    );
                }
                start -= sweep;
            }
        });
}

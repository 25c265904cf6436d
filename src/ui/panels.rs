use std::ops::RangeInclusive;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use hr_dashboard::chart::Section;
use hr_dashboard::color;
use hr_dashboard::data::{Choice, Employee, FilteredView, Range};
use hr_dashboard::insight::{Insight, Verdict};
use hr_dashboard::summary::{dollars, Summary};

use crate::state::{AppState, Tab};
use crate::ui::plot::{self, to_color32};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    // Clone what we need so we can mutate state inside the closure.
    let options = state.options.clone();
    let salary_filter = state.config.variant.salary_filter();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Gender");
            choice_combo(ui, "gender_filter", &mut state.filters.gender, &options.genders);
            ui.add_space(6.0);

            ui.strong("Marital status");
            choice_combo(
                ui,
                "marital_filter",
                &mut state.filters.marital_status,
                &options.marital_statuses,
            );
            ui.separator();

            if let (Some(bounds), Some(range)) =
                (options.performance, state.filters.performance.as_mut())
            {
                ui.strong("Performance score");
                range_sliders(ui, range, bounds, true);
                ui.add_space(6.0);
            }

            if salary_filter {
                if let (Some(bounds), Some(range)) = (options.salary, state.filters.salary.as_mut()) {
                    ui.strong("Salary");
                    range_sliders(ui, range, bounds, false);
                }
            }
            ui.separator();

            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }
        });

    // Recompute the view after any widget changes.
    state.refilter();
}

fn choice_combo(ui: &mut Ui, id: &str, choice: &mut Choice, values: &[String]) {
    let selected = match choice {
        Choice::All => "All".to_string(),
        Choice::Only(value) => value.clone(),
    };
    egui::ComboBox::from_id_salt(id)
        .selected_text(selected)
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(choice, Choice::All, "All");
            for value in values {
                ui.selectable_value(choice, Choice::Only(value.clone()), value.as_str());
            }
        });
}

/// Two sliders over `bounds`; moving one past the other drags it along.
/// Fractional values are stored as dragged and only the label is rounded.
fn range_sliders(ui: &mut Ui, range: &mut Range, bounds: Range, integer: bool) {
    let mut min = egui::Slider::new(&mut range.min, bounds.min..=bounds.max).text("min");
    min = if integer {
        min.step_by(1.0).integer()
    } else {
        min.custom_formatter(whole_units)
    };
    if ui.add(min).changed() {
        keep_ordered(range, true);
    }

    let mut max = egui::Slider::new(&mut range.max, bounds.min..=bounds.max).text("max");
    max = if integer {
        max.step_by(1.0).integer()
    } else {
        max.custom_formatter(whole_units)
    };
    if ui.add(max).changed() {
        keep_ordered(range, false);
    }
}

fn whole_units(value: f64, _decimals: RangeInclusive<usize>) -> String {
    format!("{value:.0}")
}

/// Restore `min <= max` by moving the handle that was not dragged.
fn keep_ordered(range: &mut Range, moved_min: bool) {
    if range.min > range.max {
        if moved_min {
            range.max = range.min;
        } else {
            range.min = range.max;
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.source.is_some(), egui::Button::new("Reload"))
                .clicked()
            {
                state.reload();
                ui.close_menu();
            }
            if ui
                .add_enabled(state.dataset.is_some(), egui::Button::new("Export filtered CSV…"))
                .clicked()
            {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} employees loaded, {} visible",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::GRAY
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// Central panel – KPIs, charts, details
// ---------------------------------------------------------------------------

pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    let AppState {
        config,
        dataset,
        visible_indices,
        derived,
        tab,
        ..
    } = state;

    let (Some(derived), Some(table)) = (derived.as_ref(), dataset.as_deref()) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a data file to start (File → Open…)");
        });
        return;
    };

    kpi_row(ui, &derived.summary);
    ui.separator();

    let sections = &derived.dashboard.sections;
    let last = sections.len().saturating_sub(1);

    if config.variant.tabbed() {
        ui.horizontal(|ui: &mut Ui| {
            for (i, section) in sections.iter().enumerate() {
                ui.selectable_value(tab, Tab::Section(i), section.title);
            }
            ui.selectable_value(tab, Tab::Details, "Details");
        });
        ui.separator();
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            if config.variant.tabbed() {
                match *tab {
                    Tab::Section(i) => {
                        if let Some(section) = sections.get(i) {
                            section_view(ui, section, i);
                            if i == last {
                                insights_view(ui, &derived.insights);
                            }
                        }
                    }
                    Tab::Details => {
                        let view = FilteredView::from_indices(table, visible_indices.clone());
                        details_table(ui, &view);
                    }
                }
            } else {
                for (i, section) in sections.iter().enumerate() {
                    ui.heading(section.title);
                    section_view(ui, section, i);
                    ui.add_space(12.0);
                }
                insights_view(ui, &derived.insights);
                ui.add_space(12.0);
                ui.heading("Details");
                let view = FilteredView::from_indices(table, visible_indices.clone());
                details_table(ui, &view);
            }
        });
}

fn kpi_row(ui: &mut Ui, summary: &Summary) {
    let kpis = summary.kpis();
    ui.columns(kpis.len(), |columns: &mut [Ui]| {
        for (column, kpi) in columns.iter_mut().zip(kpis.iter()) {
            column.group(|ui: &mut Ui| {
                ui.label(RichText::new(kpi.title.to_uppercase()).small().weak());
                ui.label(
                    RichText::new(&kpi.value)
                        .size(24.0)
                        .strong()
                        .color(to_color32(color::PRIMARY)),
                );
            });
        }
    });
}

/// Charts of one section, side by side.
fn section_view(ui: &mut Ui, section: &Section, index: usize) {
    let n = section.charts.len().max(1);
    ui.columns(n, |columns: &mut [Ui]| {
        for (slot, (column, chart)) in columns.iter_mut().zip(&section.charts).enumerate() {
            plot::chart(column, chart, ("chart", index, slot));
        }
    });
}

fn insights_view(ui: &mut Ui, insights: &[Insight]) {
    if insights.is_empty() {
        return;
    }
    ui.separator();
    ui.strong("Automatic conclusions (draft)");
    for insight in insights {
        let (icon, c) = match insight.verdict {
            Verdict::Healthy => ("✔", color::OK),
            Verdict::Attention => ("⚠", color::WARN),
        };
        ui.label(RichText::new(format!("{icon} {insight}")).color(to_color32(c)));
    }
}

const DETAIL_HEADERS: [&str; 10] = [
    "Name",
    "Gender",
    "Marital status",
    "Position",
    "Age",
    "Salary",
    "Performance",
    "Hours/month",
    "Satisfaction",
    "Absences",
];

fn details_table(ui: &mut Ui, view: &FilteredView<'_>) {
    let rows = view.sorted_for_details();
    if rows.is_empty() {
        ui.label(RichText::new("No records match the current filters.").weak());
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .vscroll(false)
        .column(TableColumn::auto().at_least(140.0))
        .columns(TableColumn::auto().at_least(60.0), DETAIL_HEADERS.len() - 1)
        .header(22.0, |mut header| {
            for title in DETAIL_HEADERS {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(20.0, rows.len(), |mut row| {
                let cells = detail_cells(rows[row.index()]);
                for cell in cells {
                    row.col(|ui: &mut Ui| {
                        ui.label(cell);
                    });
                }
            });
        });
}

fn detail_cells(r: &Employee) -> [String; 10] {
    let text = |v: &Option<String>| v.clone().unwrap_or_default();
    let number = |v: Option<f64>, decimals: usize| {
        v.map(|v| format!("{v:.decimals$}")).unwrap_or_default()
    };
    [
        text(&r.name),
        text(&r.gender),
        text(&r.marital_status),
        text(&r.position),
        number(r.age, 0),
        r.salary.map(dollars).unwrap_or_default(),
        number(r.performance_score, 0),
        number(r.average_work_hours, 1),
        number(r.satisfaction_level, 2),
        number(r.absences, 0),
    ]
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open employee data")
        .add_filter("Supported files", &["csv", "txt", "parquet", "pq"])
        .add_filter("CSV", &["csv", "txt"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load(&path);
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered employees")
        .add_filter("CSV", &["csv"])
        .set_file_name("employee_filtered.csv")
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.export_to(&path) {
            log::error!("Export failed: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

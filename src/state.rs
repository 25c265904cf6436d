use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use hr_dashboard::chart::Dashboard;
use hr_dashboard::data::aggregate;
use hr_dashboard::data::export;
use hr_dashboard::data::filter::filtered_indices;
use hr_dashboard::data::{DataError, DatasetCache, EmployeeTable, FilterOptions, FilterSpec, FilteredView, Numeric};
use hr_dashboard::insight::{self, Insight};
use hr_dashboard::summary::Summary;
use hr_dashboard::DashboardConfig;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    /// Index into the dashboard's sections.
    Section(usize),
    Details,
}

/// Everything derived from the current filtered view.
pub struct Derived {
    pub summary: Summary,
    pub insights: Vec<Insight>,
    pub dashboard: Dashboard,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Memoized datasets for this session.
    cache: DatasetCache,

    /// Loaded dataset (None until a file loads).
    pub dataset: Option<Arc<EmployeeTable>>,

    /// Path the dataset was loaded from.
    pub source: Option<PathBuf>,

    /// Sidebar choices for the loaded dataset.
    pub options: FilterOptions,

    /// Current filter selections, edited by the sidebar.
    pub filters: FilterSpec,

    /// Filters `visible_indices` was computed for.
    applied: FilterSpec,

    /// Indices of records passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Median monthly hours of the unfiltered dataset.
    pub baseline_hours: Option<f64>,

    pub derived: Option<Derived>,

    pub tab: Tab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Set when the dataset fails validation; nothing else is rendered.
    pub fatal_error: Option<String>,
}

impl AppState {
    /// Build the state and load the configured dataset.
    pub fn new(config: DashboardConfig) -> Self {
        let data_path = config.data_path.clone();
        let mut state = Self {
            config,
            cache: DatasetCache::new(),
            dataset: None,
            source: None,
            options: FilterOptions::default(),
            filters: FilterSpec::default(),
            applied: FilterSpec::default(),
            visible_indices: Vec::new(),
            baseline_hours: None,
            derived: None,
            tab: Tab::Section(0),
            status_message: None,
            fatal_error: None,
        };
        state.load(&data_path);
        state
    }

    /// Load (or fetch from cache) the dataset at `path`.
    pub fn load(&mut self, path: &Path) {
        match self.cache.load(path) {
            Ok(table) => {
                log::info!(
                    "Dataset {} ready: {} records",
                    path.display(),
                    table.len()
                );
                self.set_dataset(table, path);
            }
            Err(e @ DataError::MissingColumns(_)) => {
                log::error!("Rejected dataset {}: {e}", path.display());
                self.dataset = None;
                self.derived = None;
                self.source = Some(path.to_path_buf());
                self.fatal_error = Some(format!("{}: {e}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Re-read the current source if it changed on disk.
    pub fn reload(&mut self) {
        if let Some(path) = self.source.clone() {
            self.load(&path);
        }
    }

    /// Ingest a loaded dataset and reset filters to its full ranges.
    pub fn set_dataset(&mut self, table: Arc<EmployeeTable>, path: &Path) {
        // A cache hit hands back the same table; keep the user's filters.
        let unchanged = self
            .dataset
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, &table));

        if !unchanged {
            self.options = FilterOptions::from_table(&table);
            self.filters = self.options.default_spec(self.config.variant.salary_filter());
            self.baseline_hours = aggregate::median(&table.records, Numeric::AverageWorkHours);
            self.dataset = Some(table);
            self.recompute();
        }

        self.source = Some(path.to_path_buf());
        self.status_message = None;
        self.fatal_error = None;
    }

    /// Recompute the view after a filter change. No-op when nothing changed.
    pub fn refilter(&mut self) {
        if self.filters != self.applied {
            self.recompute();
        }
    }

    fn recompute(&mut self) {
        let Some(table) = self.dataset.clone() else {
            return;
        };
        self.visible_indices = filtered_indices(&table, &self.filters);
        self.applied = self.filters.clone();
        log::debug!(
            "Filters {:?} keep {} of {} records",
            self.filters,
            self.visible_indices.len(),
            table.len()
        );

        let view = FilteredView::from_indices(&table, self.visible_indices.clone());
        self.derived = Some(Derived {
            summary: Summary::compute(view.iter()),
            insights: insight::insights(view.iter(), self.baseline_hours, &self.config),
            dashboard: Dashboard::build(&view, &self.config),
        });
    }

    /// Restore every filter to its default.
    pub fn reset_filters(&mut self) {
        self.filters = self.options.default_spec(self.config.variant.salary_filter());
        self.refilter();
    }

    /// The records passing the current filters.
    pub fn view(&self) -> Option<FilteredView<'_>> {
        self.dataset
            .as_deref()
            .map(|table| FilteredView::from_indices(table, self.visible_indices.clone()))
    }

    /// Save the current view as CSV.
    pub fn export_to(&mut self, path: &Path) -> Result<()> {
        let exported = {
            let view = self.view().context("no dataset loaded")?;
            export::save_csv(path, &view)
                .with_context(|| format!("exporting to {}", path.display()))?;
            view.len()
        };
        self.status_message = Some(format!("Exported {exported} records to {}", path.display()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use hr_dashboard::data::{Choice, Range};

    use super::*;

    const CSV: &str = "\
name_employee,birth_date,age,gender,marital_status,hiring_date,position,salary,performance_score,last_performance_date,average_work_hours,satisfaction_level,absences
Ana,15/03/1990,34,F,Married,01/06/2015,Analyst,52000,4,10/01/2024,160,4.2,0
Luis,22/07/1985,39,M,Single,01/01/2016,Manager,70000,3,12/01/2024,175,3.1,2
Marta,05/11/1978,46,F,Single,14/02/2010,Manager,78000,5,15/01/2024,182,4.8,1
";

    fn data_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn state_for(path: &Path) -> AppState {
        AppState::new(DashboardConfig {
            data_path: path.to_path_buf(),
            ..Default::default()
        })
    }

    #[test]
    fn loads_configured_dataset_with_full_ranges() {
        let file = data_file(CSV);
        let state = state_for(file.path());
        assert!(state.fatal_error.is_none());
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
        assert_eq!(state.filters.salary, Some(Range::new(52000.0, 78000.0)));
        assert_eq!(state.filters.performance, Some(Range::new(3.0, 5.0)));
        assert_eq!(state.baseline_hours, Some(175.0));
        assert_eq!(state.derived.as_ref().map(|d| d.summary.headcount), Some(3));
    }

    #[test]
    fn filter_change_recomputes_view() {
        let file = data_file(CSV);
        let mut state = state_for(file.path());
        state.filters.gender = Choice::Only("F".into());
        state.refilter();
        assert_eq!(state.visible_indices, vec![0, 2]);
        assert_eq!(state.view().map(|v| v.len()), Some(2));

        state.reset_filters();
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
    }

    #[test]
    fn reload_of_unchanged_file_keeps_filters() {
        let file = data_file(CSV);
        let mut state = state_for(file.path());
        state.filters.marital_status = Choice::Only("Single".into());
        state.refilter();
        state.reload();
        assert_eq!(state.filters.marital_status, Choice::Only("Single".into()));
        assert_eq!(state.visible_indices, vec![1, 2]);
    }

    #[test]
    fn missing_columns_are_fatal() {
        let file = data_file("name_employee,age\nAna,30\n");
        let state = state_for(file.path());
        assert!(state.dataset.is_none());
        assert!(state.derived.is_none());
        let message = state.fatal_error.expect("fatal error");
        assert!(message.contains("birth_date"));
        assert!(message.contains("absences"));
    }

    #[test]
    fn unreadable_file_is_a_status_message() {
        let state = state_for(Path::new("/nonexistent/employees.csv"));
        assert!(state.dataset.is_none());
        assert!(state.fatal_error.is_none());
        assert!(state.status_message.is_some());
    }

    #[test]
    fn export_writes_current_view() {
        let file = data_file(CSV);
        let mut state = state_for(file.path());
        state.filters.gender = Choice::Only("M".into());
        state.refilter();

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("employee_filtered.csv");
        state.export_to(&out).unwrap();

        let exported = hr_dashboard::data::load_file(&out).unwrap();
        assert_eq!(exported.len(), 1);
        assert_eq!(exported.records[0].name.as_deref(), Some("Luis"));
    }
}

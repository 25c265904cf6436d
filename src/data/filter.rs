use std::cmp::Ordering;

use super::model::{Category, Employee, EmployeeTable, Numeric};

// ---------------------------------------------------------------------------
// Filter predicates
// ---------------------------------------------------------------------------

/// Selection for a categorical filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Choice {
    /// No constraint.
    #[default]
    All,
    /// Exact match on the given value.
    Only(String),
}

/// Inclusive numeric range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    /// Build a range, swapping the bounds if given in reverse.
    pub fn new(a: f64, b: f64) -> Self {
        Range {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// A missing value is never inside a range.
    pub fn contains(&self, value: Option<f64>) -> bool {
        value.is_some_and(|v| self.min <= v && v <= self.max)
    }
}

/// A single row test. A filter specification is the conjunction of its
/// predicates, so the order they are applied in does not matter.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Equals(Category, String),
    Within(Numeric, Range),
}

impl Predicate {
    pub fn matches(&self, record: &Employee) -> bool {
        match self {
            Predicate::Equals(col, wanted) => record.category(*col) == Some(wanted.as_str()),
            Predicate::Within(col, range) => range.contains(record.numeric(*col)),
        }
    }
}

// ---------------------------------------------------------------------------
// Filter specification: the sidebar state
// ---------------------------------------------------------------------------

/// User-selected filters. `None` ranges are inactive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    pub gender: Choice,
    pub marital_status: Choice,
    pub performance: Option<Range>,
    pub salary: Option<Range>,
}

impl FilterSpec {
    /// The active predicates; `Choice::All` and `None` ranges contribute none.
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::new();
        for (col, choice) in [
            (Category::Gender, &self.gender),
            (Category::MaritalStatus, &self.marital_status),
        ] {
            if let Choice::Only(value) = choice {
                predicates.push(Predicate::Equals(col, value.clone()));
            }
        }
        for (col, range) in [
            (Numeric::PerformanceScore, self.performance),
            (Numeric::Salary, self.salary),
        ] {
            if let Some(range) = range {
                predicates.push(Predicate::Within(col, range));
            }
        }
        predicates
    }
}

/// What the sidebar offers for a loaded dataset. Computed once from the
/// unfiltered table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub genders: Vec<String>,
    pub marital_statuses: Vec<String>,
    /// Integer-stepped: `floor(min)..=ceil(max)` of the observed scores.
    pub performance: Option<Range>,
    pub salary: Option<Range>,
}

impl FilterOptions {
    pub fn from_table(table: &EmployeeTable) -> Self {
        FilterOptions {
            genders: table.distinct(Category::Gender).into_iter().collect(),
            marital_statuses: table.distinct(Category::MaritalStatus).into_iter().collect(),
            performance: table
                .bounds(Numeric::PerformanceScore)
                .map(|(lo, hi)| Range::new(lo.floor(), hi.ceil())),
            salary: table
                .bounds(Numeric::Salary)
                .map(|(lo, hi)| Range::new(lo, hi)),
        }
    }

    /// Initial filters: everything selected, ranges spanning the observed
    /// bounds. The salary range is only active when `salary_filter` is set.
    pub fn default_spec(&self, salary_filter: bool) -> FilterSpec {
        FilterSpec {
            gender: Choice::All,
            marital_status: Choice::All,
            performance: self.performance,
            salary: if salary_filter { self.salary } else { None },
        }
    }
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// Return indices of records that pass every active filter, in table order.
pub fn filtered_indices(table: &EmployeeTable, spec: &FilterSpec) -> Vec<usize> {
    let predicates = spec.predicates();
    table
        .records
        .iter()
        .enumerate()
        .filter(|(_, record)| predicates.iter().all(|p| p.matches(record)))
        .map(|(i, _)| i)
        .collect()
}

/// A read-only subset of a table, stored as row indices.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    table: &'a EmployeeTable,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// Every row of the table.
    pub fn all(table: &'a EmployeeTable) -> Self {
        FilteredView {
            table,
            indices: (0..table.len()).collect(),
        }
    }

    pub fn new(table: &'a EmployeeTable, spec: &FilterSpec) -> Self {
        FilteredView {
            table,
            indices: filtered_indices(table, spec),
        }
    }

    /// Wrap precomputed indices, e.g. the cached result of a previous filter.
    pub fn from_indices(table: &'a EmployeeTable, indices: Vec<usize>) -> Self {
        FilteredView { table, indices }
    }

    /// Narrow this view by one more predicate.
    pub fn refine(&self, predicate: &Predicate) -> FilteredView<'a> {
        let indices = self
            .indices
            .iter()
            .copied()
            .filter(|&i| predicate.matches(&self.table.records[i]))
            .collect();
        FilteredView {
            table: self.table,
            indices,
        }
    }

    pub fn table(&self) -> &'a EmployeeTable {
        self.table
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Employee> + Clone + '_ {
        let table = self.table;
        self.indices.iter().map(move |&i| &table.records[i])
    }

    /// Records ordered for the details listing: performance descending, then
    /// salary descending, missing values last.
    pub fn sorted_for_details(&self) -> Vec<&'a Employee> {
        let mut rows: Vec<&Employee> = self.iter().collect();
        rows.sort_by(|a, b| {
            descending_missing_last(a.performance_score, b.performance_score)
                .then_with(|| descending_missing_last(a.salary, b.salary))
        });
        rows
    }
}

fn descending_missing_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::sample_table;

    fn names<'a>(rows: impl Iterator<Item = &'a Employee>) -> Vec<&'a str> {
        rows.map(|r| r.name.as_deref().unwrap_or("?")).collect()
    }

    #[test]
    fn default_spec_keeps_every_row_with_data() {
        let table = sample_table();
        let options = FilterOptions::from_table(&table);
        assert_eq!(options.genders, vec!["F", "M"]);
        assert_eq!(options.marital_statuses, vec!["Divorced", "Married", "Single"]);
        assert_eq!(options.performance, Some(Range::new(2.0, 5.0)));
        assert_eq!(options.salary, Some(Range::new(41000.0, 78000.0)));

        // Jorge (no score) drops out of an active performance range; Luis
        // (no salary) only survives while the salary filter is off.
        let spec = options.default_spec(false);
        assert_eq!(filtered_indices(&table, &spec), vec![0, 1, 2, 3, 4]);
        let spec = options.default_spec(true);
        assert_eq!(filtered_indices(&table, &spec), vec![0, 2, 3, 4]);
    }

    #[test]
    fn unrestricted_spec_keeps_everything() {
        let table = sample_table();
        let view = FilteredView::new(&table, &FilterSpec::default());
        assert_eq!(view.len(), table.len());
    }

    #[test]
    fn composition_is_commutative() {
        let table = sample_table();
        let gender = Predicate::Equals(Category::Gender, "F".into());
        let perf = Predicate::Within(Numeric::PerformanceScore, Range::new(3.0, 5.0));

        let all = FilteredView::all(&table);
        let a = all.refine(&gender).refine(&perf);
        let b = all.refine(&perf).refine(&gender);
        assert_eq!(a.indices(), b.indices());

        let spec = FilterSpec {
            gender: Choice::Only("F".into()),
            performance: Some(Range::new(3.0, 5.0)),
            ..Default::default()
        };
        assert_eq!(filtered_indices(&table, &spec), a.indices());
        assert_eq!(names(a.iter()), vec!["Ana Ruiz", "Marta Díaz", "Sofía León"]);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let table = sample_table();
        let all = FilteredView::all(&table);

        let at_bound = all.refine(&Predicate::Within(
            Numeric::PerformanceScore,
            Range::new(2.0, 2.0),
        ));
        assert_eq!(names(at_bound.iter()), vec!["Pedro Sanz"]);

        let outside = all.refine(&Predicate::Within(
            Numeric::PerformanceScore,
            Range::new(3.0, 4.0),
        ));
        assert!(!names(outside.iter()).contains(&"Pedro Sanz"));
        assert!(!names(outside.iter()).contains(&"Marta Díaz"));
    }

    #[test]
    fn missing_salary_never_passes_a_salary_range() {
        let table = sample_table();
        for range in [
            Range::new(f64::MIN, f64::MAX),
            Range::new(0.0, 0.0),
            Range::new(41000.0, 78000.0),
        ] {
            let spec = FilterSpec {
                salary: Some(range),
                ..Default::default()
            };
            let view = FilteredView::new(&table, &spec);
            assert!(view.iter().all(|r| r.salary.is_some()));
            assert!(!names(view.iter()).contains(&"Luis Gómez"));
        }
    }

    #[test]
    fn trimmed_gender_matches_and_order_is_preserved() {
        let table = sample_table();
        let spec = FilterSpec {
            gender: Choice::Only("M".into()),
            ..Default::default()
        };
        let view = FilteredView::new(&table, &spec);
        assert_eq!(view.indices(), &[1, 3, 5]);
    }

    #[test]
    fn selected_category_never_matches_missing_value() {
        let unknown = Employee::default();
        assert!(!Predicate::Equals(Category::Gender, "F".into()).matches(&unknown));
        let spec = FilterSpec {
            gender: Choice::All,
            ..Default::default()
        };
        assert!(spec.predicates().is_empty());
    }

    #[test]
    fn reversed_range_bounds_are_normalised() {
        let range = Range::new(5.0, 1.0);
        assert_eq!((range.min, range.max), (1.0, 5.0));
        assert!(range.contains(Some(3.0)));
    }

    #[test]
    fn details_sort_by_performance_then_salary() {
        let table = sample_table();
        let view = FilteredView::all(&table);
        assert_eq!(
            names(view.sorted_for_details().into_iter()),
            vec![
                "Marta Díaz",
                "Ana Ruiz",
                "Luis Gómez",
                "Sofía León",
                "Pedro Sanz",
                "Jorge Vidal"
            ]
        );
    }
}

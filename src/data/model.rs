use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// Column – the fixed set of required dataset columns
// ---------------------------------------------------------------------------

/// A required column of the employee dataset, in canonical header order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Name,
    BirthDate,
    Age,
    Gender,
    MaritalStatus,
    HiringDate,
    Position,
    Salary,
    PerformanceScore,
    LastPerformanceDate,
    AverageWorkHours,
    SatisfactionLevel,
    Absences,
}

impl Column {
    /// All required columns, in the order they are reported when missing.
    pub const ALL: [Column; 13] = [
        Column::Name,
        Column::BirthDate,
        Column::Age,
        Column::Gender,
        Column::MaritalStatus,
        Column::HiringDate,
        Column::Position,
        Column::Salary,
        Column::PerformanceScore,
        Column::LastPerformanceDate,
        Column::AverageWorkHours,
        Column::SatisfactionLevel,
        Column::Absences,
    ];

    /// Header name as it appears in the CSV file.
    pub fn name(self) -> &'static str {
        match self {
            Column::Name => "name_employee",
            Column::BirthDate => "birth_date",
            Column::Age => "age",
            Column::Gender => "gender",
            Column::MaritalStatus => "marital_status",
            Column::HiringDate => "hiring_date",
            Column::Position => "position",
            Column::Salary => "salary",
            Column::PerformanceScore => "performance_score",
            Column::LastPerformanceDate => "last_performance_date",
            Column::AverageWorkHours => "average_work_hours",
            Column::SatisfactionLevel => "satisfaction_level",
            Column::Absences => "absences",
        }
    }

    pub fn from_header(header: &str) -> Option<Column> {
        Column::ALL.into_iter().find(|c| c.name() == header)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Numeric columns usable in aggregations and range filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Numeric {
    Age,
    Salary,
    PerformanceScore,
    AverageWorkHours,
    SatisfactionLevel,
    Absences,
}

/// Categorical columns usable for grouping and equality filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Gender,
    MaritalStatus,
    Position,
}

/// Date columns, parsed day-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DateField {
    BirthDate,
    HiringDate,
    LastPerformanceDate,
}

impl From<Numeric> for Column {
    fn from(n: Numeric) -> Self {
        match n {
            Numeric::Age => Column::Age,
            Numeric::Salary => Column::Salary,
            Numeric::PerformanceScore => Column::PerformanceScore,
            Numeric::AverageWorkHours => Column::AverageWorkHours,
            Numeric::SatisfactionLevel => Column::SatisfactionLevel,
            Numeric::Absences => Column::Absences,
        }
    }
}

impl From<Category> for Column {
    fn from(c: Category) -> Self {
        match c {
            Category::Gender => Column::Gender,
            Category::MaritalStatus => Column::MaritalStatus,
            Category::Position => Column::Position,
        }
    }
}

impl From<DateField> for Column {
    fn from(d: DateField) -> Self {
        match d {
            DateField::BirthDate => Column::BirthDate,
            DateField::HiringDate => Column::HiringDate,
            DateField::LastPerformanceDate => Column::LastPerformanceDate,
        }
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Column::from(*self).fmt(f)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Column::from(*self).fmt(f)
    }
}

// ---------------------------------------------------------------------------
// Employee – one row of the dataset
// ---------------------------------------------------------------------------

/// A single employee record. Every attribute is optional: a cell that is
/// empty or fails to parse is stored as `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Employee {
    pub name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub age: Option<f64>,
    /// Trimmed of surrounding whitespace.
    pub gender: Option<String>,
    pub marital_status: Option<String>,
    pub hiring_date: Option<NaiveDate>,
    pub position: Option<String>,
    pub salary: Option<f64>,
    pub performance_score: Option<f64>,
    pub last_performance_date: Option<NaiveDate>,
    pub average_work_hours: Option<f64>,
    pub satisfaction_level: Option<f64>,
    pub absences: Option<f64>,
    /// Raw values of columns outside the required set, aligned with
    /// [`EmployeeTable::extra_columns`].
    pub extra: Vec<Option<String>>,
}

impl Employee {
    pub fn numeric(&self, col: Numeric) -> Option<f64> {
        match col {
            Numeric::Age => self.age,
            Numeric::Salary => self.salary,
            Numeric::PerformanceScore => self.performance_score,
            Numeric::AverageWorkHours => self.average_work_hours,
            Numeric::SatisfactionLevel => self.satisfaction_level,
            Numeric::Absences => self.absences,
        }
    }

    pub fn category(&self, col: Category) -> Option<&str> {
        match col {
            Category::Gender => self.gender.as_deref(),
            Category::MaritalStatus => self.marital_status.as_deref(),
            Category::Position => self.position.as_deref(),
        }
    }

    pub fn date(&self, col: DateField) -> Option<NaiveDate> {
        match col {
            DateField::BirthDate => self.birth_date,
            DateField::HiringDate => self.hiring_date,
            DateField::LastPerformanceDate => self.last_performance_date,
        }
    }
}

// ---------------------------------------------------------------------------
// EmployeeTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// Where a header position maps to inside an [`Employee`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Known(Column),
    /// Index into [`Employee::extra`].
    Extra(usize),
}

/// The full parsed dataset. Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeTable {
    /// Header row in file order.
    pub headers: Vec<String>,
    /// One entry per header.
    pub fields: Vec<Field>,
    /// Names of the columns outside the required set.
    pub extra_columns: Vec<String>,
    /// All records (rows) in file order.
    pub records: Vec<Employee>,
}

impl EmployeeTable {
    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted distinct non-missing values of a categorical column.
    pub fn distinct(&self, col: Category) -> BTreeSet<String> {
        self.records
            .iter()
            .filter_map(|r| r.category(col))
            .map(str::to_string)
            .collect()
    }

    /// Observed `(min, max)` of a numeric column, or `None` if every value is
    /// missing.
    pub fn bounds(&self, col: Numeric) -> Option<(f64, f64)> {
        self.records
            .iter()
            .filter_map(|r| r.numeric(col))
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
            })
    }
}

//! Data layer: core types, loading, filtering, aggregation and export.
//!
//! Architecture:
//! ```text
//!  .csv / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → EmployeeTable (memoized by DatasetCache)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────────┐
//!   │ EmployeeTable │  Vec<Employee>, header layout
//!   └──────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  apply predicates → FilteredView (row indices)
//!   └──────────┘
//!        │
//!        ├──────────────┐
//!        ▼              ▼
//!   ┌───────────┐  ┌──────────┐
//!   │ aggregate  │  │  export   │  view → CSV bytes
//!   └───────────┘  └──────────┘
//! ```
pub mod aggregate;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;

pub use error::DataError;
pub use filter::{Choice, FilterOptions, FilterSpec, FilteredView, Predicate, Range};
pub use loader::{DatasetCache, load_file, load_reader};
pub use model::{Category, Column, DateField, Employee, EmployeeTable, Numeric};

#[cfg(test)]
pub(crate) mod fixtures {
    use super::loader::load_reader;
    use super::model::EmployeeTable;

    /// Six employees with a few deliberately dirty cells: Luis has a padded
    /// gender, an unparseable salary and hiring date; Jorge has missing age,
    /// performance, hours and absences.
    pub const SAMPLE_CSV: &str = "\
name_employee,birth_date,age,gender,marital_status,hiring_date,position,salary,performance_score,last_performance_date,average_work_hours,satisfaction_level,absences
Ana Ruiz,15/03/1990,34,F,Married,01/06/2015,Analyst,52000,4,10/01/2024,160,4.2,0
Luis Gómez,22/07/1985,39, M ,Single,someday,Manager,n/a,4,12/01/2024,175,3.1,2
Marta Díaz,05/11/1978,46,F,Single,14/02/2010,Manager,78000,5,15/01/2024,182,4.8,1
Pedro Sanz,30/01/1995,29,M,Married,03/09/2020,Analyst,41000,2,20/01/2024,150,2.5,4
Sofía León,12/12/1988,36,F,Divorced,20/04/2018,Engineer,61000,3,22/01/2024,168,3.6,0
Jorge Vidal,08/08/1992,,M,Married,11/11/2019,Engineer,58000,,25/01/2024,,3.9,
";

    pub fn sample_table() -> EmployeeTable {
        load_reader(SAMPLE_CSV.as_bytes()).expect("sample CSV is valid")
    }
}

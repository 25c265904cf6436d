use std::io::Write;
use std::sync::Arc;

use hr_dashboard::chart::Dashboard;
use hr_dashboard::data::aggregate;
use hr_dashboard::data::export;
use hr_dashboard::data::{
    load_file, Category, Choice, DatasetCache, Employee, FilterOptions, FilterSpec, FilteredView,
    Numeric, Predicate, Range,
};
use hr_dashboard::insight;
use hr_dashboard::summary::Summary;
use hr_dashboard::{DashboardConfig, Variant};

const CSV: &str = "\
name_employee,birth_date,age,gender,marital_status,hiring_date,position,salary,performance_score,last_performance_date,average_work_hours,satisfaction_level,absences,team
Ana Ruiz,15/03/1990,34,F,Married,01/06/2015,Analyst,10,1,10/01/2024,160,4.2,0,Blue
Luis Gómez,22/07/1985,39,M,Single,01/01/2016,Manager,n/a,4,12/01/2024,175,3.1,2,Red
Marta Díaz,05/11/1978,46,F,Single,14/02/2010,Manager,20,5,15/01/2024,182,4.8,1,Red
Sofía León,30/09/1992,32, F ,Divorced,03/03/2019,Engineer,30,,11/01/2024,168,3.6,0,Blue
Pedro Sanz,01/01/1980,44,M,Married,not a date,Analyst,25,3,09/01/2024,150,2.5,4,
";

fn data_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn names<'a>(rows: impl IntoIterator<Item = &'a Employee>) -> Vec<&'a str> {
    rows.into_iter().filter_map(|r| r.name.as_deref()).collect()
}

#[test]
fn cached_load_matches_uncached_load() {
    let file = data_file(CSV);
    let direct = load_file(file.path()).unwrap();

    let mut cache = DatasetCache::new();
    let first = cache.load(file.path()).unwrap();
    let second = cache.load(file.path()).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.parse_count(), 1);
    assert_eq!(*first, direct);
    assert_eq!(load_file(file.path()).unwrap(), direct);
}

#[test]
fn dirty_cells_become_missing() {
    let file = data_file(CSV);
    let table = load_file(file.path()).unwrap();
    assert_eq!(table.len(), 5);
    assert_eq!(table.extra_columns, vec!["team"]);

    let luis = &table.records[1];
    assert_eq!(luis.salary, None);
    let sofia = &table.records[3];
    assert_eq!(sofia.gender.as_deref(), Some("F"));
    assert_eq!(sofia.performance_score, None);
    let pedro = &table.records[4];
    assert_eq!(pedro.hiring_date, None);
    assert_eq!(pedro.extra, vec![None]);
}

#[test]
fn filter_order_does_not_matter() {
    let file = data_file(CSV);
    let table = load_file(file.path()).unwrap();
    let gender = Predicate::Equals(Category::Gender, "F".into());
    let performance = Predicate::Within(Numeric::PerformanceScore, Range::new(3.0, 5.0));

    let all = FilteredView::all(&table);
    let a = all.refine(&gender).refine(&performance);
    let b = all.refine(&performance).refine(&gender);
    assert_eq!(a.indices(), b.indices());
    assert_eq!(names(a.iter()), vec!["Marta Díaz"]);

    let spec = FilterSpec {
        gender: Choice::Only("F".into()),
        performance: Some(Range::new(5.0, 3.0)),
        ..Default::default()
    };
    assert_eq!(FilteredView::new(&table, &spec).indices(), a.indices());
}

#[test]
fn aggregates_skip_missing_values() {
    let file = data_file(CSV);
    let table = load_file(file.path()).unwrap();
    let rows = &table.records[..4];

    // Salaries 10, 20, 30 and one missing.
    assert_eq!(aggregate::mean(rows, Numeric::Salary), Some(20.0));
    // Scores 1, 4, 5 and one missing.
    let share = aggregate::proportion_at_least(rows, Numeric::PerformanceScore, 4.0);
    assert!((share - 200.0 / 3.0).abs() < 1e-9);
    assert_eq!(format!("{share:.1}%"), "66.7%");
}

#[test]
fn active_salary_filter_drops_missing_salary() {
    let file = data_file(CSV);
    let table = load_file(file.path()).unwrap();
    let options = FilterOptions::from_table(&table);
    let spec = options.default_spec(true);
    let view = FilteredView::new(&table, &spec);
    assert!(!names(view.iter()).contains(&"Luis Gómez"));

    let classic = options.default_spec(Variant::Classic.salary_filter());
    assert_eq!(classic.salary, None);
}

#[test]
fn export_round_trips_filtered_view() {
    let file = data_file(CSV);
    let table = load_file(file.path()).unwrap();
    let view = FilteredView::all(&table).refine(&Predicate::Equals(Category::MaritalStatus, "Single".into()));
    assert_eq!(view.len(), 2);

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("employee_filtered.csv");
    export::save_csv(&out, &view).unwrap();

    let reloaded = load_file(&out).unwrap();
    let expected: Vec<Employee> = view.iter().cloned().collect();
    assert_eq!(reloaded.records, expected);
    assert_eq!(reloaded.extra_columns, table.extra_columns);
}

#[test]
fn empty_view_produces_defined_outputs() {
    let file = data_file(CSV);
    let table = load_file(file.path()).unwrap();
    let spec = FilterSpec {
        gender: Choice::Only("X".into()),
        ..Default::default()
    };
    let view = FilteredView::new(&table, &spec);
    assert!(view.is_empty());

    let summary = Summary::compute(view.iter());
    assert_eq!(summary.headcount, 0);
    assert_eq!(summary.kpis()[1].value, "–");

    let config = DashboardConfig::default();
    let dashboard = Dashboard::build(&view, &config);
    assert!(dashboard.sections.iter().flat_map(|s| &s.charts).all(|c| c.is_empty()));
    let baseline = aggregate::median(&table.records, Numeric::AverageWorkHours);
    assert_eq!(insight::insights(view.iter(), baseline, &config).len(), 3);
}

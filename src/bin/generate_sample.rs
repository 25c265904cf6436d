use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Date32Array, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, Duration, NaiveDate};
use parquet::arrow::ArrowWriter;

use hr_dashboard::data::Column;

const POSITIONS: [(&str, f64); 7] = [
    ("Analyst", 48_000.0),
    ("Engineer", 62_000.0),
    ("Senior Engineer", 78_000.0),
    ("Manager", 85_000.0),
    ("Sales Representative", 45_000.0),
    ("HR Specialist", 50_000.0),
    ("Director", 120_000.0),
];
const MARITAL: [&str; 4] = ["Single", "Married", "Divorced", "Widowed"];
const FIRST_F: [&str; 6] = ["Ana", "Marta", "Sofía", "Lucía", "Elena", "Carmen"];
const FIRST_M: [&str; 6] = ["Luis", "Pedro", "Jorge", "Javier", "Pablo", "Diego"];
const LAST: [&str; 8] = ["Ruiz", "Gómez", "Díaz", "Sanz", "León", "Vidal", "Moreno", "Navarro"];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n.max(1)
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

struct SampleEmployee {
    name: String,
    birth_date: NaiveDate,
    age: f64,
    gender: &'static str,
    marital_status: &'static str,
    hiring_date: NaiveDate,
    position: &'static str,
    salary: Option<f64>,
    performance_score: f64,
    last_performance_date: NaiveDate,
    average_work_hours: f64,
    satisfaction_level: f64,
    absences: f64,
}

fn generate(rng: &mut SimpleRng, n: usize, today: NaiveDate) -> Vec<SampleEmployee> {
    (0..n)
        .map(|_| {
            let female = rng.chance(0.5);
            let first = if female { rng.pick(&FIRST_F) } else { rng.pick(&FIRST_M) };
            let name = format!("{first} {}", rng.pick(&LAST));

            let age = rng.gauss(40.0, 9.0).clamp(21.0, 65.0).round();
            let birth_date = today - Duration::days((age * 365.25) as i64 + rng.below(300) as i64);
            let tenure_days = rng.below(((age - 20.0) * 365.0) as usize).min(20 * 365);
            let hiring_date = today - Duration::days(tenure_days as i64);

            let (position, base) = POSITIONS[rng.below(POSITIONS.len())];
            let performance_score = rng.gauss(3.4, 0.9).clamp(1.0, 5.0).round();
            let salary = base * (1.0 + (age - 30.0) * 0.01) * rng.gauss(1.0, 0.08);
            let average_work_hours = rng.gauss(165.0, 12.0).clamp(120.0, 220.0);
            let satisfaction_level =
                (rng.gauss(3.2, 0.7) + (performance_score - 3.0) * 0.2).clamp(1.0, 5.0);

            SampleEmployee {
                name,
                birth_date,
                age,
                gender: if female { "F" } else { "M" },
                marital_status: MARITAL[rng.below(MARITAL.len())],
                hiring_date,
                position,
                salary: Some((salary / 100.0).round() * 100.0),
                performance_score,
                last_performance_date: today - Duration::days(rng.below(365) as i64),
                average_work_hours: (average_work_hours * 10.0).round() / 10.0,
                satisfaction_level: (satisfaction_level * 100.0).round() / 100.0,
                absences: rng.gauss(2.0, 2.0).clamp(0.0, 15.0).round(),
            }
        })
        .collect()
}

fn day_first(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// CSV with a few dirty cells the loader must coerce to missing.
fn write_csv(path: &Path, employees: &[SampleEmployee], rng: &mut SimpleRng) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(Column::ALL.iter().map(|c| c.name()))?;

    for e in employees {
        let salary = match e.salary {
            Some(s) if !rng.chance(0.02) => s.to_string(),
            _ => "n/a".to_string(),
        };
        let hiring = if rng.chance(0.01) {
            "unknown".to_string()
        } else {
            day_first(e.hiring_date)
        };
        let gender = if rng.chance(0.03) {
            format!(" {} ", e.gender)
        } else {
            e.gender.to_string()
        };
        let hours = if rng.chance(0.02) {
            String::new()
        } else {
            e.average_work_hours.to_string()
        };
        writer.write_record([
            e.name.clone(),
            day_first(e.birth_date),
            e.age.to_string(),
            gender,
            e.marital_status.to_string(),
            hiring,
            e.position.to_string(),
            salary,
            e.performance_score.to_string(),
            day_first(e.last_performance_date),
            hours,
            e.satisfaction_level.to_string(),
            e.absences.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn days_since_epoch(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - NaiveDate::default().num_days_from_ce()
}

fn write_parquet(path: &Path, employees: &[SampleEmployee]) -> Result<()> {
    let strings = |f: fn(&SampleEmployee) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(employees.iter().map(f).collect::<Vec<_>>()))
    };
    let numbers = |f: fn(&SampleEmployee) -> Option<f64>| -> ArrayRef {
        Arc::new(Float64Array::from(employees.iter().map(f).collect::<Vec<_>>()))
    };
    let dates = |f: fn(&SampleEmployee) -> NaiveDate| -> ArrayRef {
        Arc::new(Date32Array::from(
            employees.iter().map(|e| days_since_epoch(f(e))).collect::<Vec<_>>(),
        ))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new(Column::Name.name(), DataType::Utf8, false),
        Field::new(Column::BirthDate.name(), DataType::Date32, false),
        Field::new(Column::Age.name(), DataType::Float64, true),
        Field::new(Column::Gender.name(), DataType::Utf8, false),
        Field::new(Column::MaritalStatus.name(), DataType::Utf8, false),
        Field::new(Column::HiringDate.name(), DataType::Date32, false),
        Field::new(Column::Position.name(), DataType::Utf8, false),
        Field::new(Column::Salary.name(), DataType::Float64, true),
        Field::new(Column::PerformanceScore.name(), DataType::Float64, true),
        Field::new(Column::LastPerformanceDate.name(), DataType::Date32, false),
        Field::new(Column::AverageWorkHours.name(), DataType::Float64, true),
        Field::new(Column::SatisfactionLevel.name(), DataType::Float64, true),
        Field::new(Column::Absences.name(), DataType::Float64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            strings(|e| e.name.as_str()),
            dates(|e| e.birth_date),
            numbers(|e| Some(e.age)),
            strings(|e| e.gender),
            strings(|e| e.marital_status),
            dates(|e| e.hiring_date),
            strings(|e| e.position),
            numbers(|e| e.salary),
            numbers(|e| Some(e.performance_score)),
            dates(|e| e.last_performance_date),
            numbers(|e| Some(e.average_work_hours)),
            numbers(|e| Some(e.satisfaction_level)),
            numbers(|e| Some(e.absences)),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let rows = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse::<usize>()
            .with_context(|| format!("invalid row count {arg:?}"))?,
        None => 300,
    };

    let mut rng = SimpleRng::new(42);
    let today = NaiveDate::from_ymd_opt(2024, 6, 30).context("invalid reference date")?;
    let employees = generate(&mut rng, rows, today);
    log::debug!(
        "Generated {} employees, first hired in {}",
        employees.len(),
        employees.iter().map(|e| e.hiring_date.year()).min().unwrap_or(today.year())
    );

    let csv_path = Path::new("sample_employees.csv");
    write_csv(csv_path, &employees, &mut rng)?;
    let parquet_path = Path::new("sample_employees.parquet");
    write_parquet(parquet_path, &employees)?;

    println!(
        "Wrote {} employees to {} and {}",
        employees.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}

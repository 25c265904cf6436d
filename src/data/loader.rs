use std::collections::{BTreeSet, HashMap};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use arrow::array::{Array, ArrayRef, AsArray, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::error::ArrowError;
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::error::{DataError, Result};
use super::model::{Column, Employee, EmployeeTable, Field};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an employee dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` – comma-separated text with a header row (recommended)
/// * `.parquet`      – any column types; every column is cast to text and
///   coerced exactly like a CSV cell
pub fn load_file(path: &Path) -> Result<EmployeeTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" | "txt" => {
            let file = File::open(path).map_err(|e| DataError::io(path, e))?;
            load_reader(file)
        }
        "parquet" | "pq" => load_parquet(path),
        other => Err(DataError::UnsupportedExtension(other.to_string())),
    }?;

    log::info!(
        "Loaded {} employee records from {} ({} extra columns)",
        table.len(),
        path.display(),
        table.extra_columns.len()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Parse comma-separated text with a header row.
///
/// Short rows are accepted; absent trailing cells are missing values.
pub fn load_reader<R: Read>(source: R) -> Result<EmployeeTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(source);
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let (fields, extra_columns) = resolve_fields(&headers)?;

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        records.push(build_record(&fields, extra_columns.len(), |i| row.get(i)));
    }

    Ok(EmployeeTable {
        headers,
        fields,
        extra_columns,
        records,
    })
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with the same columns as the CSV layout.
fn load_parquet(path: &Path) -> Result<EmployeeTable> {
    let file = File::open(path).map_err(|e| DataError::io(path, e))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let (fields, extra_columns) = resolve_fields(&headers)?;
    let reader = builder.build()?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        let columns = batch
            .columns()
            .iter()
            .map(|col| cast(col, &DataType::Utf8))
            .collect::<std::result::Result<Vec<ArrayRef>, ArrowError>>()?;
        let strings: Vec<&StringArray> = columns.iter().map(|c| c.as_string::<i32>()).collect();

        for row in 0..batch.num_rows() {
            records.push(build_record(&fields, extra_columns.len(), |i| {
                let col = *strings.get(i)?;
                (!col.is_null(row)).then(|| col.value(row))
            }));
        }
    }

    Ok(EmployeeTable {
        headers,
        fields,
        extra_columns,
        records,
    })
}

// ---------------------------------------------------------------------------
// Shared coercion
// ---------------------------------------------------------------------------

/// Map each header to a record field and check the required set.
///
/// A repeated required header only binds its first occurrence; later
/// copies are kept as extra columns.
fn resolve_fields(headers: &[String]) -> Result<(Vec<Field>, Vec<String>)> {
    let mut seen = BTreeSet::new();
    let mut fields = Vec::with_capacity(headers.len());
    let mut extra_columns = Vec::new();

    for header in headers {
        match Column::from_header(header) {
            Some(col) if seen.insert(col) => fields.push(Field::Known(col)),
            _ => {
                fields.push(Field::Extra(extra_columns.len()));
                extra_columns.push(header.clone());
            }
        }
    }

    let missing: Vec<Column> = Column::ALL
        .into_iter()
        .filter(|col| !seen.contains(col))
        .collect();
    if !missing.is_empty() {
        return Err(DataError::MissingColumns(missing));
    }
    Ok((fields, extra_columns))
}

fn build_record<'r>(
    fields: &[Field],
    n_extra: usize,
    cell: impl Fn(usize) -> Option<&'r str>,
) -> Employee {
    let mut record = Employee {
        extra: vec![None; n_extra],
        ..Default::default()
    };
    for (i, field) in fields.iter().enumerate() {
        assign(&mut record, *field, cell(i).unwrap_or(""));
    }
    record
}

fn assign(record: &mut Employee, field: Field, raw: &str) {
    let col = match field {
        Field::Known(col) => col,
        Field::Extra(i) => {
            record.extra[i] = non_empty(raw);
            return;
        }
    };
    match col {
        Column::Name => record.name = non_empty(raw),
        Column::BirthDate => record.birth_date = parse_date(raw),
        Column::Age => record.age = parse_number(raw),
        Column::Gender => record.gender = non_empty(raw.trim()),
        Column::MaritalStatus => record.marital_status = non_empty(raw),
        Column::HiringDate => record.hiring_date = parse_date(raw),
        Column::Position => record.position = non_empty(raw),
        Column::Salary => record.salary = parse_number(raw),
        Column::PerformanceScore => record.performance_score = parse_number(raw),
        Column::LastPerformanceDate => record.last_performance_date = parse_date(raw),
        Column::AverageWorkHours => record.average_work_hours = parse_number(raw),
        Column::SatisfactionLevel => record.satisfaction_level = parse_number(raw),
        Column::Absences => record.absences = parse_number(raw),
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

/// Coerce a cell to a finite number; anything else is missing.
pub fn parse_number(raw: &str) -> Option<f64> {
    let v = raw.trim().parse::<f64>().ok()?;
    v.is_finite().then_some(v)
}

/// Parse a calendar date, day-first.
///
/// A four-digit leading component is read as ISO year-month-day, which is
/// also what export writes. A trailing time part is ignored.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    let date_part = s.split(|c| c == ' ' || c == 'T').next()?;
    if date_part.is_empty() {
        return None;
    }
    date_formats(date_part)
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

fn date_formats(s: &str) -> &'static [&'static str] {
    let parts: Vec<&str> = s.split(|c| matches!(c, '/' | '-' | '.')).collect();
    match parts.as_slice() {
        [year, _, _] if year.len() == 4 => &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"],
        [_, _, year] if year.len() == 2 => &["%d/%m/%y", "%d-%m-%y", "%d.%m.%y"],
        _ => &["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"],
    }
}

// ---------------------------------------------------------------------------
// Dataset cache
// ---------------------------------------------------------------------------

/// Identifies one version of a file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileSignature {
    modified: Option<SystemTime>,
    len: u64,
}

impl FileSignature {
    pub fn of(path: &Path) -> Result<Self> {
        let meta = fs::metadata(path).map_err(|e| DataError::io(path, e))?;
        Ok(FileSignature {
            modified: meta.modified().ok(),
            len: meta.len(),
        })
    }
}

#[derive(Debug)]
struct CachedTable {
    signature: FileSignature,
    table: Arc<EmployeeTable>,
}

/// Session-scoped memo of loaded datasets, keyed by canonical path.
///
/// An entry is reused only while the file's signature is unchanged.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, CachedTable>,
    parses: usize,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table for `path`, parsing the file only when it is
    /// new to the cache or has changed since it was last read.
    pub fn load(&mut self, path: &Path) -> Result<Arc<EmployeeTable>> {
        let key = fs::canonicalize(path).map_err(|e| DataError::io(path, e))?;
        let signature = FileSignature::of(&key)?;

        if let Some(entry) = self.entries.get(&key) {
            if entry.signature == signature {
                log::debug!("Dataset cache hit for {}", key.display());
                return Ok(Arc::clone(&entry.table));
            }
            log::debug!("Dataset cache entry for {} is stale", key.display());
        }

        let table = Arc::new(load_file(&key)?);
        self.parses += 1;
        self.entries.insert(
            key,
            CachedTable {
                signature,
                table: Arc::clone(&table),
            },
        );
        Ok(table)
    }

    /// Drop the entry for `path`, forcing the next load to re-parse.
    pub fn invalidate(&mut self, path: &Path) {
        let key = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        self.entries.remove(&key);
    }

    /// Number of times a file was actually parsed.
    pub fn parse_count(&self) -> usize {
        self.parses
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

use std::fs::File;
use std::io::Write;
use std::path::Path;

use super::error::{DataError, Result};
use super::filter::FilteredView;
use super::model::{Column, Employee, Field};

/// Write a view as comma-separated UTF-8 with the source header row.
///
/// Columns keep their input order, extra columns included. Numbers use the
/// shortest exact decimal form, dates ISO `YYYY-MM-DD`, missing values an
/// empty cell. The output loads back through [`load_reader`](super::load_reader).
pub fn write_csv<W: Write>(writer: W, view: &FilteredView<'_>) -> Result<()> {
    let table = view.table();
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(&table.headers)?;
    for record in view.iter() {
        out.write_record(table.fields.iter().map(|field| cell_text(record, *field)))?;
    }
    out.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn to_csv_bytes(view: &FilteredView<'_>) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(&mut buf, view)?;
    Ok(buf)
}

/// Save a view to `path`, replacing any existing file.
pub fn save_csv(path: &Path, view: &FilteredView<'_>) -> Result<()> {
    let file = File::create(path).map_err(|e| DataError::io(path, e))?;
    write_csv(file, view)?;
    log::info!("Exported {} records to {}", view.len(), path.display());
    Ok(())
}

fn cell_text(record: &Employee, field: Field) -> String {
    let col = match field {
        Field::Known(col) => col,
        Field::Extra(i) => return record.extra.get(i).cloned().flatten().unwrap_or_default(),
    };
    let text = |v: &Option<String>| v.clone().unwrap_or_default();
    let number = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
    let date = |v: Option<chrono::NaiveDate>| {
        v.map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    };

    match col {
        Column::Name => text(&record.name),
        Column::BirthDate => date(record.birth_date),
        Column::Age => number(record.age),
        Column::Gender => text(&record.gender),
        Column::MaritalStatus => text(&record.marital_status),
        Column::HiringDate => date(record.hiring_date),
        Column::Position => text(&record.position),
        Column::Salary => number(record.salary),
        Column::PerformanceScore => number(record.performance_score),
        Column::LastPerformanceDate => date(record.last_performance_date),
        Column::AverageWorkHours => number(record.average_work_hours),
        Column::SatisfactionLevel => number(record.satisfaction_level),
        Column::Absences => number(record.absences),
    }
}

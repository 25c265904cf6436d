use crate::data::aggregate;
use crate::data::model::{Employee, Numeric};

/// Headline statistics of a (filtered) set of records.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub headcount: usize,
    pub mean_performance: Option<f64>,
    pub mean_hours: Option<f64>,
    pub mean_salary: Option<f64>,
    /// Percentage of employees with at least one absence.
    pub absence_rate: f64,
}

/// One KPI card: a caption and its formatted value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kpi {
    pub title: &'static str,
    pub value: String,
}

const NO_DATA: &str = "–";

impl Summary {
    pub fn compute<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a Employee>,
        I::IntoIter: Clone,
    {
        let rows = rows.into_iter();
        Summary {
            headcount: aggregate::count(rows.clone()),
            mean_performance: aggregate::mean(rows.clone(), Numeric::PerformanceScore),
            mean_hours: aggregate::mean(rows.clone(), Numeric::AverageWorkHours),
            mean_salary: aggregate::mean(rows.clone(), Numeric::Salary),
            absence_rate: aggregate::share_where(rows, Numeric::Absences, |v| v > 0.0),
        }
    }

    pub fn kpis(&self) -> [Kpi; 5] {
        [
            Kpi {
                title: "Headcount",
                value: thousands(self.headcount as u64),
            },
            Kpi {
                title: "Average score",
                value: or_no_data(self.mean_performance, |v| format!("{v:.2}/5")),
            },
            Kpi {
                title: "Average hours",
                value: or_no_data(self.mean_hours, |v| format!("{v:.1} h/month")),
            },
            Kpi {
                title: "Average salary",
                value: or_no_data(self.mean_salary, dollars),
            },
            Kpi {
                title: "With absences",
                value: format!("{:.1}%", self.absence_rate),
            },
        ]
    }
}

fn or_no_data(value: Option<f64>, format: impl Fn(f64) -> String) -> String {
    value.map(format).unwrap_or_else(|| NO_DATA.to_string())
}

/// Whole dollars with grouped digits, sign first: `-1234.6` → `"-$1,235"`.
pub fn dollars(v: f64) -> String {
    let rounded = v.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}${}", thousands(rounded.abs() as u64))
}

/// `1234567` → `"1,234,567"`.
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

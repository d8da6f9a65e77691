//! Tab-separated export of FCirc rows.
//!
//! Rates that could not be computed are written as `N/A`; the `status`
//! column says why. Rows are never dropped.

use crate::ResultsResult;
use crate::types::FCircRow;
use std::io::Write;

pub const NOT_AVAILABLE: &str = "N/A";

pub const TSV_COLUMNS: [&str; 16] = [
    "serum_sample",
    "animal",
    "tracer",
    "element",
    "time_collected_min",
    "rd_per_gram",
    "ra_per_gram",
    "rd_avg_per_gram",
    "ra_avg_per_gram",
    "rd",
    "ra",
    "rd_avg",
    "ra_avg",
    "is_last",
    "status",
    "validity_issues",
];

pub fn write_tsv<W: Write>(rows: &[FCircRow], mut out: W) -> ResultsResult<()> {
    writeln!(out, "{}", TSV_COLUMNS.join("\t"))?;
    for row in rows {
        let mut fields: Vec<String> = Vec::with_capacity(TSV_COLUMNS.len());
        fields.push(cell(&row.serum_sample));
        fields.push(cell(&row.animal));
        fields.push(cell(&row.tracer));
        fields.push(row.element.to_string());
        fields.push(number(row.time_collected_min));
        fields.extend(row.rates().into_iter().map(number));
        fields.push(row.is_last.to_string());
        fields.push(cell(&row.status));
        fields.push(cell(&row.validity_issues.join("; ")));
        writeln!(out, "{}", fields.join("\t"))?;
    }
    out.flush()?;
    Ok(())
}

pub fn to_tsv_string(rows: &[FCircRow]) -> ResultsResult<String> {
    let mut buf = Vec::new();
    write_tsv(rows, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn number(value: Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

// Tabs and newlines would break the table.
fn cell(text: &str) -> String {
    text.replace(['\t', '\n', '\r'], " ")
}

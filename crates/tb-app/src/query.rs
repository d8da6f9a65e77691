//! Query helpers over FCirc result rows.

use std::collections::BTreeSet;
use tb_results::FCircRow;

/// Counts over a run's rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub record_count: usize,
    pub ok_count: usize,
    pub failed_count: usize,
    /// Rows whose serum sample has at least one validity issue.
    pub flagged_count: usize,
    pub sample_count: usize,
    pub tracer_count: usize,
}

pub fn summarize_rows(rows: &[FCircRow]) -> RunSummary {
    let samples: BTreeSet<&str> = rows.iter().map(|r| r.serum_sample.as_str()).collect();
    let tracers: BTreeSet<&str> = rows.iter().map(|r| r.tracer.as_str()).collect();
    let ok_count = rows.iter().filter(|r| r.is_ok()).count();

    RunSummary {
        record_count: rows.len(),
        ok_count,
        failed_count: rows.len() - ok_count,
        flagged_count: rows.iter().filter(|r| !r.validity_issues.is_empty()).count(),
        sample_count: samples.len(),
        tracer_count: tracers.len(),
    }
}

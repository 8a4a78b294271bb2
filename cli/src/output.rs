//! Report rendering for stdout.

use std::io::{self, Write};

use anyhow::Result;
use serde_json::json;

use tidyscan_core::AnalysisReport;

/// One `path:line:col: severity: [source] message` line per diagnostic, then
/// a summary line.
pub(crate) fn print_plain(reports: &[AnalysisReport]) {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    // A closed stdout (e.g. `| head`) is not worth failing over.
    let _ = write_plain(&mut out, reports);
}

fn write_plain(out: &mut impl Write, reports: &[AnalysisReport]) -> io::Result<()> {
    for report in reports {
        for (path, items) in report.diagnostics().iter() {
            for diagnostic in items {
                writeln!(out, "{}", diagnostic.display_with_path(path))?;
            }
        }
    }
    writeln!(out, "{}", summary(reports))
}

fn summary(reports: &[AnalysisReport]) -> String {
    let errors: usize = reports.iter().map(|r| r.diagnostics().error_count()).sum();
    let warnings: usize = reports
        .iter()
        .map(|r| r.diagnostics().warning_count())
        .sum();
    let files = reports.len();
    format!(
        "{files} file{} analyzed: {errors} error{}, {warnings} warning{}",
        plural(files),
        plural(errors),
        plural(warnings)
    )
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// One JSON object per report, one per line.
pub(crate) fn print_json(reports: &[AnalysisReport]) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for report in reports {
        let value = json!({
            "document": report.document().path(),
            "language": report.document().language_id(),
            "diagnostics": report.diagnostics(),
        });
        serde_json::to_writer(&mut out, &value)?;
        writeln!(out)?;
    }
    Ok(())
}

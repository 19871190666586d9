//! Run summary formatting

use crate::application::ConvertReport;

/// Format the summary printed after a conversion
pub fn format_summary(report: &ConvertReport) -> String {
    let mut output = String::new();

    for journal in &report.journals {
        output.push_str(&format!(
            "{:<16} {:>5} entries  {:>5} documents\n",
            journal.name, journal.entries, journal.documents
        ));
    }

    output.push_str(&format!(
        "\n{} documents written, {} skipped, {} entries merged, {} attachments copied\n",
        report.documents_written,
        report.documents_skipped,
        report.entries_merged(),
        report.attachments_copied
    ));

    if !report.warnings.is_empty() {
        output.push_str(&format!("\n{} warnings:\n", report.warnings.len()));
        for warning in &report.warnings {
            output.push_str(&format!("  - {}\n", warning));
        }
    }

    output
}

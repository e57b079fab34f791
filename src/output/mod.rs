//! Output formatting and display for batesmerge.
//!
//! This module handles all user-facing output:
//! - Formatted status messages in quiet and verbose modes
//! - The pre-flight summary of supported and skipped inputs
//! - The end-of-run summary
//!
//! Diagnostics meant for developers go through `tracing` instead.

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter};

use crate::assemble::AssemblyReport;
use crate::config::Config;
use crate::validation::Preflight;

/// Create an output formatter from configuration.
pub fn create_formatter(config: &Config) -> OutputFormatter {
    OutputFormatter::from_config(config)
}

/// Display the pre-flight partition of the inputs.
pub fn display_preflight_summary(formatter: &OutputFormatter, preflight: &Preflight) {
    formatter.info(&format!(
        "Found {} supported file(s), {}",
        preflight.supported.len(),
        preflight.format_total_size()
    ));
    if formatter.is_verbose() {
        for (index, input) in preflight.supported.iter().enumerate() {
            formatter.list_item(index + 1, &format!("{} ({})", input.path.display(), input.kind));
        }
    }

    if !preflight.unsupported.is_empty() {
        formatter.warning("Unsupported files will be skipped:");
        for path in &preflight.unsupported {
            formatter.warning(&format!("  {}", path.display()));
        }
    }
}

/// Display the outcome of a finished run.
pub fn display_report(formatter: &OutputFormatter, report: &AssemblyReport) {
    for page in &report.skipped_pages {
        formatter.warning(&format!(
            "Skipped page {} of {}: {}",
            page.page,
            page.path.display(),
            page.reason
        ));
    }

    formatter.success(&format!(
        "Wrote {} page(s) to {} ({})",
        report.pages_written,
        report.output_path.display(),
        report.format_file_size()
    ));

    if let (Some(first), Some(last)) = (&report.first_stamp, &report.last_stamp) {
        formatter.info(&format!("Bates range: {first} - {last}"));
    }

    formatter.detail("Inputs processed", &report.inputs_processed.to_string());
    formatter.debug(&format!(
        "Finished in {:.2}s",
        report.elapsed.as_secs_f64()
    ));
}

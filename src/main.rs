//! batesmerge - Combine PDF and image files into one Bates-stamped PDF.

use clap::Parser;
use std::io::{self, Write};
use std::path::Path;
use std::process;
use std::time::SystemTime;
use tracing_subscriber::EnvFilter;

use batesmerge::cli::Cli;
use batesmerge::config::{Config, OverwriteMode};
use batesmerge::error::BatesError;
use batesmerge::io::{PdfWriter, WriteOptions};
use batesmerge::output::{OutputFormatter, display_preflight_summary, display_report};
use batesmerge::{DocumentAssembler, Preflight};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        OutputFormatter::default().error(&format!("Error: {err}"));
        process::exit(err.exit_code());
    }
}

/// Send library diagnostics to stderr; `RUST_LOG` overrides the default.
fn init_tracing(verbose: bool) {
    let filter = if verbose { "batesmerge=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Main application logic.
async fn run(cli: Cli) -> Result<(), BatesError> {
    let config = cli.to_config()?;
    let formatter = OutputFormatter::from_config(&config);

    if formatter.should_print() {
        formatter.section(&format!("{} v{}", batesmerge::NAME, batesmerge::VERSION));
    }

    if config.dry_run {
        formatter.info("DRY RUN MODE - No files will be created");
    }

    formatter.info("Checking input files...");
    let inputs = config.inputs.clone();
    let preflight = tokio::task::spawn_blocking(move || Preflight::run(&inputs))
        .await
        .map_err(|e| BatesError::other(format!("Input check failed: {e}")))?;
    display_preflight_summary(&formatter, &preflight);

    let Some(first_supported) = preflight.first_supported() else {
        return Err(BatesError::NoSupportedInputs);
    };

    if preflight.exceeds(config.large_job_threshold) {
        confirm_large_job(&config, &formatter, &preflight).await?;
    }

    let output = config.output_path_for(first_supported, SystemTime::now());
    PdfWriter::new().can_write(&output)?;

    if config.dry_run {
        formatter.success("Dry run completed successfully");
        formatter.info(&format!("  Output would be: {}", output.display()));
        formatter.info("  Run without --dry-run to create the combined PDF");
        return Ok(());
    }

    handle_output_overwrite(&config, &output, &formatter).await?;

    formatter.info(&format!(
        "Combining {} file(s) into {}...",
        preflight.supported.len(),
        output.display()
    ));

    let assembler = DocumentAssembler::new(config.stamp.clone())
        .with_write_options(WriteOptions::from(config.compression));
    // Inputs already found unsupported were reported by the preflight.
    let inputs = preflight.supported_paths();
    let output_path = output.clone();
    let report = tokio::task::spawn_blocking(move || assembler.run(&inputs, &output_path))
        .await
        .map_err(|e| BatesError::other(format!("Assembly task failed: {e}")))??;

    if config.json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| BatesError::other(format!("Failed to serialize report: {e}")))?;
        println!("{json}");
    } else {
        display_report(&formatter, &report);
    }

    Ok(())
}

/// Ask before processing more than the configured number of bytes.
///
/// `--yes` and dry runs go ahead; quiet mode declines, since there is no one
/// to ask.
async fn confirm_large_job(
    config: &Config,
    formatter: &OutputFormatter,
    preflight: &Preflight,
) -> Result<(), BatesError> {
    formatter.warning(&format!(
        "Selected files total {}; combining them may take a while and use a lot of memory",
        preflight.format_total_size()
    ));

    if config.assume_yes || config.dry_run {
        return Ok(());
    }

    if formatter.is_quiet() {
        return Err(BatesError::Cancelled);
    }

    if ask("Continue? [y/N]: ")? {
        Ok(())
    } else {
        Err(BatesError::Cancelled)
    }
}

/// Handle output file overwrite scenarios.
async fn handle_output_overwrite(
    config: &Config,
    output: &Path,
    formatter: &OutputFormatter,
) -> Result<(), BatesError> {
    if !output.exists() {
        return Ok(());
    }

    match config.overwrite_mode {
        OverwriteMode::Force => Ok(()),
        OverwriteMode::NoClobber => Err(BatesError::output_exists(output.to_path_buf())),
        OverwriteMode::Prompt => {
            // Nobody to ask in quiet mode.
            if formatter.is_quiet() {
                return Err(BatesError::output_exists(output.to_path_buf()));
            }

            formatter.warning(&format!(
                "Output file already exists: {}",
                output.display()
            ));

            if ask("Overwrite? [y/N]: ")? {
                Ok(())
            } else {
                Err(BatesError::Cancelled)
            }
        }
    }
}

/// Simple yes/no prompt on stdin.
fn ask(question: &str) -> Result<bool, BatesError> {
    print!("{question}");
    io::stdout().flush().ok();

    let mut response = String::new();
    io::stdin()
        .read_line(&mut response)
        .map_err(|err| BatesError::other(format!("Failed to read input: {err}")))?;

    let response = response.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}

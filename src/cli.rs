//! CLI argument parsing for batesmerge.
//!
//! This module defines the command-line interface using `clap` and turns the
//! parsed arguments into a validated [`Config`].
//!
//! # Examples
//!
//! ```no_run
//! use batesmerge::cli::Cli;
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! let config = cli.to_config().expect("Invalid configuration");
//! println!("Combining {} inputs", config.inputs.len());
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::{
    CompressionLevel, Config, DEFAULT_PREFIX, DEFAULT_STARTING_NUMBER, OverwriteMode,
    StampOptions,
};
use crate::error::{BatesError, Result};
use crate::utils::collect_paths_for_patterns;

const MIB: u64 = 1024 * 1024;

/// Combine PDF and image files into one PDF, stamping every page with a
/// sequential Bates number.
///
/// Inputs are processed in the order given. Files that are neither a
/// readable PDF nor a decodable image are skipped with a warning.
#[derive(Parser, Debug)]
#[command(name = "batesmerge")]
#[command(version)]
#[command(about = "Combine PDFs and images into one Bates-stamped PDF", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Input PDF or image files (in order)
    ///
    /// Glob patterns are expanded; matches of one pattern are taken in
    /// alphabetical order.
    ///
    /// Examples:
    ///   batesmerge complaint.pdf exhibit-*.png
    ///   batesmerge 'scans/*.jpg' --prefix SMITH-
    #[arg(required = true, value_name = "FILE")]
    pub inputs: Vec<String>,

    /// Output PDF file path
    ///
    /// Defaults to Combined_<unix-time>.pdf in the directory of the first
    /// supported input.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Text placed before the Bates number
    #[arg(long, value_name = "TEXT", default_value = DEFAULT_PREFIX)]
    pub prefix: String,

    /// Bates number of the first page
    #[arg(long, value_name = "N", default_value_t = DEFAULT_STARTING_NUMBER)]
    pub start: u64,

    /// Combine without stamping
    #[arg(long)]
    pub no_stamp: bool,

    /// Dry run - classify inputs and show the plan without creating output
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Verbose output - list every input and per-page diagnostics
    #[arg(short, long)]
    pub verbose: bool,

    /// Force overwrite of existing output file without confirmation
    #[arg(short, long)]
    pub force: bool,

    /// Never overwrite existing output file
    #[arg(long, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Compression level for output PDF
    ///
    /// - none: streams are written as produced
    /// - standard: compress streams (default)
    /// - maximum: compress streams and drop unused objects
    #[arg(short, long, value_name = "LEVEL", default_value = "standard")]
    #[arg(value_parser = ["none", "standard", "maximum"])]
    pub compression: String,

    /// Do not ask for confirmation on large jobs
    #[arg(short, long)]
    pub yes: bool,

    /// Total input size, in MiB, above which confirmation is requested
    #[arg(long, value_name = "MIB", default_value_t = 500)]
    pub large_job_mb: u64,

    /// Print the final report as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Expand glob patterns in the inputs, keeping argument order.
    pub fn expand_inputs(&self) -> Result<Vec<PathBuf>> {
        collect_paths_for_patterns(&self.inputs)
    }

    /// Convert CLI arguments into a validated Config.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A glob pattern is malformed
    /// - Compression level is invalid
    /// - Configuration validation fails
    pub fn to_config(&self) -> Result<Config> {
        let compression = CompressionLevel::from_str(&self.compression)?;

        let overwrite_mode = if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        };

        let config = Config {
            inputs: self.expand_inputs()?,
            output: self.output.clone(),
            stamp: StampOptions {
                enabled: !self.no_stamp,
                prefix: self.prefix.clone(),
                starting_number: self.start,
            },
            dry_run: self.dry_run,
            verbose: self.verbose,
            quiet: self.quiet,
            json: self.json,
            assume_yes: self.yes,
            overwrite_mode,
            compression,
            large_job_threshold: self.large_job_mb.saturating_mul(MIB),
        };

        config.validate().map_err(|e| {
            BatesError::invalid_config(format!("Configuration validation failed: {e}"))
        })?;

        Ok(config)
    }
}

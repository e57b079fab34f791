//! Configuration module for batesmerge.
//!
//! This module holds the validated, normalized settings that drive a run:
//! - Stamp options (enabled flag, prefix, starting number)
//! - Output location, including the default `Combined_<epoch>.pdf` name
//! - Overwrite, compression, and verbosity preferences
//! - The advisory large-job threshold

use anyhow::{Result, bail};

use crate::BatesError;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

/// Default stamp prefix.
pub const DEFAULT_PREFIX: &str = "BATES-";

/// Default first Bates number.
pub const DEFAULT_STARTING_NUMBER: u64 = 1;

/// Default size above which a run is considered large (500 MiB).
pub const DEFAULT_LARGE_JOB_THRESHOLD: u64 = 500 * 1024 * 1024;

/// Compression level for the output PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionLevel {
    /// No compression - streams are written as produced.
    None,
    /// Compress streams.
    #[default]
    Standard,
    /// Compress streams and drop unreferenced objects.
    Maximum,
}

impl FromStr for CompressionLevel {
    type Err = BatesError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            "maximum" => Ok(Self::Maximum),
            _ => Err(BatesError::InvalidConfig {
                message: format!(
                    "Invalid compression level: {s}. Must be one of: none, standard, maximum"
                ),
            }),
        }
    }
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// Bates stamp parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StampOptions {
    /// Whether pages get a stamp at all.
    pub enabled: bool,
    /// Text placed before the zero-padded number.
    pub prefix: String,
    /// Number printed on the first appended page.
    pub starting_number: u64,
}

impl Default for StampOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            prefix: DEFAULT_PREFIX.to_string(),
            starting_number: DEFAULT_STARTING_NUMBER,
        }
    }
}

impl StampOptions {
    /// Stamping turned off; prefix and number are kept at their defaults.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Validate the stamp parameters.
    ///
    /// Control characters in the prefix are rejected since they cannot be
    /// drawn with the stamp font.
    pub fn validate(&self) -> Result<()> {
        if let Some(c) = self.prefix.chars().find(|c| c.is_control()) {
            bail!("Stamp prefix contains a control character: {:?}", c);
        }
        Ok(())
    }
}

/// Complete configuration for a run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Input paths (in merge order).
    pub inputs: Vec<PathBuf>,

    /// Explicit output path. `None` means "next to the first supported input".
    pub output: Option<PathBuf>,

    /// Stamp parameters.
    pub stamp: StampOptions,

    /// Dry run mode - classify inputs without creating output.
    pub dry_run: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// Print the final report as JSON.
    pub json: bool,

    /// Answer yes to the large-job confirmation.
    pub assume_yes: bool,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Compression level for output.
    pub compression: CompressionLevel,

    /// Total input size (bytes) above which the user is warned.
    pub large_job_threshold: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            output: None,
            stamp: StampOptions::default(),
            dry_run: false,
            verbose: false,
            quiet: false,
            json: false,
            assume_yes: false,
            overwrite_mode: OverwriteMode::Prompt,
            compression: CompressionLevel::Standard,
            large_job_threshold: DEFAULT_LARGE_JOB_THRESHOLD,
        }
    }
}

impl Config {
    /// Returns a reference to inputs.
    pub fn inputs(&self) -> &[PathBuf] {
        self.inputs.as_ref()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No input files are specified
    /// - Verbose and quiet modes are both enabled
    /// - The explicit output path is also an input
    /// - The stamp prefix is not drawable
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            bail!("No input files specified");
        }

        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        if let Some(output) = &self.output
            && self.inputs.iter().any(|input| input == output)
        {
            bail!(
                "Output file cannot be the same as an input file: {}",
                output.display()
            );
        }

        self.stamp.validate()?;

        Ok(())
    }

    /// Resolve where the combined PDF goes.
    ///
    /// An explicit output wins. Otherwise the file is named
    /// `Combined_<unix-epoch-seconds>.pdf` and placed in the directory of
    /// `first_supported`, the first input that will actually be processed.
    pub fn output_path_for(&self, first_supported: &Path, now: SystemTime) -> PathBuf {
        if let Some(output) = &self.output {
            return output.clone();
        }

        let directory = first_supported
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        directory.join(default_output_name(now))
    }

    /// Check if output should be displayed.
    ///
    /// Returns false if in quiet mode and not doing a dry run.
    pub fn should_print(&self) -> bool {
        !self.quiet || self.dry_run
    }
}

/// `Combined_<unix-epoch-seconds>.pdf` for the given instant.
pub fn default_output_name(now: SystemTime) -> String {
    let seconds = now
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0);
    format!("Combined_{seconds}.pdf")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn create_test_config() -> Config {
        Config {
            inputs: vec![PathBuf::from("a.pdf")],
            ..Config::default()
        }
    }

    #[test]
    fn test_compression_level_from_str() {
        assert_eq!(
            CompressionLevel::from_str("none").unwrap(),
            CompressionLevel::None
        );
        assert_eq!(
            CompressionLevel::from_str("STANDARD").unwrap(),
            CompressionLevel::Standard
        );
        assert_eq!(
            CompressionLevel::from_str("maximum").unwrap(),
            CompressionLevel::Maximum
        );
        assert!(CompressionLevel::from_str("invalid").is_err());
    }

    #[test]
    fn test_stamp_defaults() {
        let stamp = StampOptions::default();
        assert!(stamp.enabled);
        assert_eq!(stamp.prefix, "BATES-");
        assert_eq!(stamp.starting_number, 1);
        assert!(!StampOptions::disabled().enabled);
    }

    #[test]
    fn test_stamp_prefix_rejects_control_characters() {
        let stamp = StampOptions {
            prefix: "EX\n".to_string(),
            ..StampOptions::default()
        };
        assert!(stamp.validate().is_err());

        let stamp = StampOptions {
            prefix: String::new(),
            ..StampOptions::default()
        };
        assert!(stamp.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = create_test_config();
        assert!(config.validate().is_ok());

        config.inputs.clear();
        assert!(config.validate().is_err());
        config.inputs = vec![PathBuf::from("a.pdf")];

        config.verbose = true;
        config.quiet = true;
        assert!(config.validate().is_err());
        config.verbose = false;
        config.quiet = false;

        config.output = Some(PathBuf::from("a.pdf"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_output_name() {
        let now = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        assert_eq!(default_output_name(now), "Combined_1700000000.pdf");
    }

    #[test]
    fn test_output_path_next_to_first_input() {
        let config = create_test_config();
        let now = UNIX_EPOCH + Duration::from_secs(42);
        let path = config.output_path_for(Path::new("/cases/smith/a.pdf"), now);
        assert_eq!(path, PathBuf::from("/cases/smith/Combined_42.pdf"));
    }

    #[test]
    fn test_output_path_relative_input() {
        let config = create_test_config();
        let now = UNIX_EPOCH + Duration::from_secs(7);
        let path = config.output_path_for(Path::new("a.pdf"), now);
        assert_eq!(path, PathBuf::from("./Combined_7.pdf"));
    }

    #[test]
    fn test_explicit_output_wins() {
        let config = Config {
            output: Some(PathBuf::from("out.pdf")),
            ..create_test_config()
        };
        let path = config.output_path_for(Path::new("/x/a.pdf"), SystemTime::now());
        assert_eq!(path, PathBuf::from("out.pdf"));
    }

    #[test]
    fn test_should_print() {
        let mut config = create_test_config();
        assert!(config.should_print());

        config.quiet = true;
        assert!(!config.should_print());

        config.dry_run = true;
        assert!(config.should_print());
    }
}

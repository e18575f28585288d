//! Command-line interface for spancheck.
//!
//! Takes a document file and an annotation file, writes accepted annotations
//! to stdout and diagnostics to stderr.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use tracing::info;

use crate::config::{ResolvedConfig, DEFAULT_LOG_LEVEL};
use crate::core::check_streams;

/// spancheck - keep only annotations that quote their document exactly
#[derive(Parser, Debug)]
#[command(name = "spancheck")]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("verbosity").args(["debug", "verbose", "quiet"])))]
pub struct Cli {
    /// Show debug logging messages
    #[arg(short, long)]
    pub debug: bool,

    /// Verbose logging (default: warnings)
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet logging (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Print run statistics as JSON to stderr
    #[arg(long)]
    pub stats: bool,

    /// Config file (searches for .spancheck/config.yaml if not provided)
    #[arg(long, env = "SPANCHECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Documents: id, title, abstract (tab-delimited)
    pub text_file: PathBuf,

    /// Annotations: id, section, start, end, quote, class (tab-delimited)
    pub annotation_file: PathBuf,
}

impl Cli {
    /// Log filter directive from the verbosity flags, if one was given
    pub fn verbosity(&self) -> Option<&'static str> {
        if self.debug {
            Some("debug")
        } else if self.verbose {
            Some("info")
        } else if self.quiet {
            Some("error")
        } else {
            None
        }
    }

    /// Effective log filter: flags, then config file, then the default
    pub fn log_level(&self, config: Option<&ResolvedConfig>) -> String {
        match (self.verbosity(), config) {
            (Some(level), _) => level.to_string(),
            (None, Some(config)) => config.log_level.clone(),
            (None, None) => DEFAULT_LOG_LEVEL.to_string(),
        }
    }

    /// Execute the check
    pub fn execute(self, config: &ResolvedConfig) -> Result<()> {
        if let Some(path) = &config.config_file {
            info!("config file: '{}'", path.display());
        }

        info!("text file: '{}'", self.text_file.display());
        let text = File::open(&self.text_file)
            .with_context(|| format!("could not read text file '{}'", self.text_file.display()))?;

        info!("annotation file: '{}'", self.annotation_file.display());
        let annotations = File::open(&self.annotation_file).with_context(|| {
            format!(
                "could not read annotation file '{}'",
                self.annotation_file.display()
            )
        })?;

        let stdout = io::stdout();
        let mut out = BufWriter::new(stdout.lock());
        let stats = check_streams(BufReader::new(text), BufReader::new(annotations), &mut out)?;
        out.flush().context("Failed to flush output")?;

        if self.stats || config.stats {
            let json = serde_json::to_string_pretty(&stats).context("Failed to serialize stats")?;
            eprintln!("{}", json);
        }

        info!(
            documents = stats.documents,
            accepted = stats.accepted,
            rejected = stats.rejected_total(),
            "check complete"
        );
        Ok(())
    }
}

//! Command types shared between main and library

use std::path::{Path, PathBuf};

use carve_core::config::{DEFAULT_ENCODING, DEFAULT_MAX_BYTES, ExtractOptions};
use carve_core::{Authority, LanguageFilter, UnitKind};
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "carve")]
#[command(author, version, about = "Heuristic source-code unit extractor", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract file, class or function units from a repository as JSONL
    Extract(ExtractArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    /// Repository root to scan
    #[arg(long, default_value = ".")]
    pub repo: PathBuf,

    /// Output JSONL file, relative to the repository root unless absolute
    #[arg(long)]
    pub out: PathBuf,

    /// Include glob (repeatable); defaults depend on --language
    #[arg(long = "include")]
    pub includes: Vec<String>,

    /// Exclude glob (repeatable); replaces the default excludes
    #[arg(long = "exclude")]
    pub excludes: Vec<String>,

    /// Unit granularity: function, class or file
    #[arg(long, default_value = "function")]
    pub unit: UnitKind,

    /// Skip files larger than this many bytes
    #[arg(long, default_value_t = DEFAULT_MAX_BYTES)]
    pub max_bytes: u64,

    /// Preferred text encoding
    #[arg(long, default_value = DEFAULT_ENCODING)]
    pub encoding: String,

    /// Language filter: c, cpp, python or all
    #[arg(long, default_value = "all")]
    pub language: LanguageFilter,

    /// Authority tag stamped on every unit
    #[arg(long, default_value = "informative")]
    pub authority: Authority,

    /// Print the matched files and stop
    #[arg(long)]
    pub dry_run: bool,

    /// Reuse an existing output file instead of extracting again
    #[arg(long)]
    pub save: bool,

    /// Keep only the first N units
    #[arg(long)]
    pub top: Option<usize>,

    /// Write the run record to this JSON file
    #[arg(long)]
    pub manifest: Option<PathBuf>,
}

impl ExtractArgs {
    /// Build extraction options rooted at `repo_root`
    #[must_use]
    pub fn to_options(&self, repo_root: &Path) -> ExtractOptions {
        ExtractOptions::new(repo_root)
            .with_includes(self.includes.clone())
            .with_excludes(self.excludes.clone())
            .with_max_bytes(self.max_bytes)
            .with_encoding(self.encoding.clone())
            .with_language(self.language)
            .with_unit(self.unit)
            .with_authority(self.authority)
    }
}

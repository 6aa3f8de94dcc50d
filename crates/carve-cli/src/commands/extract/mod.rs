//! Extract command: scan a repository and write its units as JSONL
//!
//! Validates every option before touching the filesystem, scans, extracts
//! in parallel, then writes one JSON object per unit.

use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use carve_core::config::{ConfigError, ExtractOptions};
use carve_core::{
    ExtractedUnit, ExtractionReport, ExtractionRun, Extractor, ScanSummary, ScannedFile, Scanner,
};
use tracing::info;

use super::types::ExtractArgs;

/// Scanned paths listed when a run extracts nothing
const TOP_PATHS_SHOWN: usize = 5;

/// Run the extract command
///
/// # Errors
/// Returns an error if the options are invalid, the repository root does not
/// exist, or the output or manifest cannot be written.
pub fn run(args: &ExtractArgs) -> Result<()> {
    let repo_root = args
        .repo
        .canonicalize()
        .map_err(|_| ConfigError::RootNotFound(args.repo.clone()))?;
    let output_path = resolve_output(&repo_root, &args.out);

    if args.save && !args.dry_run && output_path.exists() {
        let count = count_jsonl_lines(&output_path)?;
        info!(
            "Using existing units at {} ({} units)",
            output_path.display(),
            count
        );
        return Ok(());
    }

    let options = build_options(args, &repo_root, &output_path);
    let scanner = Scanner::from_options(&options)?;
    let extractor = Extractor::from_options(&options)?;

    info!("Scanning repository: {}", repo_root.display());
    let (files, scan_summary) = scanner.scan()?;

    if args.dry_run {
        for file in &files {
            println!("{}", file.path.display());
        }
        return Ok(());
    }

    let run = create_run(&repo_root, &options);
    log_run_info(&run);

    info!("Extracting {} units from {} files...", options.unit, files.len());
    let mut report = extractor.extract_all(&files);
    if let Some(top) = args.top {
        report.units.truncate(top);
        report.summary.units_extracted = report.units.len();
    }

    write_jsonl(&output_path, &report.units)?;
    info!(
        "✓ Wrote {} code units to {}",
        report.units.len(),
        output_path.display()
    );

    log_summary(&repo_root, &options, &scan_summary, &report);
    if report.units.is_empty() {
        log_top_paths(&files);
    }

    if let Some(manifest) = &args.manifest {
        let run = run.finish(scan_summary, report.summary);
        write_manifest(&resolve_output(&repo_root, manifest), &run)?;
    }

    Ok(())
}

/// Relative output paths are taken relative to the repository root
pub(crate) fn resolve_output(repo_root: &Path, out: &Path) -> PathBuf {
    if out.is_absolute() {
        out.to_path_buf()
    } else {
        repo_root.join(out)
    }
}

/// Options for this run, with the output file excluded when it sits inside the repository
pub(crate) fn build_options(
    args: &ExtractArgs,
    repo_root: &Path,
    output_path: &Path,
) -> ExtractOptions {
    let options = args.to_options(repo_root);
    let mut excludes = options.effective_excludes();
    if let Some(pattern) = output_exclude(repo_root, output_path) {
        excludes.push(pattern);
    }
    options.with_excludes(excludes)
}

/// Root-relative exclude pattern matching exactly `output_path`
pub(crate) fn output_exclude(repo_root: &Path, output_path: &Path) -> Option<String> {
    let parent = output_path.parent()?.canonicalize().ok()?;
    let absolute = parent.join(output_path.file_name()?);
    let relative = absolute.strip_prefix(repo_root).ok()?;
    let posix = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    Some(glob::Pattern::escape(&posix))
}

fn create_run(repo_root: &Path, options: &ExtractOptions) -> ExtractionRun {
    ExtractionRun::new(repo_root.display().to_string(), options.unit)
        .with_language(options.language)
        .with_authority(options.authority)
        .with_git_info()
}

fn log_run_info(run: &ExtractionRun) {
    info!(
        "Created run: {} (commit: {}, branch: {:?})",
        run.id,
        run.commit_sha.as_deref().unwrap_or("none"),
        run.branch
    );
}

fn log_summary(
    repo_root: &Path,
    options: &ExtractOptions,
    scan: &ScanSummary,
    report: &ExtractionReport,
) {
    info!(
        "Summary: repo_root={}, include={}, exclude={}, total_files_matched={}, \
         total_files_skipped(excluded={}, too_large={}, unreadable={}, unparseable={}), \
         total_units_extracted={}",
        repo_root.display(),
        join_or_none(&options.effective_includes()),
        join_or_none(&options.effective_excludes()),
        scan.total_files_matched,
        scan.skipped_excluded,
        scan.skipped_too_large,
        report.summary.files_skipped_unreadable,
        report.summary.files_skipped_unparseable,
        report.summary.units_extracted
    );
}

fn log_top_paths(files: &[ScannedFile]) {
    let top: Vec<&str> = files
        .iter()
        .take(TOP_PATHS_SHOWN)
        .map(|f| f.relative_path.as_str())
        .collect();
    info!("Top scanned paths: {}", join_or_none(&top));
}

fn join_or_none<S: AsRef<str>>(items: &[S]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items
            .iter()
            .map(|s| s.as_ref())
            .collect::<Vec<&str>>()
            .join(", ")
    }
}

/// Write one JSON object per line, creating parent directories
pub(crate) fn write_jsonl(path: &Path, units: &[ExtractedUnit]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file =
        fs::File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for unit in units {
        serde_json::to_writer(&mut writer, unit)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Number of non-blank lines in a JSONL file
pub(crate) fn count_jsonl_lines(path: &Path) -> Result<usize> {
    let file = fs::File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut count = 0;
    for line in BufReader::new(file).lines() {
        if !line?.trim().is_empty() {
            count += 1;
        }
    }
    Ok(count)
}

fn write_manifest(path: &Path, run: &ExtractionRun) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(run)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote run manifest to {}", path.display());
    Ok(())
}

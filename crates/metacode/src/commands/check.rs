//! Check command - verify generated regions are current

use super::for_each_file;
use crate::context::Context;
use crate::output::print_json;
use anyhow::{Result, bail};
use colored::Colorize;
use metacode_core::FileStatus;
use metacode_core::document::check_file;
use serde_json::json;
use std::path::PathBuf;

/// Check files without writing them
///
/// # Exit Code
///
/// Fails when a file is stale or cannot be checked, so CI can gate on it.
pub fn run(files: Vec<PathBuf>, json: bool, ctx: &Context) -> Result<()> {
    let results = for_each_file(&files, ctx, |path| check_file(path, &ctx.config.syntax));

    let stale = results
        .iter()
        .filter(|r| matches!(r, Ok(FileStatus::Stale)))
        .count();
    let failures = results.iter().filter(|r| r.is_err()).count();

    if json {
        let entries: Vec<_> = files
            .iter()
            .zip(&results)
            .map(|(path, result)| match result {
                Ok(status) => json!({ "path": path.display().to_string(), "status": status }),
                Err(e) => json!({
                    "path": path.display().to_string(),
                    "status": "error",
                    "error": e.to_string(),
                }),
            })
            .collect();
        let output = json!({
            "files": entries,
            "stale": stale,
            "errors": failures,
        });
        print_json(&serde_json::to_string_pretty(&output)?)?;
    } else {
        render_human(&files, &results, ctx.verbose);
    }

    if failures > 0 {
        bail!("{} file(s) could not be checked", failures);
    }
    if stale > 0 {
        bail!("{} file(s) out of date; run `metacode expand`", stale);
    }
    Ok(())
}

fn render_human(
    files: &[PathBuf],
    results: &[metacode_core::Result<FileStatus>],
    verbose: bool,
) {
    for (path, result) in files.iter().zip(results) {
        match result {
            Ok(FileStatus::Stale) => {
                println!("{} {} is out of date", "✗".red().bold(), path.display());
            }
            Ok(FileStatus::UpToDate) => {
                println!("{} {} is up to date", "✓".green().bold(), path.display());
            }
            Ok(FileStatus::NoMetacode) => {
                if verbose {
                    println!("{} {} has no #metacode block", "!".yellow(), path.display());
                }
            }
            Err(e) => {
                eprintln!("{} {}: {}", "✗".red().bold(), path.display(), e);
            }
        }
    }
}

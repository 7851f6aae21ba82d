//! Expand command - regenerate #metagen regions in place

use super::{for_each_file, watch};
use crate::context::Context;
use crate::output::print_raw;
use anyhow::{Context as _, Result, bail};
use colored::Colorize;
use metacode_core::FileStatus;
use metacode_core::document::{expand_file, expand_source};
use std::fs;
use std::path::PathBuf;

/// Expand files in place, print them, or keep them expanded while watching
pub fn run(files: Vec<PathBuf>, stdout: bool, watch: bool, ctx: &Context) -> Result<()> {
    if stdout {
        for file in &files {
            let source = fs::read_to_string(file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let expanded = expand_source(&source, &ctx.config.syntax)
                .with_context(|| format!("failed to expand {}", file.display()))?;
            print_raw(&expanded)?;
        }
        return Ok(());
    }

    let failures = expand_all(&files, ctx);

    if watch {
        return watch::run(&files, ctx);
    }
    if failures > 0 {
        bail!("{} file(s) failed to expand", failures);
    }
    Ok(())
}

/// Expand every file and report each outcome; returns the failure count
pub(crate) fn expand_all(files: &[PathBuf], ctx: &Context) -> usize {
    let results = for_each_file(files, ctx, |path| expand_file(path, &ctx.config.syntax));

    let mut updated = 0;
    let mut failures = 0;
    for (path, result) in files.iter().zip(results) {
        match result {
            Ok(FileStatus::Stale) => {
                updated += 1;
                println!("{} Expanded {}", "✓".green().bold(), path.display());
            }
            Ok(FileStatus::UpToDate) => {
                if ctx.verbose {
                    println!("{} {} is up to date", "→".cyan(), path.display());
                }
            }
            Ok(FileStatus::NoMetacode) => {
                println!("{} {} has no #metacode block, skipped", "!".yellow(), path.display());
            }
            Err(e) => {
                failures += 1;
                eprintln!("{} {}: {}", "✗".red().bold(), path.display(), e);
            }
        }
    }

    if updated == 0 && failures == 0 {
        println!("{} Nothing to expand", "✓".green().bold());
    }
    failures
}

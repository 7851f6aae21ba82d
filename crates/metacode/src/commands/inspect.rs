//! Inspect command - show what a file declares

use crate::context::Context;
use crate::output::print_json;
use anyhow::{Context as _, Result};
use colored::Colorize;
use metacode_core::document::{Document, DocumentSummary};
use metacode_core::FileStatus;
use serde_json::json;
use std::fs;
use std::path::PathBuf;

pub fn run(file: PathBuf, json: bool, ctx: &Context) -> Result<()> {
    let source =
        fs::read_to_string(&file).with_context(|| format!("failed to read {}", file.display()))?;
    let document = Document::parse(source, &ctx.config.syntax)
        .with_context(|| format!("failed to parse {}", file.display()))?;
    let summary = document.summary();
    let status = document.status();

    if json {
        let status = match &status {
            Ok(status) => json!(status),
            Err(e) => json!({ "error": e.to_string() }),
        };
        let output = json!({
            "path": file.display().to_string(),
            "status": status,
            "tables": summary.tables,
            "macros": summary.macros,
            "invocations": summary.invocations,
            "regions": summary.regions,
        });
        print_json(&serde_json::to_string_pretty(&output)?)?;
    } else {
        render_human(&summary);
        match status {
            Ok(FileStatus::Stale) => println!("\n{} Generated code is out of date", "!".yellow()),
            Ok(FileStatus::UpToDate) => println!("\n{} Generated code is up to date", "✓".green().bold()),
            Ok(FileStatus::NoMetacode) => println!("{} No #metacode block", "!".yellow()),
            Err(e) => println!("\n{} Expansion fails: {}", "✗".red().bold(), e),
        }
    }
    Ok(())
}

fn render_human(summary: &DocumentSummary) {
    if !summary.tables.is_empty() {
        println!("{}", "Tables:".bold());
        for table in &summary.tables {
            println!(
                "  {} [{}] {} row(s) (line {})",
                table.name.cyan(),
                table.columns.join(", "),
                table.rows,
                table.line
            );
        }
    }
    if !summary.macros.is_empty() {
        println!("{}", "Macros:".bold());
        for mac in &summary.macros {
            println!("  {}({}) (line {})", mac.name.cyan(), mac.params.join(", "), mac.line);
        }
    }
    if !summary.invocations.is_empty() {
        println!("{}", "Invocations:".bold());
        for invocation in &summary.invocations {
            println!(
                "  {}({}) (line {})",
                invocation.name.cyan(),
                invocation.args.join(", "),
                invocation.line
            );
        }
    }
}

//! logmend - log-to-fix analysis CLI
//!
//! Scans a log file for known Python exception signatures, locates
//! plausible source lines in a repository checkout, and prints templated
//! fix suggestions.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use logmend_core::{summarize, Analyzer, Config, Finding, RunStatus};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "logmend")]
#[command(about = "Scan logs for known errors and suggest fixes")]
#[command(version)]
struct Args {
    /// Path to the log file to analyze
    #[arg(long)]
    log: PathBuf,

    /// Path to the repository checkout to search
    #[arg(long)]
    repo: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Print an aggregate summary instead of per-finding detail
    #[arg(long)]
    summary: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load().context("failed to load configuration")?;
    let _log_guard = logmend_core::logging::init(&config.logging).ok();

    let analyzer = Analyzer::new(config);
    let report = analyzer
        .analyze_file(&args.log, &args.repo)
        .with_context(|| format!("analysis of {} failed", args.log.display()))?;
    tracing::info!(findings = report.findings.len(), "analysis finished");

    if args.summary {
        let records: Vec<_> = report.findings.iter().map(|f| f.record.clone()).collect();
        let summary = summarize(&records);
        match args.format {
            Format::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
            Format::Text => print_summary_text(&summary),
        }
        return Ok(());
    }

    match args.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        Format::Text => print_report_text(&report.findings, report.status, &report.message),
    }

    Ok(())
}

fn print_summary_text(summary: &logmend_core::RunSummary) {
    println!("Errors found: {}", summary.total);
    for (kind, count) in &summary.by_kind {
        println!("  {:<20} {}", kind, count);
    }
    if !summary.files_affected.is_empty() {
        println!("Files affected:");
        for file in &summary.files_affected {
            println!("  {}", file);
        }
    }
}

fn print_report_text(findings: &[Finding], status: RunStatus, message: &str) {
    if findings.is_empty() {
        println!("No known errors found ({})", status);
        return;
    }

    for (i, finding) in findings.iter().enumerate() {
        println!("--- finding {} ---", i + 1);
        println!("error:      {}: {}", finding.record.kind, finding.record.message);
        match &finding.location {
            Some(loc) => {
                let function = loc
                    .enclosing_function
                    .as_deref()
                    .map(|f| format!(" (in {})", f))
                    .unwrap_or_default();
                println!(
                    "location:   {}:{}{}",
                    loc.file_path.display(),
                    loc.line_number,
                    function
                );
            }
            None => println!("location:   not found in repository"),
        }
        println!("suggestion: {}", finding.fix.description);
        println!("confidence: {:.2}", finding.fix.confidence);
        println!("original:   {}", finding.fix.original_code);
        println!("fixed:");
        for line in finding.fix.fixed_code.lines() {
            println!("    {}", line);
        }
        println!("note:       {}", finding.fix.explanation);
        println!();
    }

    println!("{}", message);
}

//! CLI entry point for the data cleaning and insight pipeline.

use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use data_insight::loader::{LoaderOptions, load_table};
use data_insight::{
    DataProfiler, InsightReport, InsightScorer, NameCollisionPolicy, Pipeline, PipelineConfig,
    PipelineResult, ReportGenerator, ReportParams,
};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// CLI-compatible name collision policy enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliCollisionPolicy {
    /// Rename later columns to name_2, name_3, ...
    Suffix,
    /// Stop with an error
    Fail,
}

impl From<CliCollisionPolicy> for NameCollisionPolicy {
    fn from(cli: CliCollisionPolicy) -> Self {
        match cli {
            CliCollisionPolicy::Suffix => NameCollisionPolicy::Suffix,
            CliCollisionPolicy::Fail => NameCollisionPolicy::Fail,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Automatic table cleaning and insight scoring",
    long_about = "Cleans a tabular dataset (names, sentinels, duplicates, missing values, \
                  outliers) and scores the result from 0 to 100 with explanatory findings.\n\n\
                  EXAMPLES:\n  \
                  # Clean and score, print a summary\n  \
                  data-insight -i data.csv\n\n  \
                  # Score the raw table without cleaning or writing anything\n  \
                  data-insight -i data.csv --dry-run\n\n  \
                  # Export the cleaned table and a JSON report\n  \
                  data-insight -i data.xlsx --export --emit-report -o results/\n\n  \
                  # Machine-readable output\n  \
                  data-insight -i data.csv --json | jq .quality_score"
)]
struct Args {
    /// Path to the data file (.csv, .tsv, .txt, .xlsx, .xls, .xlsm, .ods, .parquet)
    #[arg(short, long)]
    input: String,

    /// Output directory for exported files
    #[arg(short, long, default_value = "./output")]
    output: String,

    /// Custom output file name (without extension)
    ///
    /// If not specified, uses "cleaned_dataset"
    #[arg(long)]
    output_name: Option<String>,

    /// Field separator for delimited input and export
    #[arg(long, default_value = ",")]
    separator: char,

    /// What to do when two column names normalize to the same name
    #[arg(long, value_enum, default_value = "suffix")]
    on_collision: CliCollisionPolicy,

    /// Summarize and score the raw table without cleaning or writing files
    #[arg(long)]
    dry_run: bool,

    /// Write the cleaned table to the output directory
    #[arg(short, long)]
    export: bool,

    /// Write a detailed JSON report to the output directory
    ///
    /// The report will be saved as <output_name>_report.json, or
    /// <input_name>_report.json when no output name is given
    #[arg(short = 'r', long)]
    emit_report: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all progress logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Print the first N rows of the cleaned table
    #[arg(long, value_name = "N")]
    preview: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings, errors and final result)
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    let separator = u8::try_from(args.separator)
        .map_err(|_| anyhow!("Separator must be an ASCII character: {:?}", args.separator))?;

    // Report writing is handled here, not inside the pipeline
    let mut config_builder = PipelineConfig::builder()
        .output_dir(&args.output)
        .name_collision(args.on_collision.into())
        .csv_separator(separator)
        .save_to_disk(args.export && !args.dry_run)
        .export_cleaned(true)
        .generate_reports(false);

    if let Some(ref name) = args.output_name {
        config_builder = config_builder.output_name(name);
    }

    let config = config_builder.build()?;

    info!("Loading dataset from: {}", args.input);
    let data = load_table(&args.input, &LoaderOptions::from(&config))?;
    info!("Dataset loaded successfully: {:?}", data.shape());

    if args.dry_run {
        return run_dry_run(&args, &data);
    }

    let pipeline = Pipeline::builder()
        .config(config)
        .input_name(&args.input)
        .build()?;

    match pipeline.process(&data) {
        Ok(result) => handle_pipeline_output(&result, &args),
        Err(e) => {
            error!("Pipeline failed: {}", e);
            Err(anyhow!("Pipeline failed: {}", e))
        }
    }
}

/// Run dry-run mode: summary and score of the raw table, no writes.
///
/// Uses `println!` for user-facing output so it shows at any log level.
fn run_dry_run(args: &Args, data: &DataFrame) -> Result<()> {
    let summary = DataProfiler::summarize(data)?;
    let score = InsightScorer::score(data)?;

    if args.json {
        let value = serde_json::json!({
            "input_file": args.input,
            "summary": summary,
            "quality_score": score.score,
            "findings": score.findings,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("\n{}", "=".repeat(80));
    println!("DRY RUN - Raw table, nothing cleaned or written");
    println!("{}\n", "=".repeat(80));

    println!("DATASET OVERVIEW");
    println!("{}", "-".repeat(40));
    println!("  File: {}", args.input);
    println!("  Rows: {}", summary.rows);
    println!("  Columns: {}", summary.columns);
    println!("  Duplicate rows: {}", summary.duplicate_count);
    println!("  Missing cells: {}", summary.total_missing());
    println!();

    println!("COLUMNS");
    println!("{}", "-".repeat(40));
    for col in &summary.column_summaries {
        println!(
            "  {:<30} {:<8} {} missing",
            truncate_str(&col.name, 30),
            col.kind.as_str(),
            col.missing_count
        );
    }
    println!();

    println!("RAW QUALITY SCORE: {}/100", score.score);
    for finding in &score.findings {
        println!("  - {}", finding.message);
    }

    if let Some(n) = args.preview {
        println!("\n{}", data.head(Some(n)));
    }

    println!("{}", "=".repeat(80));
    Ok(())
}

fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

/// Handle pipeline output based on CLI flags.
///
/// Output behavior:
/// - Default: Print human-readable summary to stdout
/// - `--json`: Print JSON to stdout only (no logs)
/// - `--emit-report`: Write JSON report to file (also with `--json`)
fn handle_pipeline_output(result: &PipelineResult, args: &Args) -> Result<()> {
    // Only the cleaned table is written by the pipeline here
    let output_file = result.written_files.first();

    let report = ReportGenerator::build_report(ReportParams {
        input_name: &args.input,
        output_file: output_file.map(PathBuf::as_path),
        cleaned: &result.cleaned,
        original_summary: &result.original_summary,
        cleaned_summary: &result.cleaned_summary,
        score: &result.score,
        cleaning_actions: &result.cleaning_actions,
        duration_ms: result.duration_ms,
    })?;

    if args.emit_report {
        let report_path =
            report_writer(args).write_report_to_file(&report, &extract_file_stem(&args.input))?;
        info!("Report written to: {}", report_path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_human_readable_summary(&report, result, args);
    Ok(())
}

/// Report writer honoring `--output` and `--output-name`.
fn report_writer(args: &Args) -> ReportGenerator {
    ReportGenerator::new(PathBuf::from(&args.output), args.output_name.clone())
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}

/// Print a human-readable summary of the run.
fn print_human_readable_summary(report: &InsightReport, result: &PipelineResult, args: &Args) {
    let before = &report.original_summary;
    let after = &report.cleaned_summary;

    println!();
    println!("{}", "=".repeat(80));
    println!("CLEANING COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    println!(
        "Input:  {} ({} rows x {} columns)",
        report.input_name, before.total_rows, before.total_columns
    );
    match report.output_file {
        Some(ref output_file) => println!(
            "Output: {} ({} rows x {} columns)",
            output_file, after.total_rows, after.total_columns
        ),
        None => println!(
            "Output: not written ({} rows x {} columns, use --export to save)",
            after.total_rows, after.total_columns
        ),
    }
    println!();

    println!("Processing Summary:");
    println!("  Duration: {}ms", report.duration_ms);
    println!(
        "  Rows: {} -> {} ({} removed)",
        before.total_rows,
        after.total_rows,
        before.total_rows.saturating_sub(after.total_rows)
    );
    println!(
        "  Columns: {} -> {} ({} removed)",
        before.total_columns,
        after.total_columns,
        before.total_columns.saturating_sub(after.total_columns)
    );
    println!(
        "  Missing cells: {} -> {}",
        before.missing_cells, after.missing_cells
    );
    println!();

    if !report.missing_values.is_empty() {
        println!("Missing Values (raw table):");
        for row in &report.missing_values {
            println!(
                "  {:<30} {:>6} ({:.1}%)",
                truncate_str(&row.column, 30),
                row.missing_count,
                row.missing_percent
            );
        }
        println!();
    }

    if !report.cleaning_actions.is_empty() {
        println!("Actions Taken:");
        for action in report.cleaning_actions.iter().take(10) {
            println!("  - {}", action);
        }
        if report.cleaning_actions.len() > 10 {
            println!(
                "  ... and {} more actions",
                report.cleaning_actions.len() - 10
            );
        }
        println!();
    }

    println!("Quality Score: {}/100", report.quality_score);
    if report.findings.is_empty() {
        println!("  No issues detected.");
    }
    for finding in &report.findings {
        println!("  ! {}", finding.message);
    }
    println!();

    if let Some(n) = args.preview {
        println!("Preview:");
        println!("{}", result.cleaned.head(Some(n)));
        println!();
    }

    println!("Use --json for machine-readable output");
    println!("Use --emit-report to save detailed JSON report");
    println!("{}", "=".repeat(80));
}

use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use perseus_report::analysis::regulation_counts;
use perseus_report::output::{OutputFormat, ReportWriter};
use perseus_report::pipeline::Pipeline;

use super::RunArgs;

/// Reconcile an export and write every report table
pub fn run(args: RunArgs, output: PathBuf, format: Option<OutputFormat>) -> Result<()> {
    let (config, naming, pipeline_config) = args.resolve()?;

    let mut output_config = config.output.clone();
    if let Some(format) = format {
        output_config.format = format;
    }

    info!("perseus-report");
    info!("==============");
    info!("Input:  {}", args.input.display());
    info!("Output: {}", output.display());
    info!("Run:    {} / {}", naming.researcher, naming.work_order);

    let pipeline = Pipeline::new(naming.clone(), pipeline_config);
    let tables = pipeline
        .run_file(&args.input)
        .with_context(|| format!("Failed to reconcile {}", args.input.display()))?;

    let analysis = pipeline.config().analysis;
    let writer = ReportWriter::new(
        &output,
        output_config,
        naming,
        args.input.display().to_string(),
    );
    let stats = writer
        .write(&tables, &analysis)
        .with_context(|| format!("Failed to write report tables to {}", output.display()))?;

    println!("Proteins:        {}", tables.protein_count);
    println!("Samples:         {}", tables.samples.samples().len());
    println!("Groups:          {}", tables.metadata.groups().len());
    println!("Sample rows:     {}", tables.samples.len());
    println!("Group rows:      {}", tables.groups.len());
    println!("Comparison rows: {}", tables.comparisons.len());
    if tables.dropped_rows > 0 {
        println!("Dropped rows:    {}", tables.dropped_rows);
    }
    for (comparison, counts) in regulation_counts(&tables.comparisons, &analysis) {
        println!(
            "  {}: {} up, {} down, {} unchanged",
            comparison, counts.up, counts.down, counts.unchanged
        );
    }
    for warning in tables.mismatches.warnings() {
        println!("Warning: {}", warning);
    }
    print!("{}", stats);

    Ok(())
}

use anyhow::{Context, Result};
use std::path::Path;

use perseus_report::export::{AnnotationField, BlockKind, ColumnKind, ExportLayout, RawExport};
use perseus_report::metadata::build_metadata;
use perseus_report::pipeline::Pipeline;

use super::RunArgs;

fn kind_label(kind: ColumnKind) -> String {
    match kind {
        ColumnKind::Annotation(AnnotationField::Accession) => "accession".to_string(),
        ColumnKind::Annotation(AnnotationField::Gene) => "gene".to_string(),
        ColumnKind::Annotation(AnnotationField::ProteinName) => "protein name".to_string(),
        ColumnKind::Measurement(block) => block.to_string(),
        ColumnKind::Ignored => "ignored".to_string(),
    }
}

/// Print the column layout of an export
pub fn run(args: RunArgs, json: bool) -> Result<()> {
    let (_, naming, pipeline_config) = args.resolve()?;
    let pipeline = Pipeline::new(naming, pipeline_config);

    let raw = RawExport::from_tsv_file(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let layout = pipeline
        .describe(&raw)
        .context("Failed to classify export columns")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&layout)?);
        return Ok(());
    }

    print_layout(&args.input, &raw, &layout);

    match build_metadata(&raw) {
        Ok(metadata) => {
            println!();
            println!("Sample Metadata:");
            for group in metadata.groups() {
                let members: Vec<&str> = metadata
                    .entries()
                    .iter()
                    .filter(|e| e.group == group)
                    .map(|e| e.sample.as_str())
                    .collect();
                println!("  {:<20} {}", group, members.join(", "));
            }
        }
        Err(e) => println!("\nSample Metadata: unavailable ({})", e),
    }

    Ok(())
}

fn print_layout(path: &Path, raw: &RawExport, layout: &ExportLayout) {
    println!("Perseus Export: {}", path.display());
    println!("=================================================");
    println!("Proteins: {}", raw.protein_count());
    println!("Columns:  {}", raw.column_count());
    println!();

    println!("Blocks:");
    for block in BlockKind::ALL {
        println!("  {:<14} {:>5}", block.to_string(), layout.block_len(block));
    }
    println!();

    println!("{:>5}  {:<14} {:<24} Column", "#", "Kind", "Identifier");
    for column in layout.columns() {
        println!(
            "{:>5}  {:<14} {:<24} {}",
            column.index,
            kind_label(column.kind),
            column.key.as_deref().unwrap_or("-"),
            column.name
        );
    }
}

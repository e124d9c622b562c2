use anyhow::Result;
use log::info;

use perseus_report::export::RawExport;
use perseus_report::metadata::build_metadata;
use perseus_report::pipeline::Pipeline;
use perseus_report::reconcile::{find_mismatches, ReconciliationReport};

use super::RunArgs;

/// Check that every block of an export lines up
pub fn run(args: RunArgs) -> Result<()> {
    let (_, naming, pipeline_config) = args.resolve()?;
    let pipeline = Pipeline::new(naming, pipeline_config);

    info!("perseus-report Validator");
    info!("========================");
    info!("File: {}", args.input.display());
    info!("");

    let report = RawExport::from_tsv_file(&args.input).and_then(|raw| {
        let layout = pipeline.describe(&raw)?;
        let metadata = build_metadata(&raw)?;
        Ok(find_mismatches(&layout, &metadata).to_report(
            args.input.display().to_string(),
            pipeline.config().reconciliation.unmatched_samples,
        ))
    });

    match report {
        Ok(report) => {
            print_report(&report);

            // Exit with error code if validation failed
            if report.has_failures() {
                std::process::exit(1);
            }

            Ok(())
        }
        Err(e) => {
            eprintln!("Validation error: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_report(report: &ReconciliationReport) {
    #[cfg(feature = "colorized_output")]
    {
        println!("{}", report.format_colored());
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        println!("{}", report);
    }
}

use std::path::PathBuf;

use anyhow::Context;
use colored::Colorize;

use crate::cli::open_ledger;
use crate::importer::ImportPipeline;
use crate::parser::StatementFile;
use crate::settings::load_settings;

pub fn run(file: &str, source: Option<&str>) -> anyhow::Result<()> {
    let file_path = PathBuf::from(file);
    let settings = load_settings();
    let conn = open_ledger(&settings)?;

    let pipeline = ImportPipeline::from_settings(&conn, &settings)
        .context("run `bankimport init --credit-account <name>` first")?;
    let statement = StatementFile::open(&file_path)
        .with_context(|| format!("reading statement {}", file_path.display()))?;
    let source_reference = source.map(str::to_string).unwrap_or_else(|| file.to_string());

    println!("Booking credits against: {}", pipeline.credit_account().name);
    let result = pipeline.import_file(&conn, &statement, &source_reference)?;

    println!(
        "{} transactions, {} credits: {} booked, {} skipped (already imported)",
        result.seen, result.credits, result.booked, result.duplicates
    );
    if !result.failures.is_empty() {
        println!("{}", format!("{} failed:", result.failures.len()).red().bold());
        for failure in &result.failures {
            println!("  row {}: {}", failure.nr, failure.error);
        }
        anyhow::bail!("{} credits could not be booked", result.failures.len());
    }
    Ok(())
}

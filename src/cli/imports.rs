use comfy_table::{Cell, Table};

use crate::cli::open_ledger;
use crate::db::list_imports;
use crate::settings::load_settings;

pub fn run() -> anyhow::Result<()> {
    let conn = open_ledger(&load_settings())?;
    let imports = list_imports(&conn)?;
    if imports.is_empty() {
        println!("No imports yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "File", "Content", "Period", "Seen", "Booked", "Skipped", "Failed"]);
    for record in imports {
        let period = match (&record.date_range_start, &record.date_range_end) {
            (Some(start), Some(end)) => format!("{start} .. {end}"),
            _ => String::new(),
        };
        table.add_row(vec![
            Cell::new(record.id),
            Cell::new(&record.import_date),
            Cell::new(&record.filename),
            Cell::new(record.file_id.get(..12).unwrap_or(record.file_id.as_str())),
            Cell::new(period),
            Cell::new(record.seen),
            Cell::new(record.booked),
            Cell::new(record.duplicates),
            Cell::new(record.failures),
        ]);
    }
    println!("Imports\n{table}");
    Ok(())
}

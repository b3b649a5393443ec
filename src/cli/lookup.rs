use comfy_table::{Cell, Table};

use crate::cli::open_ledger;
use crate::db::find_by_correlation;
use crate::fingerprint::correlation_id_for;
use crate::settings::load_settings;

pub fn run(iban: &str, bic: &str) -> anyhow::Result<()> {
    let conn = open_ledger(&load_settings())?;
    let id = correlation_id_for(iban, bic);
    println!("Fingerprint: {id}");

    let booked = find_by_correlation(&conn, &id)?;
    if booked.is_empty() {
        println!("No booked credits from this counterparty.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Name", "Memo", "Amount"]);
    for tx in &booked {
        table.add_row(vec![
            Cell::new(tx.id),
            Cell::new(&tx.booking_date),
            Cell::new(&tx.metadata.counterparty_name),
            Cell::new(&tx.metadata.memo),
            Cell::new(format!("{:.2}", tx.amount)),
        ]);
    }
    let total: rust_decimal::Decimal = booked.iter().map(|tx| tx.amount).sum();
    println!("{table}\n{} credits, total {total:.2}", booked.len());
    Ok(())
}

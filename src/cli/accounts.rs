use comfy_table::{Cell, Table};

use crate::cli::open_ledger;
use crate::db::{add_account, list_accounts};
use crate::settings::load_settings;

pub fn add(name: &str, account_type: &str) -> anyhow::Result<()> {
    let conn = open_ledger(&load_settings())?;
    add_account(&conn, name, account_type)?;
    println!("Added account: {name}");
    Ok(())
}

pub fn list() -> anyhow::Result<()> {
    let settings = load_settings();
    let conn = open_ledger(&settings)?;
    let credit = settings.credit_account.unwrap_or_default();

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Type", ""]);
    for account in list_accounts(&conn)? {
        let marker = if account.name == credit { "credit account" } else { "" };
        table.add_row(vec![
            Cell::new(account.id),
            Cell::new(&account.name),
            Cell::new(&account.account_type),
            Cell::new(marker),
        ]);
    }
    println!("Accounts\n{table}");
    Ok(())
}

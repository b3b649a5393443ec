use crate::cli::open_ledger;
use crate::settings::load_settings;

pub fn run() -> anyhow::Result<()> {
    let settings = load_settings();
    let db_path = settings.db_path();

    println!("Data dir:        {}", settings.data_dir);
    println!("Database:        {}", db_path.display());
    println!(
        "Credit account:  {}",
        settings.credit_account.as_deref().unwrap_or("(not set)")
    );
    println!("Importer tag:    {}", settings.importer_tag);

    if db_path.exists() {
        let conn = open_ledger(&settings)?;
        let accounts: i64 = conn.query_row("SELECT count(*) FROM accounts", [], |r| r.get(0))?;
        let transactions: i64 =
            conn.query_row("SELECT count(*) FROM transactions", [], |r| r.get(0))?;
        let imports: i64 = conn.query_row("SELECT count(*) FROM imports", [], |r| r.get(0))?;

        println!();
        println!("Accounts:      {accounts}");
        println!("Transactions:  {transactions}");
        println!("Imports:       {imports}");
    } else {
        println!();
        println!("Database not found. Run `bankimport init` to set up.");
    }

    Ok(())
}

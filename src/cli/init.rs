use std::path::PathBuf;

use crate::cli::open_ledger;
use crate::db::{add_account, get_account};
use crate::settings::{load_settings, save_settings, shellexpand_path};

pub fn run(data_dir: Option<String>, credit_account: Option<String>) -> anyhow::Result<()> {
    let mut settings = load_settings();
    if let Some(dir) = data_dir {
        settings.data_dir = shellexpand_path(&dir);
    }
    if let Some(name) = credit_account {
        settings.credit_account = Some(name);
    }

    let resolved = PathBuf::from(&settings.data_dir);
    std::fs::create_dir_all(&resolved)?;
    let conn = open_ledger(&settings)?;

    if let Some(name) = settings.credit_account.as_deref() {
        if get_account(&conn, name)?.is_none() {
            add_account(&conn, name, "income")?;
            println!("Added credit account: {name}");
        }
    }

    save_settings(&settings)?;
    println!("Initialized bankimport at {}", resolved.display());
    Ok(())
}

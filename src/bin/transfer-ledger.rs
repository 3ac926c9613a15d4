use std::fs::File;

use anyhow::{Context, Result};
use transfer_ledger::bin_utils::Service;
use transfer_ledger::service::TransferError;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let accounts_path = args
        .next()
        .context("Expected the accounts file as the first argument")?;
    let transfers_path = args
        .next()
        .context("Expected the transfers file as the second argument")?;
    let accounts = File::open(&accounts_path)
        .with_context(|| format!("Failed to open `{accounts_path}`"))?;
    let transfers = File::open(&transfers_path)
        .with_context(|| format!("Failed to open `{transfers_path}`"))?;

    let service = Service {
        accounts,
        transfers,
        output: &mut std::io::stdout(),
        error_printer: Box::new(|line, err| match err {
            // business rejections keep the batch going but are still reported
            err @ (TransferError::Account(_) | TransferError::Request(_)) => {
                eprintln!("Transfer rejected at line {line}: {err}")
            }
            err => eprintln!("Error at line {line}: {err}"),
        }),
    };
    service.run()
}

use std::io::Write;

use csv::Writer;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::account::AccountId;

#[derive(Debug, Serialize)]
pub struct AccountStatement {
    pub id: Option<AccountId>,
    pub owner: String,
    pub balance: Decimal,
}

pub fn print_statement<W>(
    output: &mut W,
    accounts: impl Iterator<Item = AccountStatement>,
) -> anyhow::Result<()>
where
    W: Write,
{
    let mut writer = Writer::from_writer(output);
    for account in accounts {
        if let Err(err) = writer.serialize(account) {
            anyhow::bail!("Failed to write to CSV: {err}")
        }
    }
    // Ensure all data is flushed to the output
    if let Err(err) = writer.flush() {
        anyhow::bail!("Failed to flush CSV writer: {err}")
    }
    Ok(())
}

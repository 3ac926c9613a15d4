//! Bootstrap for the binary. Kept in the library so the integration test can
//! drive the full stack over in-memory readers and writers.

use std::io::{Read, Write};

use anyhow::Result;

use crate::account::Account;
use crate::bank::Bank;
use crate::repository::in_memory::{InMemoryAccountRepository, InMemoryBankRepository};
use crate::request::TransferRequest;
use crate::service::{TransferError, TransferService};
use csv_parser::{AccountRow, CsvRowParser, TransferRow};
use csv_printer::{AccountStatement, print_statement};

pub mod csv_parser;
pub mod csv_printer;

/// Name of the bank every batch run is booked against.
pub const BATCH_BANK_NAME: &str = "State Bank";

pub struct Service<'w, A, T, W: 'w> {
    pub accounts: A,
    pub transfers: T,
    pub output: &'w mut W,
    pub error_printer: Box<dyn FnMut(u64, TransferError)>,
}

impl<'w, A, T, W> Service<'w, A, T, W>
where
    A: Read,
    T: Read,
    W: Write + 'w,
{
    /// Seeds one bank and the accounts into in-memory stores, runs every
    /// transfer row through the use-case, then prints the final statement.
    /// Failed transfers are reported through `error_printer` with their
    /// input line number and do not stop the batch.
    pub fn run(mut self) -> Result<()> {
        let mut service = TransferService::new(
            InMemoryAccountRepository::default(),
            InMemoryBankRepository::default(),
        );
        let bank = service.register_bank(Bank::new(BATCH_BANK_NAME))?;
        let bank_id = bank.id();

        for (_, row) in CsvRowParser::<_, AccountRow>::new(self.accounts) {
            service.register_account(Account::new(row.owner, row.balance))?;
        }

        for (line, row) in CsvRowParser::<_, TransferRow>::new(self.transfers) {
            let request = TransferRequest {
                source_account_id: row.source,
                destination_account_id: row.destination,
                amount: row.amount,
                bank_id,
            };
            if let Err(err) = service.transfer(&request) {
                (self.error_printer)(line, err);
            }
        }

        print_statement(
            self.output,
            service.list_accounts()?.iter().map(|acc| AccountStatement {
                id: acc.id(),
                owner: acc.owner().to_string(),
                balance: acc.balance(),
            }),
        )
    }
}

use std::io::Read;

use csv::{DeserializeRecordsIntoIter, Trim};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::account::AccountId;

/// Seed row: one account to register before the transfers run. Ids are
/// assigned by the store in row order, starting at 1.
#[derive(Debug, Deserialize)]
pub struct AccountRow {
    pub owner: String,
    pub balance: Decimal,
}

/// One transfer order, referring to accounts by their assigned ids.
#[derive(Debug, Deserialize)]
pub struct TransferRow {
    pub source: AccountId,
    pub destination: AccountId,
    pub amount: Decimal,
}

/// Line-numbered CSV record iterator over any deserializable row type.
///
/// # Panics
///
/// If a record cannot be parsed
pub struct CsvRowParser<R, T> {
    iter: DeserializeRecordsIntoIter<R, T>,
}

impl<R, T> CsvRowParser<R, T>
where
    R: Read,
    T: DeserializeOwned,
{
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(source);

        Self {
            iter: reader.into_deserialize(),
        }
    }
}

impl<R, T> Iterator for CsvRowParser<R, T>
where
    R: Read,
    T: DeserializeOwned,
{
    type Item = (u64, T);

    fn next(&mut self) -> Option<Self::Item> {
        let curr_line = self.iter.reader().position().line();
        self.iter.next().map(|row| (curr_line, row.unwrap()))
    }
}

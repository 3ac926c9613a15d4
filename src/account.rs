use rust_decimal::{Decimal, prelude::Zero};
use thiserror::Error;

use crate::bank::BankRef;

pub type AccountId = u64;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Insufficient funds")]
    InsufficientFunds,
    #[error("Amount must be positive, got {amount}")]
    NonPositiveAmount { amount: Decimal },
}

/// A named balance holder. The id is assigned by the persistence layer on
/// first save; `version` is the optimistic-concurrency token the repository
/// bumps on every successful update.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    id: Option<AccountId>,
    owner: String,
    balance: Decimal,
    bank: Option<BankRef>,
    version: u64,
}

impl Account {
    pub fn new(owner: impl Into<String>, balance: Decimal) -> Self {
        Self {
            id: None,
            owner: owner.into(),
            balance,
            bank: None,
            version: 0,
        }
    }

    pub fn id(&self) -> Option<AccountId> {
        self.id
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Non-owning reference to the bank this account is registered with.
    pub fn bank(&self) -> Option<&BankRef> {
        self.bank.as_ref()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub(crate) fn set_id(&mut self, id: AccountId) {
        self.id = Some(id);
    }

    pub(crate) fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    pub(crate) fn set_bank(&mut self, bank: BankRef) {
        self.bank = Some(bank);
    }

    /// Decreases the balance by `amount`. The balance is left untouched when
    /// the sufficiency check fails, so a rejected debit never mutates the
    /// account.
    pub fn debit(&mut self, amount: Decimal) -> Result<(), AccountError> {
        if amount <= Decimal::zero() {
            return Err(AccountError::NonPositiveAmount { amount });
        }
        if amount > self.balance {
            return Err(AccountError::InsufficientFunds);
        }
        self.balance -= amount;
        Ok(())
    }

    /// Increases the balance by `amount`. Never fails for a positive amount.
    pub fn credit(&mut self, amount: Decimal) -> Result<(), AccountError> {
        if amount <= Decimal::zero() {
            return Err(AccountError::NonPositiveAmount { amount });
        }
        self.balance += amount;
        Ok(())
    }
}

use std::collections::BTreeMap;

use crate::account::{Account, AccountId};
use crate::bank::{Bank, BankId};

use super::{AccountRepository, BankRepository, RepositoryError};

/// In-memory account store. Ids are assigned sequentially from 1; the
/// ordered map keeps `find_all` deterministic.
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    accounts: BTreeMap<AccountId, Account>,
    next_id: AccountId,
}

impl AccountRepository for InMemoryAccountRepository {
    fn find_all(&self) -> Result<Vec<Account>, RepositoryError> {
        Ok(self.accounts.values().cloned().collect())
    }

    fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
        Ok(self.accounts.get(&id).cloned())
    }

    fn save(&mut self, mut account: Account) -> Result<Account, RepositoryError> {
        let id = match account.id() {
            Some(id) => id,
            None => {
                self.next_id += 1;
                account.set_id(self.next_id);
                self.next_id
            }
        };
        self.accounts.insert(id, account.clone());
        Ok(account)
    }

    fn update(&mut self, account: &Account) -> Result<Account, RepositoryError> {
        let id = account.id().ok_or(RepositoryError::Unsaved)?;
        let stored = self
            .accounts
            .get_mut(&id)
            .ok_or(RepositoryError::UnknownRecord { id })?;
        if stored.version() != account.version() {
            return Err(RepositoryError::VersionConflict {
                id,
                expected: account.version(),
                actual: stored.version(),
            });
        }
        let mut updated = account.clone();
        updated.set_version(account.version() + 1);
        *stored = updated.clone();
        Ok(updated)
    }
}

/// In-memory bank store. Same id assignment as the account store; updates
/// are last-write-wins.
#[derive(Debug, Default)]
pub struct InMemoryBankRepository {
    banks: BTreeMap<BankId, Bank>,
    next_id: BankId,
}

impl BankRepository for InMemoryBankRepository {
    fn find_all(&self) -> Result<Vec<Bank>, RepositoryError> {
        Ok(self.banks.values().cloned().collect())
    }

    fn find_by_id(&self, id: BankId) -> Result<Option<Bank>, RepositoryError> {
        Ok(self.banks.get(&id).cloned())
    }

    fn save(&mut self, mut bank: Bank) -> Result<Bank, RepositoryError> {
        let id = match bank.id() {
            Some(id) => id,
            None => {
                self.next_id += 1;
                bank.set_id(self.next_id);
                self.next_id
            }
        };
        self.banks.insert(id, bank.clone());
        Ok(bank)
    }

    fn update(&mut self, bank: &Bank) -> Result<Bank, RepositoryError> {
        let id = bank.id().ok_or(RepositoryError::Unsaved)?;
        let stored = self
            .banks
            .get_mut(&id)
            .ok_or(RepositoryError::UnknownRecord { id })?;
        *stored = bank.clone();
        Ok(bank.clone())
    }
}

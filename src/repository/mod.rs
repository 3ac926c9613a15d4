use thiserror::Error;

use crate::account::{Account, AccountId};
use crate::bank::{Bank, BankId};

pub mod in_memory;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Record has not been saved yet")]
    Unsaved,
    #[error("Record {id} does not exist in the store")]
    UnknownRecord { id: u64 },
    #[error("Record {id} was modified concurrently: expected version {expected}, store has {actual}")]
    VersionConflict { id: u64, expected: u64, actual: u64 },
    #[error("Storage backend failure: {0}")]
    Backend(String),
}

/// Persistence contract for accounts. Implemented in-crate by the in-memory
/// store; any other backing store can be injected through the same trait.
///
/// `update` takes the caller's copy, verifies its version against the store
/// and returns the stored copy with the bumped version. A stale copy fails
/// with [`RepositoryError::VersionConflict`].
pub trait AccountRepository {
    fn find_all(&self) -> Result<Vec<Account>, RepositoryError>;

    fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, RepositoryError>;

    /// Persists a new account, assigning an id when it has none, and
    /// returns the stored copy.
    fn save(&mut self, account: Account) -> Result<Account, RepositoryError>;

    fn update(&mut self, account: &Account) -> Result<Account, RepositoryError>;
}

/// Persistence contract for banks. Bank updates are last-write-wins: the
/// only mutable bank state is the advisory transfer counter, so no version
/// token is carried.
pub trait BankRepository {
    fn find_all(&self) -> Result<Vec<Bank>, RepositoryError>;

    fn find_by_id(&self, id: BankId) -> Result<Option<Bank>, RepositoryError>;

    fn save(&mut self, bank: Bank) -> Result<Bank, RepositoryError>;

    fn update(&mut self, bank: &Bank) -> Result<Bank, RepositoryError>;
}

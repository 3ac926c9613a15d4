use thiserror::Error;
use tracing::{debug, warn};

use crate::account::{Account, AccountError, AccountId};
use crate::bank::{Bank, BankId};
use crate::repository::{AccountRepository, BankRepository, RepositoryError};
use crate::request::{RequestError, TransferReceipt, TransferRequest};

#[derive(Debug, Error)]
pub enum TransferError {
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error(transparent)]
    Account(#[from] AccountError),
    #[error("Account {0} was not found")]
    AccountNotFound(AccountId),
    #[error("Bank {0} was not found")]
    BankNotFound(BankId),
    #[error(transparent)]
    Persistence(#[from] RepositoryError),
    #[error("Transfer persisted partially ({transfer}) and compensation failed ({compensation})")]
    CompensationFailed {
        transfer: RepositoryError,
        compensation: RepositoryError,
    },
}

/// Transfer use-case. Owns its repository collaborators; variant
/// implementations (in-memory store, real store) are injected at
/// construction.
pub struct TransferService<A, B> {
    accounts: A,
    banks: B,
}

impl<A, B> TransferService<A, B>
where
    A: AccountRepository,
    B: BankRepository,
{
    pub fn new(accounts: A, banks: B) -> Self {
        Self { accounts, banks }
    }

    /// Executes one transfer: validate the request, resolve the parties,
    /// debit and credit in memory, persist source then destination in the
    /// same order, and return the receipt.
    ///
    /// If the destination update fails after the source has been persisted,
    /// the source debit is compensated (re-credited and persisted again);
    /// when that also fails the error carries both causes. A bank update
    /// failure after both accounts persisted propagates uncompensated, the
    /// transfer counter being bookkeeping rather than funds movement.
    pub fn transfer(
        &mut self,
        request: &TransferRequest,
    ) -> Result<TransferReceipt, TransferError> {
        request.validate()?;
        debug!(
            source = request.source_account_id,
            destination = request.destination_account_id,
            amount = %request.amount,
            "processing transfer"
        );

        let mut source = self
            .accounts
            .find_by_id(request.source_account_id)?
            .ok_or(TransferError::AccountNotFound(request.source_account_id))?;
        let mut destination = self
            .accounts
            .find_by_id(request.destination_account_id)?
            .ok_or(TransferError::AccountNotFound(
                request.destination_account_id,
            ))?;
        let mut bank = match request.bank_id {
            Some(id) => Some(
                self.banks
                    .find_by_id(id)?
                    .ok_or(TransferError::BankNotFound(id))?,
            ),
            None => None,
        };

        match bank.as_mut() {
            Some(bank) => bank.transfer(&mut source, &mut destination, request.amount)?,
            None => {
                source.debit(request.amount)?;
                destination.credit(request.amount)?;
            }
        }

        let source = self.accounts.update(&source)?;
        if let Err(transfer_err) = self.accounts.update(&destination) {
            warn!(
                source = request.source_account_id,
                destination = request.destination_account_id,
                error = %transfer_err,
                "destination update failed, re-crediting the source"
            );
            let mut rollback = source;
            rollback.credit(request.amount)?;
            return match self.accounts.update(&rollback) {
                Ok(_) => Err(TransferError::Persistence(transfer_err)),
                Err(compensation) => Err(TransferError::CompensationFailed {
                    transfer: transfer_err,
                    compensation,
                }),
            };
        }
        if let Some(bank) = bank {
            self.banks.update(&bank)?;
        }

        debug!(
            source = request.source_account_id,
            destination = request.destination_account_id,
            "transfer completed"
        );
        Ok(TransferReceipt::completed(request))
    }

    /// Pass-through read of every persisted account.
    pub fn list_accounts(&self) -> Result<Vec<Account>, TransferError> {
        Ok(self.accounts.find_all()?)
    }

    /// Pass-through read of one account; a miss is a domain error here, not
    /// at the repository seam.
    pub fn account_detail(&self, id: AccountId) -> Result<Account, TransferError> {
        self.accounts
            .find_by_id(id)?
            .ok_or(TransferError::AccountNotFound(id))
    }

    pub fn list_banks(&self) -> Result<Vec<Bank>, TransferError> {
        Ok(self.banks.find_all()?)
    }

    pub fn bank_detail(&self, id: BankId) -> Result<Bank, TransferError> {
        self.banks
            .find_by_id(id)?
            .ok_or(TransferError::BankNotFound(id))
    }

    pub fn register_account(&mut self, account: Account) -> Result<Account, TransferError> {
        Ok(self.accounts.save(account)?)
    }

    pub fn register_bank(&mut self, bank: Bank) -> Result<Bank, TransferError> {
        Ok(self.banks.save(bank)?)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::repository::in_memory::{InMemoryAccountRepository, InMemoryBankRepository};

    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn seeded_service() -> TransferService<InMemoryAccountRepository, InMemoryBankRepository> {
        let mut service = TransferService::new(
            InMemoryAccountRepository::default(),
            InMemoryBankRepository::default(),
        );
        service.register_bank(Bank::new("State Bank")).unwrap();
        service
            .register_account(Account::new("Andres", dec("1000.00")))
            .unwrap();
        service
            .register_account(Account::new("John", dec("2000.00")))
            .unwrap();
        service
    }

    fn request(amount: &str) -> TransferRequest {
        TransferRequest {
            source_account_id: 1,
            destination_account_id: 2,
            amount: amount.parse().unwrap(),
            bank_id: Some(1),
        }
    }

    #[test]
    fn transfer_returns_a_success_receipt_and_persists_both_sides() {
        let mut service = seeded_service();
        let receipt = service.transfer(&request("100.00")).unwrap();

        assert_eq!(receipt.status, TransferReceipt::COMPLETED);
        assert_eq!(receipt.amount, dec("100.00"));
        assert_eq!(receipt.source_account_id, 1);
        assert_eq!(receipt.destination_account_id, 2);
        assert_eq!(receipt.bank_id, Some(1));

        assert_eq!(service.account_detail(1).unwrap().balance(), dec("900.00"));
        assert_eq!(service.account_detail(2).unwrap().balance(), dec("2100.00"));
        assert_eq!(service.bank_detail(1).unwrap().total_transfers(), 1);
    }

    #[test]
    fn transfer_without_a_bank_pairs_debit_and_credit_directly() {
        let mut service = seeded_service();
        let mut req = request("100.00");
        req.bank_id = None;
        let receipt = service.transfer(&req).unwrap();
        assert_eq!(receipt.bank_id, None);
        assert_eq!(service.account_detail(1).unwrap().balance(), dec("900.00"));
        assert_eq!(service.bank_detail(1).unwrap().total_transfers(), 0);
    }

    #[test]
    fn missing_source_account_is_reported() {
        let mut service = seeded_service();
        let mut req = request("100.00");
        req.source_account_id = 7;
        let err = service.transfer(&req).unwrap_err();
        assert!(matches!(err, TransferError::AccountNotFound(7)));
        assert_eq!(err.to_string(), "Account 7 was not found");
    }

    #[test]
    fn missing_destination_leaves_the_source_untouched() {
        let mut service = seeded_service();
        let mut req = request("100.00");
        req.destination_account_id = 7;
        let err = service.transfer(&req).unwrap_err();
        assert!(matches!(err, TransferError::AccountNotFound(7)));
        assert_eq!(service.account_detail(1).unwrap().balance(), dec("1000.00"));
    }

    #[test]
    fn missing_bank_is_reported() {
        let mut service = seeded_service();
        let mut req = request("100.00");
        req.bank_id = Some(9);
        let err = service.transfer(&req).unwrap_err();
        assert!(matches!(err, TransferError::BankNotFound(9)));
    }

    #[test]
    fn insufficient_funds_persists_nothing() {
        let mut service = seeded_service();
        let err = service.transfer(&request("5000.00")).unwrap_err();
        assert!(matches!(
            err,
            TransferError::Account(AccountError::InsufficientFunds)
        ));
        assert_eq!(service.account_detail(1).unwrap().balance(), dec("1000.00"));
        assert_eq!(service.account_detail(2).unwrap().balance(), dec("2000.00"));
        assert_eq!(service.bank_detail(1).unwrap().total_transfers(), 0);
    }

    #[test]
    fn invalid_request_never_reaches_the_store() {
        let mut service = seeded_service();
        let err = service.transfer(&request("0")).unwrap_err();
        assert!(matches!(
            err,
            TransferError::Request(RequestError::NonPositiveAmount { .. })
        ));

        let mut req = request("100.00");
        req.destination_account_id = 1;
        let err = service.transfer(&req).unwrap_err();
        assert!(matches!(
            err,
            TransferError::Request(RequestError::SameAccount)
        ));
        assert_eq!(service.account_detail(1).unwrap().balance(), dec("1000.00"));
    }

    #[test]
    fn list_and_detail_are_pass_through_reads() {
        let service = seeded_service();
        let accounts = service.list_accounts().unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].owner(), "Andres");
        assert_eq!(accounts[1].owner(), "John");
        assert_eq!(service.list_banks().unwrap().len(), 1);
        let err = service.account_detail(7).unwrap_err();
        assert!(matches!(err, TransferError::AccountNotFound(7)));
    }

    /// Account store that fails every update targeting one account id,
    /// standing in for a broken backing store.
    struct FlakyAccountRepository {
        inner: InMemoryAccountRepository,
        fail_update_for: AccountId,
    }

    impl AccountRepository for FlakyAccountRepository {
        fn find_all(&self) -> Result<Vec<Account>, RepositoryError> {
            self.inner.find_all()
        }

        fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
            self.inner.find_by_id(id)
        }

        fn save(&mut self, account: Account) -> Result<Account, RepositoryError> {
            self.inner.save(account)
        }

        fn update(&mut self, account: &Account) -> Result<Account, RepositoryError> {
            if account.id() == Some(self.fail_update_for) {
                return Err(RepositoryError::Backend("store unavailable".to_string()));
            }
            self.inner.update(account)
        }
    }

    #[test]
    fn destination_update_failure_re_credits_the_source() {
        let mut accounts = FlakyAccountRepository {
            inner: InMemoryAccountRepository::default(),
            fail_update_for: 2,
        };
        accounts.save(Account::new("Andres", dec("1000.00"))).unwrap();
        accounts.save(Account::new("John", dec("2000.00"))).unwrap();
        let mut banks = InMemoryBankRepository::default();
        banks.save(Bank::new("State Bank")).unwrap();
        let mut service = TransferService::new(accounts, banks);

        let err = service.transfer(&request("100.00")).unwrap_err();

        assert!(matches!(
            err,
            TransferError::Persistence(RepositoryError::Backend(_))
        ));
        // the source debit was rolled back in the store
        assert_eq!(service.account_detail(1).unwrap().balance(), dec("1000.00"));
        assert_eq!(service.account_detail(2).unwrap().balance(), dec("2000.00"));
    }

    #[test]
    fn failed_compensation_reports_both_causes() {
        // The source update goes through, then the store dies: both the
        // destination update and the compensating source update fail.
        let accounts = SequencedFailingRepository::new(
            vec![
                Account::new("Andres", dec("1000.00")),
                Account::new("John", dec("2000.00")),
            ],
            1,
        );
        let mut banks = InMemoryBankRepository::default();
        banks.save(Bank::new("State Bank")).unwrap();
        let mut service = TransferService::new(accounts, banks);

        let err = service.transfer(&request("100.00")).unwrap_err();
        assert!(matches!(err, TransferError::CompensationFailed { .. }));
        // the store is left with the debited source, the documented gap
        assert_eq!(service.account_detail(1).unwrap().balance(), dec("900.00"));
        assert_eq!(service.account_detail(2).unwrap().balance(), dec("2000.00"));
    }

    /// Account store that lets a fixed number of updates through and fails
    /// every one after that.
    struct SequencedFailingRepository {
        inner: InMemoryAccountRepository,
        updates_allowed: u32,
        updates_seen: u32,
    }

    impl SequencedFailingRepository {
        fn new(accounts: Vec<Account>, updates_allowed: u32) -> Self {
            let mut inner = InMemoryAccountRepository::default();
            for account in accounts {
                inner.save(account).unwrap();
            }
            Self {
                inner,
                updates_allowed,
                updates_seen: 0,
            }
        }
    }

    impl AccountRepository for SequencedFailingRepository {
        fn find_all(&self) -> Result<Vec<Account>, RepositoryError> {
            self.inner.find_all()
        }

        fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
            self.inner.find_by_id(id)
        }

        fn save(&mut self, account: Account) -> Result<Account, RepositoryError> {
            self.inner.save(account)
        }

        fn update(&mut self, account: &Account) -> Result<Account, RepositoryError> {
            self.updates_seen += 1;
            if self.updates_seen > self.updates_allowed {
                return Err(RepositoryError::Backend("store unavailable".to_string()));
            }
            self.inner.update(account)
        }
    }
}

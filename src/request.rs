use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, prelude::Zero};
use thiserror::Error;

use crate::account::AccountId;
use crate::bank::BankId;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Transfer amount must be positive, got {amount}")]
    NonPositiveAmount { amount: Decimal },
    #[error("Source and destination accounts must differ")]
    SameAccount,
}

/// Inbound transfer order as handed over by the transport layer.
#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub source_account_id: AccountId,
    pub destination_account_id: AccountId,
    pub amount: Decimal,
    pub bank_id: Option<BankId>,
}

impl TransferRequest {
    /// Checks the request before any account is touched: the amount must be
    /// strictly positive and the two accounts must differ.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.amount <= Decimal::zero() {
            return Err(RequestError::NonPositiveAmount {
                amount: self.amount,
            });
        }
        if self.source_account_id == self.destination_account_id {
            return Err(RequestError::SameAccount);
        }
        Ok(())
    }
}

/// Outcome of a completed transfer: the echoed request fields, a human
/// readable status and the completion time. Built per call, never persisted.
#[derive(Debug, Clone)]
pub struct TransferReceipt {
    pub source_account_id: AccountId,
    pub destination_account_id: AccountId,
    pub amount: Decimal,
    pub bank_id: Option<BankId>,
    pub status: String,
    pub completed_at: DateTime<Utc>,
}

impl TransferReceipt {
    pub const COMPLETED: &str = "Transfer completed successfully";

    pub fn completed(request: &TransferRequest) -> Self {
        Self {
            source_account_id: request.source_account_id,
            destination_account_id: request.destination_account_id,
            amount: request.amount,
            bank_id: request.bank_id,
            status: Self::COMPLETED.to_string(),
            completed_at: Utc::now(),
        }
    }
}

// ⚠️ Ledger Errors - one taxonomy for directory, ledger and request mapping
//
// Every variant maps to exactly one HTTP status. Nothing here is fatal:
// the triggering operation rejects and the process keeps serving.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// No customer registered under the presented CPF (or no CPF at all)
    #[error("Customer not found")]
    CustomerNotFound,

    #[error("Customer already exists")]
    DuplicateCustomer,

    /// Withdrawal amount exceeds the computed balance
    #[error("Insufficient balance")]
    InsufficientBalance,

    #[error("Invalid name")]
    InvalidName,

    /// Amount is zero, negative, NaN or infinite
    #[error("Invalid amount")]
    InvalidAmount,

    #[error("Invalid CPF")]
    InvalidCpf,

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Body or field could not be decoded
    #[error("Malformed request: {0}")]
    MalformedRequest(String),
}

impl LedgerError {
    /// HTTP status code surfaced for this error
    pub fn status(&self) -> u16 {
        match self {
            LedgerError::CustomerNotFound => 404,
            LedgerError::DuplicateCustomer => 409,
            LedgerError::InsufficientBalance
            | LedgerError::InvalidName
            | LedgerError::InvalidAmount
            | LedgerError::InvalidCpf
            | LedgerError::InvalidDate(_)
            | LedgerError::MalformedRequest(_) => 400,
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(LedgerError::CustomerNotFound.status(), 404);
        assert_eq!(LedgerError::DuplicateCustomer.status(), 409);
        assert_eq!(LedgerError::InsufficientBalance.status(), 400);
        assert_eq!(LedgerError::InvalidName.status(), 400);
        assert_eq!(LedgerError::InvalidDate("x".into()).status(), 400);
    }

    #[test]
    fn test_messages() {
        assert_eq!(LedgerError::CustomerNotFound.to_string(), "Customer not found");
        assert_eq!(LedgerError::DuplicateCustomer.to_string(), "Customer already exists");
        assert_eq!(LedgerError::InsufficientBalance.to_string(), "Insufficient balance");
        assert_eq!(
            LedgerError::MalformedRequest("expected value".into()).to_string(),
            "Malformed request: expected value"
        );
    }
}

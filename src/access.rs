// 🔑 Access Check - resolve the acting customer from the `cpf` header
//
// Runs before every per-customer operation. The resolved record is
// returned to the caller and threaded explicitly into the next step.

use crate::entities::{Customer, CustomerRepository};
use crate::error::{LedgerError, Result};

/// Header carrying the caller's identifying value
pub const CPF_HEADER: &str = "cpf";

/// Look up the customer named by `header_value`
///
/// A missing header is treated the same as an unknown CPF.
pub fn resolve<R: CustomerRepository>(repo: &R, header_value: Option<&str>) -> Result<Customer> {
    let cpf = header_value.ok_or(LedgerError::CustomerNotFound)?;

    repo.find_by_cpf(cpf).ok_or_else(|| {
        tracing::debug!(cpf, "access check failed");
        LedgerError::CustomerNotFound
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::InMemoryCustomerRepository;

    #[test]
    fn test_resolve_known_customer() {
        let repo = InMemoryCustomerRepository::new();
        let created = repo.create("111", "Ana").unwrap();

        let resolved = resolve(&repo, Some("111")).unwrap();
        assert_eq!(resolved.id, created.id);
    }

    #[test]
    fn test_resolve_unknown_or_missing() {
        let repo = InMemoryCustomerRepository::new();
        repo.create("111", "Ana").unwrap();

        assert_eq!(resolve(&repo, Some("222")), Err(LedgerError::CustomerNotFound));
        assert_eq!(resolve(&repo, None), Err(LedgerError::CustomerNotFound));
    }
}

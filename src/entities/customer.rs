// 👤 Customer Entity - stable identity keyed by CPF
//
// "Name is a VALUE (can change), id and CPF are IDENTITY (never change)"
//
// - id: UUID allocated at registration
// - cpf: caller-supplied, unique across the directory
// - statement: append-only ledger of operations (see ledger.rs)

use serde::{Deserialize, Serialize};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::entities::operation::Operation;
use crate::error::{LedgerError, Result};

// ============================================================================
// CUSTOMER ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    // ========================================================================
    // IDENTITY (never changes)
    // ========================================================================
    /// Stable identity (UUID v4)
    pub id: String,

    /// Tax-id-like identifier, unique per directory
    pub cpf: String,

    // ========================================================================
    // VALUES
    // ========================================================================
    /// Display name
    pub name: String,

    /// Operations in insertion (= chronological) order
    pub statement: Vec<Operation>,
}

impl Customer {
    /// Create new customer with a fresh UUID and an empty statement
    pub fn new(cpf: String, name: String) -> Self {
        Customer {
            id: uuid::Uuid::new_v4().to_string(),
            cpf,
            name,
            statement: Vec::new(),
        }
    }

    /// Overwrite the display name
    ///
    /// Absent, empty and whitespace-only names are rejected and leave the
    /// stored name untouched.
    pub fn rename(&mut self, new_name: Option<&str>) -> Result<()> {
        let name = validate_name(new_name)?;
        self.name = name.to_string();
        Ok(())
    }
}

/// Check a caller-supplied name, returning it when usable
pub fn validate_name(name: Option<&str>) -> Result<&str> {
    match name {
        Some(name) if !name.trim().is_empty() => Ok(name),
        _ => Err(LedgerError::InvalidName),
    }
}

/// Check a caller-supplied CPF, returning it when usable
pub fn validate_cpf(cpf: &str) -> Result<&str> {
    if cpf.trim().is_empty() {
        return Err(LedgerError::InvalidCpf);
    }
    Ok(cpf)
}

// ============================================================================
// CUSTOMER REPOSITORY
// ============================================================================

/// Directory of customers
///
/// Constructed once per process and handed to whoever serves requests.
/// Tests get isolation by building a fresh instance each.
pub trait CustomerRepository: Send + Sync {
    /// Register a new customer; fails if the CPF is already taken
    fn create(&self, cpf: &str, name: &str) -> Result<Customer>;

    /// Snapshot of the customer registered under `cpf`
    fn find_by_cpf(&self, cpf: &str) -> Option<Customer>;

    /// Apply `update_fn` to the stored record with id `id`
    ///
    /// The closure runs while the directory is exclusively held, so a
    /// read-check-append sequence inside it is atomic. If the closure
    /// fails, whatever it wrote is still visible; callers must validate
    /// before mutating.
    fn update<T, F>(&self, id: &str, update_fn: F) -> Result<T>
    where
        F: FnOnce(&mut Customer) -> Result<T>;

    /// Remove the customer with id `id`
    fn delete(&self, id: &str) -> Result<()>;

    /// Number of registered customers
    fn count(&self) -> usize;
}

/// In-memory directory backed by a single `RwLock<Vec<Customer>>`
///
/// Lives only as long as the process; nothing is persisted.
pub struct InMemoryCustomerRepository {
    customers: RwLock<Vec<Customer>>,
}

impl InMemoryCustomerRepository {
    /// Create new empty directory
    pub fn new() -> Self {
        InMemoryCustomerRepository {
            customers: RwLock::new(Vec::new()),
        }
    }

    // A panic inside an update closure poisons the lock; the vector itself
    // is still structurally sound, so keep serving from it.
    fn read(&self) -> RwLockReadGuard<'_, Vec<Customer>> {
        self.customers.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Customer>> {
        self.customers.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InMemoryCustomerRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomerRepository for InMemoryCustomerRepository {
    fn create(&self, cpf: &str, name: &str) -> Result<Customer> {
        let mut customers = self.write();

        if customers.iter().any(|c| c.cpf == cpf) {
            return Err(LedgerError::DuplicateCustomer);
        }

        let customer = Customer::new(cpf.to_string(), name.to_string());
        customers.push(customer.clone());

        tracing::info!(customer_id = %customer.id, cpf, "customer registered");
        Ok(customer)
    }

    fn find_by_cpf(&self, cpf: &str) -> Option<Customer> {
        self.read().iter().find(|c| c.cpf == cpf).cloned()
    }

    fn update<T, F>(&self, id: &str, update_fn: F) -> Result<T>
    where
        F: FnOnce(&mut Customer) -> Result<T>,
    {
        let mut customers = self.write();
        let customer = customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(LedgerError::CustomerNotFound)?;

        update_fn(customer)
    }

    fn delete(&self, id: &str) -> Result<()> {
        let mut customers = self.write();
        let before = customers.len();
        customers.retain(|c| c.id != id);

        if customers.len() == before {
            return Err(LedgerError::CustomerNotFound);
        }

        tracing::info!(customer_id = %id, "customer removed");
        Ok(())
    }

    fn count(&self) -> usize {
        self.read().len()
    }
}

// ============================================================================
// TESTS
// ============================================================================

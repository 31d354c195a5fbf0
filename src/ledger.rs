// 📒 Statement Ledger - append-only operations and the balance rule
//
// Balance is never stored. It is folded from the statement on demand:
//   balance = Σ deposits − Σ withdrawals
//
// Every function here works on a `Customer` the caller already holds
// (mutably, for appends). Atomicity against concurrent callers is the
// repository's job, see `CustomerRepository::update`.

use chrono::{DateTime, NaiveDate, Utc};

use crate::entities::{Customer, Operation, OperationType};
use crate::error::{LedgerError, Result};

// ============================================================================
// BALANCE
// ============================================================================

/// Fold a statement into its balance (initial accumulator 0)
pub fn compute_balance(statement: &[Operation]) -> f64 {
    statement
        .iter()
        .fold(0.0, |balance, op| balance + op.signed_amount())
}

/// Reject amounts that are not strictly positive and finite
pub fn validate_amount(amount: f64) -> Result<f64> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(LedgerError::InvalidAmount)
    }
}

// ============================================================================
// APPENDS
// ============================================================================

/// Append a deposit stamped with the current time
pub fn deposit(customer: &mut Customer, description: String, amount: f64) -> Result<Operation> {
    let amount = validate_amount(amount)?;

    let op = Operation::new(OperationType::Deposit, description, amount);
    customer.statement.push(op.clone());

    tracing::info!(customer_id = %customer.id, amount, kind = op.kind.as_str(), "operation recorded");
    Ok(op)
}

/// Append a withdrawal if the current balance covers it
///
/// On `InsufficientBalance` the statement is left untouched.
pub fn withdraw(customer: &mut Customer, description: String, amount: f64) -> Result<Operation> {
    let amount = validate_amount(amount)?;

    let balance = compute_balance(&customer.statement);
    if balance < amount {
        tracing::warn!(customer_id = %customer.id, balance, amount, "withdrawal rejected");
        return Err(LedgerError::InsufficientBalance);
    }

    let op = Operation::new(OperationType::Withdraw, description, amount);
    customer.statement.push(op.clone());

    tracing::info!(customer_id = %customer.id, amount, kind = op.kind.as_str(), "operation recorded");
    Ok(op)
}

// ============================================================================
// STATEMENT QUERIES
// ============================================================================

/// Operations recorded on the same calendar day (UTC) as `date`
///
/// Day-granularity comparison: time of day on either side is ignored.
/// No match yields an empty vector.
pub fn statement_on(customer: &Customer, date: NaiveDate) -> Vec<Operation> {
    customer
        .statement
        .iter()
        .filter(|op| op.created_at.date_naive() == date)
        .cloned()
        .collect()
}

/// Parse the `date` query parameter
///
/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp. Timestamps are
/// shifted to UTC before the time of day is dropped, matching how
/// operation stamps are compared.
pub fn parse_statement_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .map_err(|_| LedgerError::InvalidDate(raw.to_string()))
}

// ============================================================================
// TESTS
// ============================================================================

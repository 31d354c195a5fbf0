// 🧾 Operation Entity - one dated line of a customer's statement
//
// Operations are values: once appended to a statement they are never
// mutated or removed. Each one belongs to exactly one customer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// OPERATION TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    /// Funds added to the account
    Deposit,

    /// Funds taken out of the account
    Withdraw,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Deposit => "deposit",
            OperationType::Withdraw => "withdraw",
        }
    }

    /// Sign applied to the amount when folding the balance
    pub fn sign(&self) -> f64 {
        match self {
            OperationType::Deposit => 1.0,
            OperationType::Withdraw => -1.0,
        }
    }
}

// ============================================================================
// OPERATION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Free-text description supplied by the caller
    pub description: String,

    pub amount: f64,

    /// Captured when the operation was recorded
    pub created_at: DateTime<Utc>,

    #[serde(rename = "type")]
    pub kind: OperationType,
}

impl Operation {
    /// Create an operation stamped with the current time
    pub fn new(kind: OperationType, description: String, amount: f64) -> Self {
        Self::at(kind, description, amount, Utc::now())
    }

    /// Create an operation with an explicit timestamp
    pub fn at(kind: OperationType, description: String, amount: f64, created_at: DateTime<Utc>) -> Self {
        Operation {
            description,
            amount,
            created_at,
            kind,
        }
    }

    /// Signed contribution of this operation to the balance
    pub fn signed_amount(&self) -> f64 {
        self.kind.sign() * self.amount
    }
}

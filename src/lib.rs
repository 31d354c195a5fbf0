// Account Ledger - Core Library
// Customer directory, statement ledger and request mapping; the HTTP
// adapter is behind the `server` feature.

pub mod error;
pub mod entities;
pub mod ledger;
pub mod access;
pub mod api;
pub mod config;

#[cfg(feature = "server")]
pub mod server;

// Re-export commonly used types
pub use error::{LedgerError, Result};
pub use entities::{
    Customer, CustomerRepository, InMemoryCustomerRepository,
    Operation, OperationType,
};
pub use ledger::{compute_balance, deposit, withdraw, statement_on, parse_statement_date};
pub use access::{resolve, CPF_HEADER};
pub use api::{handle, ApiRequest, ApiResponse, Endpoint, Method};
pub use config::{ConfigError, ServerConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Entity Models
// "Identity persists, values change"
//
// - Customer: stable identity (UUID + CPF), mutable name, owns a statement
// - Operation: immutable dated statement line (deposit / withdraw)

pub mod customer;
pub mod operation;

pub use customer::{Customer, CustomerRepository, InMemoryCustomerRepository};
pub use operation::{Operation, OperationType};

pub mod category;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod manager;
pub mod transaction;

pub use category::CategorySet;
pub use ledger::Ledger;
pub use manager::{LedgerManager, LoadReport};
pub use transaction::{Transaction, TransactionKind};

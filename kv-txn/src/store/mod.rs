mod base_store;
mod change_log;
mod transaction;

mod error;
mod error_list;
mod store_core;
mod store_manager;

pub use base_store::BaseStore;
pub use change_log::{Change, ChangeKind, ChangeLog, Visibility};
pub use transaction::{Transaction, TransactionStack, TransactionState};

pub use error::{StoreError, StoreResult};
pub use error_list::ErrorList;
pub use store_core::Store;
pub use store_manager::StoreManager;

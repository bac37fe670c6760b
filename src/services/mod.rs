// Service exports
pub mod locks;
pub mod store;

pub use locks::RoundLocks;
pub use store::{PostgresStore, SlotReconciliation, StoreError};

//! wisewallet-core
//!
//! Business logic and services for WiseWallet.
//! Depends on wisewallet-domain. No CLI, no terminal I/O; persistence goes
//! through the [`storage::KeyValueStore`] abstraction.

pub mod account_service;
pub mod budget_service;
pub mod error;
pub mod events;
pub mod expense_service;
pub mod format;
pub mod memory;
pub mod notifier;
pub mod session;
pub mod spending;
pub mod storage;
pub mod time;
pub mod validation;
pub mod wallet;

pub use account_service::*;
pub use budget_service::*;
pub use error::CoreError;
pub use events::*;
pub use expense_service::*;
pub use format::*;
pub use memory::MemoryStore;
pub use notifier::*;
pub use session::*;
pub use spending::*;
pub use storage::{Domain, KeyValueStore, Namespace};
pub use time::*;
pub use wallet::*;

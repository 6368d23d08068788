//! wisewallet-domain
//!
//! Pure domain models (User, Expense, BudgetPlan, NotificationState, alerts).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod alert;
pub mod budget;
pub mod common;
pub mod expense;
pub mod notification;
pub mod period;
pub mod spending;
pub mod user;

pub use alert::*;
pub use budget::*;
pub use common::*;
pub use expense::*;
pub use notification::*;
pub use period::*;
pub use spending::*;
pub use user::*;

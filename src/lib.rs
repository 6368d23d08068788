//! WiseWallet tracks personal expenses against monthly and per-category
//! budgets and raises a single alert per budget when spending goes over.
//!
//! The business rules live in the `wisewallet-*` crates; this crate wires
//! them to JSON storage, user configuration and an interactive shell.

pub mod cli;
pub mod errors;
pub mod settings;
pub mod utils;

pub use errors::CliError;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("WiseWallet tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}

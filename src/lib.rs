#![doc(test(attr(deny(warnings))))]

//! Finance Core keeps a personal net-worth tracker: accounts grouped into
//! categories, transactions that move their balances, and an allocation
//! analysis against Growth/Stability/Essentials/Rewards percentages.

pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Finance Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}

pub mod account_service;
pub mod category_service;
pub mod settings_service;
pub mod summary_service;
pub mod transaction_service;

pub use account_service::AccountService;
pub use category_service::CategoryService;
pub use settings_service::SettingsService;
pub use summary_service::{AllocationRow, SummaryService, TotalsResult};
pub use transaction_service::{NewTransaction, TransactionService};

use crate::errors::LedgerError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("Account `{name}` already exists in `{category}`")]
    DuplicateAccount { category: String, name: String },
    #[error("Category `{0}` already exists")]
    DuplicateCategory(String),
    #[error("Account `{0}` does not belong to any category")]
    AccountNotFound(String),
    #[error("{0}; the change was not saved")]
    Ledger(#[from] LedgerError),
}

/// Trims `value` and rejects it when nothing is left.
pub(crate) fn required_text(field: &str, value: &str) -> ServiceResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ServiceError::Validation(format!("{field} must not be empty")))
    } else {
        Ok(trimmed.to_string())
    }
}

pub(crate) fn finite(field: &str, value: f64) -> ServiceResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ServiceError::Validation(format!("{field} must be a number")))
    }
}

use crate::ledger::{Category, LedgerState};

use super::{required_text, ServiceError, ServiceResult};

pub struct CategoryService;

impl CategoryService {
    /// Appends an empty category after the existing ones.
    pub fn add(state: &mut LedgerState, name: &str) -> ServiceResult<()> {
        let name = required_text("Category name", name)?;
        if state.category(&name).is_some() {
            return Err(ServiceError::DuplicateCategory(name));
        }
        state.categories.push(Category::new(name));
        Ok(())
    }

    pub fn list(state: &LedgerState) -> Vec<&Category> {
        state.categories.iter().collect()
    }
}

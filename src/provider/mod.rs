use std::collections::HashMap;

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("no retirement accounts found for user {0}")]
    UnknownUser(String),
    #[error("financial data provider unavailable: {0}")]
    Unavailable(String),
}

/// Boundary to whatever system holds the user's retirement accounts.
/// Returns the sum of all retirement-account balances; failures must
/// surface as errors rather than a silent zero balance.
pub trait FinancialDataProvider {
    fn fetch_current_retirement_savings(&self, user_id: &str) -> Result<f64, ProviderError>;
}

/// Map-backed provider used by the HTTP layer and tests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProvider {
    balances: HashMap<String, f64>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balance(user_id: impl Into<String>, savings: f64) -> Self {
        let mut provider = Self::new();
        provider.set_balance(user_id, savings);
        provider
    }

    pub fn set_balance(&mut self, user_id: impl Into<String>, savings: f64) {
        self.balances.insert(user_id.into(), savings);
    }
}

impl FinancialDataProvider for InMemoryProvider {
    fn fetch_current_retirement_savings(&self, user_id: &str) -> Result<f64, ProviderError> {
        self.balances
            .get(user_id)
            .copied()
            .ok_or_else(|| ProviderError::UnknownUser(user_id.to_string()))
    }
}

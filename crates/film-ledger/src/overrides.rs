//! Manual budget overrides, keyed by the scraped film title.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use crate::types::LedgerResult;

/// Title → budget mapping that takes precedence over scraped budgets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BudgetOverrides {
    budgets: HashMap<String, u64>,
}

impl BudgetOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        Self {
            budgets: pairs.into_iter().map(|(t, b)| (t.into(), b)).collect(),
        }
    }

    /// Load a JSON object such as `{"Roma": 15000000}`.
    pub fn load(path: &Path) -> LedgerResult<Self> {
        let file = std::fs::File::open(path)?;
        let overrides = Self::from_reader(file)?;
        tracing::info!(
            "loaded {} budget overrides from {}",
            overrides.len(),
            path.display()
        );
        Ok(overrides)
    }

    pub fn from_reader<R: Read>(reader: R) -> LedgerResult<Self> {
        let budgets: HashMap<String, u64> = serde_json::from_reader(reader)?;
        Ok(Self { budgets })
    }

    /// Override for an exact title match.
    pub fn get(&self, title: &str) -> Option<u64> {
        self.budgets.get(title).copied()
    }

    pub fn len(&self) -> usize {
        self.budgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.budgets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let json = r#"{"Roma": 15000000, "The Shape of Water": 19500000}"#;
        let overrides = BudgetOverrides::from_reader(json.as_bytes()).unwrap();
        assert_eq!(overrides.len(), 2);
        assert_eq!(overrides.get("Roma"), Some(15_000_000));
        assert_eq!(overrides.get("roma"), None);
    }

    #[test]
    fn test_rejects_non_integer_budgets() {
        let json = r#"{"Roma": "fifteen million"}"#;
        assert!(BudgetOverrides::from_reader(json.as_bytes()).is_err());
    }

    #[test]
    fn test_empty_overrides() {
        assert!(BudgetOverrides::new().is_empty());
        assert_eq!(BudgetOverrides::new().get("Anything"), None);
    }
}

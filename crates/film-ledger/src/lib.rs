//! Film Ledger: reconciles award nominations, box office revenue and production budgets into one dataset keyed by film id.

pub mod checkpoint;
pub mod clean;
pub mod frame;
pub mod money;
pub mod overrides;
pub mod reconcile;
pub mod slug;
pub mod types;

pub use clean::clean_awards;
pub use frame::Frame;
pub use money::{parse_amount, parse_budget_text, Amount};
pub use overrides::BudgetOverrides;
pub use reconcile::{
    clean_budget, create_boxoffice_dataset, create_final_dataset, create_financial_data,
};
pub use slug::title_slug;
pub use types::*;

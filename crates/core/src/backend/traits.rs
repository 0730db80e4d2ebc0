use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::budget::{Budget, BudgetChanges, BudgetPeriod, NewBudget};
use crate::models::expense::{Expense, ExpenseChanges, NewExpense};
use crate::models::investment::{Investment, InvestmentChanges, NewInvestment};
use crate::models::profile::Profile;

/// Table-level access to the hosted finance backend.
///
/// Authentication and row visibility (own rows plus the linked partner's)
/// are enforced by the backend itself; implementations only move rows.
/// Inserts and updates return the row as stored.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait FinanceBackend: Send + Sync {
    /// Human-readable name of this backend (for logs/errors).
    fn name(&self) -> &str;

    // ── Expenses ────────────────────────────────────────────────────

    /// All visible expenses, newest date first.
    async fn fetch_expenses(&self) -> Result<Vec<Expense>, CoreError>;

    async fn insert_expense(&self, expense: NewExpense) -> Result<Expense, CoreError>;

    async fn update_expense(&self, id: Uuid, changes: ExpenseChanges) -> Result<Expense, CoreError>;

    async fn delete_expense(&self, id: Uuid) -> Result<(), CoreError>;

    // ── Budgets ─────────────────────────────────────────────────────

    /// Visible budgets of one period, ordered by category.
    async fn fetch_budgets(&self, period: BudgetPeriod) -> Result<Vec<Budget>, CoreError>;

    async fn insert_budget(&self, budget: NewBudget) -> Result<Budget, CoreError>;

    async fn update_budget(&self, id: Uuid, changes: BudgetChanges) -> Result<Budget, CoreError>;

    async fn delete_budget(&self, id: Uuid) -> Result<(), CoreError>;

    // ── Investments ─────────────────────────────────────────────────

    /// All visible investments, newest purchase date first.
    async fn fetch_investments(&self) -> Result<Vec<Investment>, CoreError>;

    async fn insert_investment(&self, investment: NewInvestment) -> Result<Investment, CoreError>;

    async fn update_investment(
        &self,
        id: Uuid,
        changes: InvestmentChanges,
    ) -> Result<Investment, CoreError>;

    async fn delete_investment(&self, id: Uuid) -> Result<(), CoreError>;

    // ── Profiles ────────────────────────────────────────────────────

    async fn fetch_profile(&self, id: Uuid) -> Result<Profile, CoreError>;

    async fn find_profile_by_username(&self, username: &str) -> Result<Option<Profile>, CoreError>;

    /// Set (or clear) one side of a partner link.
    async fn set_partner(&self, profile_id: Uuid, partner_id: Option<Uuid>) -> Result<(), CoreError>;
}

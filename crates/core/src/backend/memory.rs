use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::budget::{Budget, BudgetChanges, BudgetPeriod, NewBudget};
use crate::models::expense::{Expense, ExpenseChanges, NewExpense};
use crate::models::investment::{Investment, InvestmentChanges, NewInvestment};
use crate::models::profile::Profile;

use super::traits::FinanceBackend;

#[derive(Default)]
struct Tables {
    expenses: Vec<Expense>,
    budgets: Vec<Budget>,
    investments: Vec<Investment>,
    profiles: HashMap<Uuid, Profile>,
}

/// In-process backend holding every table in memory.
///
/// Follows the same ordering rules as the hosted API but performs no row
/// filtering: every row is visible. Useful offline and as a test fixture.
#[derive(Default)]
pub struct InMemoryBackend {
    tables: Mutex<Tables>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a profile row (profiles are created by sign-up, not by this crate).
    pub async fn add_profile(&self, profile: Profile) {
        self.tables.lock().await.profiles.insert(profile.id, profile);
    }

    /// Seed an existing expense row as-is.
    pub async fn seed_expense(&self, expense: Expense) {
        self.tables.lock().await.expenses.push(expense);
    }

    pub async fn seed_budget(&self, budget: Budget) {
        self.tables.lock().await.budgets.push(budget);
    }

    pub async fn seed_investment(&self, investment: Investment) {
        self.tables.lock().await.investments.push(investment);
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl FinanceBackend for InMemoryBackend {
    fn name(&self) -> &str {
        "InMemory"
    }

    async fn fetch_expenses(&self) -> Result<Vec<Expense>, CoreError> {
        let mut rows = self.tables.lock().await.expenses.clone();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(rows)
    }

    async fn insert_expense(&self, expense: NewExpense) -> Result<Expense, CoreError> {
        let row = Expense {
            id: Uuid::new_v4(),
            amount: expense.amount,
            category: expense.category,
            payer: expense.payer,
            payment_method: expense.payment_method,
            date: expense.date,
            description: expense.description,
            owning_account: expense.owning_account,
            created_at: Some(Utc::now()),
        };
        self.tables.lock().await.expenses.push(row.clone());
        debug!(id = %row.id, "inserted expense");
        Ok(row)
    }

    async fn update_expense(&self, id: Uuid, changes: ExpenseChanges) -> Result<Expense, CoreError> {
        let mut tables = self.tables.lock().await;
        let row = tables
            .expenses
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| CoreError::not_found("Expense", id))?;
        changes.apply_to(row);
        Ok(row.clone())
    }

    async fn delete_expense(&self, id: Uuid) -> Result<(), CoreError> {
        self.tables.lock().await.expenses.retain(|e| e.id != id);
        Ok(())
    }

    async fn fetch_budgets(&self, period: BudgetPeriod) -> Result<Vec<Budget>, CoreError> {
        let mut rows: Vec<Budget> = self
            .tables
            .lock()
            .await
            .budgets
            .iter()
            .filter(|b| b.period() == period)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.category.cmp(&b.category));
        Ok(rows)
    }

    async fn insert_budget(&self, budget: NewBudget) -> Result<Budget, CoreError> {
        let row = Budget {
            id: Uuid::new_v4(),
            category: budget.category,
            budget_amount: budget.budget_amount,
            month: budget.month,
            year: budget.year,
            owning_account: budget.owning_account,
            created_at: Some(Utc::now()),
        };
        self.tables.lock().await.budgets.push(row.clone());
        Ok(row)
    }

    async fn update_budget(&self, id: Uuid, changes: BudgetChanges) -> Result<Budget, CoreError> {
        let mut tables = self.tables.lock().await;
        let row = tables
            .budgets
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| CoreError::not_found("Budget", id))?;
        changes.apply_to(row);
        Ok(row.clone())
    }

    async fn delete_budget(&self, id: Uuid) -> Result<(), CoreError> {
        self.tables.lock().await.budgets.retain(|b| b.id != id);
        Ok(())
    }

    async fn fetch_investments(&self) -> Result<Vec<Investment>, CoreError> {
        let mut rows = self.tables.lock().await.investments.clone();
        rows.sort_by(|a, b| b.purchase_date.cmp(&a.purchase_date));
        Ok(rows)
    }

    async fn insert_investment(&self, investment: NewInvestment) -> Result<Investment, CoreError> {
        let row = Investment {
            id: Uuid::new_v4(),
            name: investment.name,
            category: investment.category,
            principal: investment.principal,
            purchase_date: investment.purchase_date,
            owning_account: investment.owning_account,
            created_at: Some(Utc::now()),
        };
        self.tables.lock().await.investments.push(row.clone());
        Ok(row)
    }

    async fn update_investment(
        &self,
        id: Uuid,
        changes: InvestmentChanges,
    ) -> Result<Investment, CoreError> {
        let mut tables = self.tables.lock().await;
        let row = tables
            .investments
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| CoreError::not_found("Investment", id))?;
        changes.apply_to(row);
        Ok(row.clone())
    }

    async fn delete_investment(&self, id: Uuid) -> Result<(), CoreError> {
        self.tables.lock().await.investments.retain(|i| i.id != id);
        Ok(())
    }

    async fn fetch_profile(&self, id: Uuid) -> Result<Profile, CoreError> {
        self.tables
            .lock()
            .await
            .profiles
            .get(&id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("Profile", id))
    }

    async fn find_profile_by_username(&self, username: &str) -> Result<Option<Profile>, CoreError> {
        Ok(self
            .tables
            .lock()
            .await
            .profiles
            .values()
            .find(|p| p.username.as_deref() == Some(username))
            .cloned())
    }

    async fn set_partner(&self, profile_id: Uuid, partner_id: Option<Uuid>) -> Result<(), CoreError> {
        let mut tables = self.tables.lock().await;
        let profile = tables
            .profiles
            .get_mut(&profile_id)
            .ok_or_else(|| CoreError::not_found("Profile", profile_id))?;
        profile.linked_partner_id = partner_id;
        Ok(())
    }
}

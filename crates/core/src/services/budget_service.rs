use tracing::info;
use uuid::Uuid;

use crate::backend::traits::FinanceBackend;
use crate::errors::CoreError;
use crate::models::budget::{
    Budget, BudgetChanges, BudgetOverview, BudgetPeriod, BudgetStatus, BudgetUsage, NewBudget,
};
use crate::models::expense::Expense;
use crate::models::settings::DEFAULT_NEAR_LIMIT_PCT;
use crate::services::aggregation_service::percentage;

/// Manages monthly category budgets and measures spending against them.
pub struct BudgetService {
    near_limit_pct: f64,
}

impl BudgetService {
    pub fn new() -> Self {
        Self::with_near_limit(DEFAULT_NEAR_LIMIT_PCT)
    }

    /// Use a custom "near limit" threshold (percent of the budget used).
    pub fn with_near_limit(near_limit_pct: f64) -> Self {
        Self { near_limit_pct }
    }

    /// Build the insert payload for a budget owned by `me`.
    ///
    /// Rules:
    /// - Category must not be blank
    /// - Amount must be finite and not negative
    /// - Month must be 1–12
    pub fn new_budget(
        &self,
        me: Uuid,
        category: &str,
        budget_amount: f64,
        period: BudgetPeriod,
    ) -> Result<NewBudget, CoreError> {
        validate_category(category)?;
        validate_amount(budget_amount)?;
        if !period.is_valid() {
            return Err(CoreError::ValidationError(format!(
                "Budget month must be between 1 and 12, got {}",
                period.month
            )));
        }
        Ok(NewBudget {
            category: category.trim().to_string(),
            budget_amount,
            month: period.month,
            year: period.year,
            owning_account: me,
        })
    }

    pub fn validate_changes(&self, changes: &BudgetChanges) -> Result<(), CoreError> {
        if let Some(category) = &changes.category {
            validate_category(category)?;
        }
        if let Some(amount) = changes.budget_amount {
            validate_amount(amount)?;
        }
        Ok(())
    }

    /// Status for a usage percentage.
    pub fn status_for(&self, used_pct: f64) -> BudgetStatus {
        if used_pct >= 100.0 {
            BudgetStatus::OverBudget
        } else if used_pct >= self.near_limit_pct {
            BudgetStatus::NearLimit
        } else {
            BudgetStatus::OnTrack
        }
    }

    /// Usage of one budget: both partners' spending in its category and month.
    pub fn usage(&self, budget: &Budget, expenses: &[Expense]) -> BudgetUsage {
        let period = budget.period();
        let spent: f64 = expenses
            .iter()
            .filter(|e| e.category == budget.category && period.contains(e.date))
            .map(|e| e.amount)
            .sum();

        let used_pct = percentage(spent, budget.budget_amount);
        // A zero budget with any spending is already over.
        let status = if budget.budget_amount <= 0.0 && spent > 0.0 {
            BudgetStatus::OverBudget
        } else {
            self.status_for(used_pct)
        };

        BudgetUsage {
            budget: budget.clone(),
            spent,
            used_pct,
            remaining: (budget.budget_amount - spent).max(0.0),
            status,
        }
    }

    /// Usage of every budget in `period`, in input order.
    pub fn overview(&self, budgets: &[Budget], expenses: &[Expense], period: BudgetPeriod) -> BudgetOverview {
        let usages: Vec<BudgetUsage> = budgets
            .iter()
            .filter(|b| b.period() == period)
            .map(|b| self.usage(b, expenses))
            .collect();

        BudgetOverview {
            period,
            total_budget: usages.iter().map(|u| u.budget.budget_amount).sum(),
            total_spent: usages.iter().map(|u| u.spent).sum(),
            usages,
        }
    }

    pub async fn add_budget(
        &self,
        backend: &dyn FinanceBackend,
        me: Uuid,
        category: &str,
        budget_amount: f64,
        period: BudgetPeriod,
    ) -> Result<Budget, CoreError> {
        let new_budget = self.new_budget(me, category, budget_amount, period)?;
        let budget = backend.insert_budget(new_budget).await?;
        info!(id = %budget.id, category = %budget.category, %period, "budget added");
        Ok(budget)
    }

    pub async fn update_budget(
        &self,
        backend: &dyn FinanceBackend,
        id: Uuid,
        changes: BudgetChanges,
    ) -> Result<Budget, CoreError> {
        self.validate_changes(&changes)?;
        let budget = backend.update_budget(id, changes).await?;
        info!(%id, "budget updated");
        Ok(budget)
    }

    pub async fn delete_budget(&self, backend: &dyn FinanceBackend, id: Uuid) -> Result<(), CoreError> {
        backend.delete_budget(id).await?;
        info!(%id, "budget deleted");
        Ok(())
    }
}

impl Default for BudgetService {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_category(category: &str) -> Result<(), CoreError> {
    if category.trim().is_empty() {
        return Err(CoreError::ValidationError("Budget category is required".into()));
    }
    Ok(())
}

fn validate_amount(amount: f64) -> Result<(), CoreError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(CoreError::ValidationError(format!(
            "Budget amount must be zero or more, got {amount}"
        )));
    }
    Ok(())
}

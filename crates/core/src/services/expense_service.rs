use tracing::{debug, info};
use uuid::Uuid;

use crate::backend::traits::FinanceBackend;
use crate::errors::CoreError;
use crate::models::expense::{Expense, ExpenseChanges, ExpenseDraft, Payer};
use crate::models::profile::Profile;

/// Records, edits and removes expenses.
///
/// The payer label decides which account owns a new row: "me" is the
/// signed-in account, "partner" is whoever that account is linked to.
pub struct ExpenseService;

impl ExpenseService {
    pub fn new() -> Self {
        Self
    }

    /// Validate user input before anything is sent to the backend.
    ///
    /// Rules:
    /// - Amount must be finite and positive
    /// - Category and payment method must not be blank
    pub fn validate_draft(&self, draft: &ExpenseDraft) -> Result<(), CoreError> {
        validate_amount(draft.amount)?;
        validate_label("category", &draft.category)?;
        validate_label("payment method", &draft.payment_method)?;
        Ok(())
    }

    fn validate_changes(&self, changes: &ExpenseChanges) -> Result<(), CoreError> {
        if let Some(amount) = changes.amount {
            validate_amount(amount)?;
        }
        if let Some(category) = &changes.category {
            validate_label("category", category)?;
        }
        if let Some(method) = &changes.payment_method {
            validate_label("payment method", method)?;
        }
        Ok(())
    }

    /// Account that owns an expense with the given payer label.
    pub fn resolve_owner(&self, me: &Profile, payer: Payer) -> Result<Uuid, CoreError> {
        match payer {
            Payer::Me => Ok(me.id),
            Payer::Partner => me.linked_partner_id.ok_or(CoreError::PartnerNotLinked),
        }
    }

    /// Record a new expense on behalf of account `me`.
    pub async fn add_expense(
        &self,
        backend: &dyn FinanceBackend,
        me: Uuid,
        draft: ExpenseDraft,
    ) -> Result<Expense, CoreError> {
        self.validate_draft(&draft)?;
        let owner = self.owner_for(backend, me, draft.payer).await?;
        let expense = backend.insert_expense(draft.into_new(owner)).await?;
        info!(id = %expense.id, amount = expense.amount, category = %expense.category, "expense added");
        Ok(expense)
    }

    /// Apply changes to an existing expense. A changed payer label moves
    /// the row to the matching account.
    pub async fn update_expense(
        &self,
        backend: &dyn FinanceBackend,
        me: Uuid,
        id: Uuid,
        mut changes: ExpenseChanges,
    ) -> Result<Expense, CoreError> {
        self.validate_changes(&changes)?;
        changes.category = changes.category.map(|c| c.trim().to_string());
        changes.payment_method = changes.payment_method.map(|m| m.trim().to_string());
        changes.owning_account = match changes.payer {
            Some(payer) => Some(self.owner_for(backend, me, payer).await?),
            None => None,
        };
        let expense = backend.update_expense(id, changes).await?;
        info!(%id, "expense updated");
        Ok(expense)
    }

    pub async fn delete_expense(&self, backend: &dyn FinanceBackend, id: Uuid) -> Result<(), CoreError> {
        backend.delete_expense(id).await?;
        info!(%id, "expense deleted");
        Ok(())
    }

    async fn owner_for(
        &self,
        backend: &dyn FinanceBackend,
        me: Uuid,
        payer: Payer,
    ) -> Result<Uuid, CoreError> {
        if payer == Payer::Me {
            return Ok(me);
        }
        // The partner link is read fresh; the local snapshot may be stale.
        let profile = match backend.fetch_profile(me).await {
            Ok(profile) => profile,
            Err(CoreError::RecordNotFound { .. }) => return Err(CoreError::PartnerNotLinked),
            Err(e) => return Err(e),
        };
        let owner = self.resolve_owner(&profile, payer)?;
        debug!(%me, %owner, "resolved partner as expense owner");
        Ok(owner)
    }
}

impl Default for ExpenseService {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_amount(amount: f64) -> Result<(), CoreError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(CoreError::ValidationError(format!(
            "Expense amount must be a positive number, got {amount}"
        )));
    }
    Ok(())
}

fn validate_label(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::ValidationError(format!("Expense {field} is required")));
    }
    Ok(())
}

use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use crate::backend::traits::FinanceBackend;
use crate::errors::CoreError;
use crate::models::investment::{
    Investment, InvestmentChanges, InvestmentPortfolio, NewInvestment, ValuedInvestment,
};
use crate::services::aggregation_service::percentage;
use crate::services::growth_service::GrowthService;

/// Tracks investment positions and values them with the growth model.
pub struct InvestmentService {
    growth: GrowthService,
}

impl InvestmentService {
    pub fn new() -> Self {
        Self {
            growth: GrowthService::new(),
        }
    }

    /// Validate a new position.
    ///
    /// Rules:
    /// - Name and category must not be blank
    /// - Principal must be finite and positive
    pub fn validate_new(&self, investment: &NewInvestment) -> Result<(), CoreError> {
        validate_text("name", &investment.name)?;
        validate_text("category", &investment.category)?;
        validate_principal(investment.principal)
    }

    pub fn validate_changes(&self, changes: &InvestmentChanges) -> Result<(), CoreError> {
        if let Some(name) = &changes.name {
            validate_text("name", name)?;
        }
        if let Some(category) = &changes.category {
            validate_text("category", category)?;
        }
        if let Some(principal) = changes.principal {
            validate_principal(principal)?;
        }
        Ok(())
    }

    /// Pair a position with its projected value on `as_of`.
    pub fn value(&self, investment: &Investment, as_of: NaiveDate) -> ValuedInvestment {
        let current_value =
            self.growth
                .current_value(investment.principal, investment.purchase_date, as_of);
        ValuedInvestment {
            investment: investment.clone(),
            current_value,
            gain_loss: current_value - investment.principal,
        }
    }

    /// Value every position and total them up. Newest purchase first.
    pub fn portfolio(&self, investments: &[Investment], as_of: NaiveDate) -> InvestmentPortfolio {
        let mut valued: Vec<ValuedInvestment> =
            investments.iter().map(|i| self.value(i, as_of)).collect();
        valued.sort_by(|a, b| b.investment.purchase_date.cmp(&a.investment.purchase_date));

        let total_invested: f64 = valued.iter().map(|v| v.investment.principal).sum();
        let total_current_value: f64 = valued.iter().map(|v| v.current_value).sum();
        let total_gain_loss = total_current_value - total_invested;

        InvestmentPortfolio {
            as_of_date: as_of,
            total_invested,
            total_current_value,
            total_gain_loss,
            gain_loss_pct: percentage(total_gain_loss, total_invested),
            investments: valued,
        }
    }

    pub async fn add_investment(
        &self,
        backend: &dyn FinanceBackend,
        me: Uuid,
        name: &str,
        category: &str,
        principal: f64,
        purchase_date: NaiveDate,
    ) -> Result<Investment, CoreError> {
        let new_investment = NewInvestment {
            name: name.trim().to_string(),
            category: category.trim().to_string(),
            principal,
            purchase_date,
            owning_account: me,
        };
        self.validate_new(&new_investment)?;
        let investment = backend.insert_investment(new_investment).await?;
        info!(id = %investment.id, name = %investment.name, "investment added");
        Ok(investment)
    }

    pub async fn update_investment(
        &self,
        backend: &dyn FinanceBackend,
        id: Uuid,
        changes: InvestmentChanges,
    ) -> Result<Investment, CoreError> {
        self.validate_changes(&changes)?;
        let investment = backend.update_investment(id, changes).await?;
        info!(%id, "investment updated");
        Ok(investment)
    }

    pub async fn delete_investment(&self, backend: &dyn FinanceBackend, id: Uuid) -> Result<(), CoreError> {
        backend.delete_investment(id).await?;
        info!(%id, "investment deleted");
        Ok(())
    }
}

impl Default for InvestmentService {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_text(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::ValidationError(format!("Investment {field} is required")));
    }
    Ok(())
}

fn validate_principal(principal: f64) -> Result<(), CoreError> {
    if !principal.is_finite() || principal <= 0.0 {
        return Err(CoreError::ValidationError(format!(
            "Investment amount must be a positive number, got {principal}"
        )));
    }
    Ok(())
}

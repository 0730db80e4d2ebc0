pub mod backend;
pub mod errors;
pub mod log;
pub mod models;
pub mod services;

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use backend::rest::RestBackend;
use backend::traits::FinanceBackend;
use errors::CoreError;
use models::{
    budget::{Budget, BudgetChanges, BudgetOverview, BudgetPeriod, CombinedBudget},
    expense::{Expense, ExpenseChanges, ExpenseDraft, ExpenseSortOrder},
    investment::{Investment, InvestmentChanges, InvestmentPortfolio},
    profile::{Household, Profile},
    report::{DashboardSummary, Report, ReportRange},
    settings::Settings,
    snapshot::LedgerSnapshot,
};
use services::{
    aggregation_service::AggregationService, budget_service::BudgetService,
    expense_service::ExpenseService, investment_service::InvestmentService,
    partner_service::PartnerService, report_service::ReportService,
};

/// Main entry point for the couple-finance core library.
///
/// Holds the signed-in account's view of the shared ledger plus the services
/// that operate on it. Reads are computed from the in-memory snapshot;
/// mutations go to the backend and then refresh the snapshot.
#[must_use]
pub struct CoupleLedger {
    backend: Arc<dyn FinanceBackend>,
    snapshot: LedgerSnapshot,
    aggregation_service: AggregationService,
    report_service: ReportService,
    budget_service: BudgetService,
    expense_service: ExpenseService,
    investment_service: InvestmentService,
    partner_service: PartnerService,
}

impl std::fmt::Debug for CoupleLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoupleLedger")
            .field("backend", &self.backend.name())
            .field("me", &self.snapshot.me.id)
            .field("partner", &self.snapshot.me.linked_partner_id)
            .field("period", &self.snapshot.period)
            .field("expenses", &self.snapshot.expenses.len())
            .field("budgets", &self.snapshot.budgets.len())
            .field("investments", &self.snapshot.investments.len())
            .finish()
    }
}

impl CoupleLedger {
    /// Fetch everything account `me` can see, with budgets of `period`.
    pub async fn load(
        backend: Arc<dyn FinanceBackend>,
        me: Uuid,
        period: BudgetPeriod,
    ) -> Result<Self, CoreError> {
        let snapshot = Self::fetch_snapshot(backend.as_ref(), me, period).await?;
        Ok(Self::build(backend, snapshot, BudgetService::new()))
    }

    /// Connect to the hosted backend described by `settings` and load.
    pub async fn connect(settings: &Settings, me: Uuid, period: BudgetPeriod) -> Result<Self, CoreError> {
        let backend: Arc<dyn FinanceBackend> = Arc::new(RestBackend::new(settings.backend.clone()));
        let snapshot = Self::fetch_snapshot(backend.as_ref(), me, period).await?;
        Ok(Self::build(
            backend,
            snapshot,
            BudgetService::with_near_limit(settings.near_limit_pct),
        ))
    }

    /// Wrap an already-fetched snapshot (e.g., restored from JSON).
    pub fn from_snapshot(backend: Arc<dyn FinanceBackend>, snapshot: LedgerSnapshot) -> Self {
        Self::build(backend, snapshot, BudgetService::new())
    }

    /// Re-fetch the snapshot for the current period.
    pub async fn refresh(&mut self) -> Result<(), CoreError> {
        let me = self.snapshot.me.id;
        let period = self.snapshot.period;
        self.snapshot = Self::fetch_snapshot(self.backend.as_ref(), me, period).await?;
        Ok(())
    }

    /// Load budgets of another period (and refresh everything else).
    pub async fn switch_period(&mut self, period: BudgetPeriod) -> Result<(), CoreError> {
        if !period.is_valid() {
            return Err(CoreError::ValidationError(format!(
                "Budget month must be between 1 and 12, got {}",
                period.month
            )));
        }
        self.snapshot.period = period;
        self.refresh().await
    }

    #[must_use]
    pub fn snapshot(&self) -> &LedgerSnapshot {
        &self.snapshot
    }

    #[must_use]
    pub fn me(&self) -> &Profile {
        &self.snapshot.me
    }

    #[must_use]
    pub fn partner(&self) -> Option<&Profile> {
        self.snapshot.partner.as_ref()
    }

    #[must_use]
    pub fn household(&self) -> Household {
        self.snapshot.household()
    }

    #[must_use]
    pub fn is_partner_linked(&self) -> bool {
        self.snapshot.me.is_linked()
    }

    // ── Expenses ────────────────────────────────────────────────────

    /// Record an expense. A `Partner` payer requires a linked partner.
    pub async fn add_expense(&mut self, draft: ExpenseDraft) -> Result<Expense, CoreError> {
        let expense = self
            .expense_service
            .add_expense(self.backend.as_ref(), self.snapshot.me.id, draft)
            .await?;
        self.refresh().await?;
        Ok(expense)
    }

    pub async fn update_expense(&mut self, id: Uuid, changes: ExpenseChanges) -> Result<Expense, CoreError> {
        let expense = self
            .expense_service
            .update_expense(self.backend.as_ref(), self.snapshot.me.id, id, changes)
            .await?;
        self.refresh().await?;
        Ok(expense)
    }

    pub async fn delete_expense(&mut self, id: Uuid) -> Result<(), CoreError> {
        self.expense_service
            .delete_expense(self.backend.as_ref(), id)
            .await?;
        self.refresh().await
    }

    #[must_use]
    pub fn get_expense(&self, id: Uuid) -> Option<&Expense> {
        self.snapshot.expenses.iter().find(|e| e.id == id)
    }

    /// Expenses within a date range (inclusive), newest first.
    #[must_use]
    pub fn expenses_in_range(&self, from: NaiveDate, to: NaiveDate) -> Vec<&Expense> {
        let mut expenses: Vec<&Expense> = self
            .snapshot
            .expenses
            .iter()
            .filter(|e| from <= e.date && e.date <= to)
            .collect();
        expenses.sort_by(|a, b| b.date.cmp(&a.date));
        expenses
    }

    /// The `count` most recent expenses, newest first.
    #[must_use]
    pub fn recent_expenses(&self, count: usize) -> Vec<&Expense> {
        let mut expenses: Vec<&Expense> = self.snapshot.expenses.iter().collect();
        expenses.sort_by(|a, b| b.date.cmp(&a.date));
        expenses.truncate(count);
        expenses
    }

    /// Case-insensitive search over category, payment method and description.
    #[must_use]
    pub fn search_expenses(&self, query: &str) -> Vec<&Expense> {
        let q = query.to_lowercase();
        self.snapshot
            .expenses
            .iter()
            .filter(|e| {
                e.category.to_lowercase().contains(&q)
                    || e.payment_method.to_lowercase().contains(&q)
                    || e.description.as_deref().unwrap_or("").to_lowercase().contains(&q)
            })
            .collect()
    }

    #[must_use]
    pub fn get_expenses_sorted(&self, order: &ExpenseSortOrder) -> Vec<&Expense> {
        let mut expenses: Vec<&Expense> = self.snapshot.expenses.iter().collect();
        match order {
            ExpenseSortOrder::DateDesc => expenses.sort_by(|a, b| b.date.cmp(&a.date)),
            ExpenseSortOrder::DateAsc => expenses.sort_by(|a, b| a.date.cmp(&b.date)),
            ExpenseSortOrder::AmountDesc => expenses.sort_by(|a, b| {
                b.amount
                    .partial_cmp(&a.amount)
                    .unwrap_or(std::cmp::Ordering::Equal)
            }),
            ExpenseSortOrder::AmountAsc => expenses.sort_by(|a, b| {
                a.amount
                    .partial_cmp(&b.amount)
                    .unwrap_or(std::cmp::Ordering::Equal)
            }),
            ExpenseSortOrder::CategoryAsc => expenses.sort_by(|a, b| a.category.cmp(&b.category)),
        }
        expenses
    }

    /// "Me", the partner's username (or "Partner"), or "Unknown".
    #[must_use]
    pub fn owner_label(&self, account: Uuid) -> String {
        self.aggregation_service.owner_label(
            &self.household(),
            self.snapshot.partner_username(),
            account,
        )
    }

    // ── Budgets ─────────────────────────────────────────────────────

    /// Set a budget for `category` in the loaded period, owned by me.
    pub async fn add_budget(&mut self, category: &str, budget_amount: f64) -> Result<Budget, CoreError> {
        let budget = self
            .budget_service
            .add_budget(
                self.backend.as_ref(),
                self.snapshot.me.id,
                category,
                budget_amount,
                self.snapshot.period,
            )
            .await?;
        self.refresh().await?;
        Ok(budget)
    }

    pub async fn update_budget(&mut self, id: Uuid, changes: BudgetChanges) -> Result<Budget, CoreError> {
        let budget = self
            .budget_service
            .update_budget(self.backend.as_ref(), id, changes)
            .await?;
        self.refresh().await?;
        Ok(budget)
    }

    pub async fn delete_budget(&mut self, id: Uuid) -> Result<(), CoreError> {
        self.budget_service
            .delete_budget(self.backend.as_ref(), id)
            .await?;
        self.refresh().await
    }

    /// Both partners' budgets of the loaded period, combined per category.
    #[must_use]
    pub fn combined_budgets(&self) -> BTreeMap<String, CombinedBudget> {
        self.aggregation_service
            .combine_budgets_by_category(&self.snapshot.budgets)
    }

    /// Spending against each budget of the loaded period.
    #[must_use]
    pub fn budget_overview(&self) -> BudgetOverview {
        self.budget_service.overview(
            &self.snapshot.budgets,
            &self.snapshot.expenses,
            self.snapshot.period,
        )
    }

    // ── Investments ─────────────────────────────────────────────────

    pub async fn add_investment(
        &mut self,
        name: &str,
        category: &str,
        principal: f64,
        purchase_date: NaiveDate,
    ) -> Result<Investment, CoreError> {
        let investment = self
            .investment_service
            .add_investment(
                self.backend.as_ref(),
                self.snapshot.me.id,
                name,
                category,
                principal,
                purchase_date,
            )
            .await?;
        self.refresh().await?;
        Ok(investment)
    }

    pub async fn update_investment(
        &mut self,
        id: Uuid,
        changes: InvestmentChanges,
    ) -> Result<Investment, CoreError> {
        let investment = self
            .investment_service
            .update_investment(self.backend.as_ref(), id, changes)
            .await?;
        self.refresh().await?;
        Ok(investment)
    }

    pub async fn delete_investment(&mut self, id: Uuid) -> Result<(), CoreError> {
        self.investment_service
            .delete_investment(self.backend.as_ref(), id)
            .await?;
        self.refresh().await
    }

    /// Every visible investment valued on `as_of`.
    #[must_use]
    pub fn investment_portfolio(&self, as_of: NaiveDate) -> InvestmentPortfolio {
        self.investment_service
            .portfolio(&self.snapshot.investments, as_of)
    }

    // ── Partner ─────────────────────────────────────────────────────

    /// Link with the account named `partner_username` (both sides).
    pub async fn link_partner(&mut self, partner_username: &str) -> Result<Profile, CoreError> {
        let partner = self
            .partner_service
            .link(self.backend.as_ref(), self.snapshot.me.id, partner_username)
            .await?;
        self.refresh().await?;
        Ok(partner)
    }

    pub async fn unlink_partner(&mut self) -> Result<(), CoreError> {
        self.partner_service
            .unlink(self.backend.as_ref(), self.snapshot.me.id)
            .await?;
        self.refresh().await
    }

    // ── Reports ─────────────────────────────────────────────────────

    /// Month-to-date dashboard for the month containing `today`.
    #[must_use]
    pub fn dashboard(&self, today: NaiveDate) -> DashboardSummary {
        self.report_service.dashboard(
            &self.snapshot.expenses,
            &self.snapshot.budgets,
            &self.household(),
            today,
        )
    }

    /// Report over `range`, measured against the loaded period's budgets.
    #[must_use]
    pub fn report(&self, range: ReportRange) -> Report {
        let combined = self.combined_budgets();
        self.report_service.build_report(
            &self.snapshot.expenses,
            &combined,
            &self.household(),
            range,
        )
    }

    // ── Export ──────────────────────────────────────────────────────

    /// Export all visible expenses as a JSON string.
    pub fn export_expenses_to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.snapshot.expenses)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize expenses to JSON: {e}")))
    }

    /// Export all visible expenses as CSV.
    /// Columns: id, date, amount, category, who, owner, payment_method, description
    #[must_use]
    pub fn export_expenses_to_csv(&self) -> String {
        let mut csv = String::from("id,date,amount,category,who,owner,payment_method,description\n");
        for expense in &self.snapshot.expenses {
            let owner = self.owner_label(expense.owning_account);
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{}\n",
                expense.id,
                expense.date,
                expense.amount,
                csv_field(&expense.category),
                expense.payer,
                csv_field(&owner),
                csv_field(&expense.payment_method),
                csv_field(expense.description.as_deref().unwrap_or("")),
            ));
        }
        csv
    }

    /// Serialize the whole snapshot, e.g. for offline display.
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.snapshot)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize snapshot: {e}")))
    }

    // ── Internal ────────────────────────────────────────────────────

    async fn fetch_snapshot(
        backend: &dyn FinanceBackend,
        me: Uuid,
        period: BudgetPeriod,
    ) -> Result<LedgerSnapshot, CoreError> {
        let my_profile = backend.fetch_profile(me).await?;
        let partner = match my_profile.linked_partner_id {
            Some(partner_id) => Some(backend.fetch_profile(partner_id).await?),
            None => None,
        };
        let expenses = backend.fetch_expenses().await?;
        let budgets = backend.fetch_budgets(period).await?;
        let investments = backend.fetch_investments().await?;

        debug!(
            backend = backend.name(),
            expenses = expenses.len(),
            budgets = budgets.len(),
            investments = investments.len(),
            "snapshot fetched"
        );
        info!(%me, %period, "ledger loaded");

        Ok(LedgerSnapshot {
            me: my_profile,
            partner,
            expenses,
            budgets,
            period,
            investments,
        })
    }

    fn build(
        backend: Arc<dyn FinanceBackend>,
        snapshot: LedgerSnapshot,
        budget_service: BudgetService,
    ) -> Self {
        Self {
            backend,
            snapshot,
            aggregation_service: AggregationService::new(),
            report_service: ReportService::new(),
            budget_service,
            expense_service: ExpenseService::new(),
            investment_service: InvestmentService::new(),
            partner_service: PartnerService::new(),
        }
    }
}

/// Quote a CSV field if it contains commas, quotes, or newlines.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

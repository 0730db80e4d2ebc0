use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

use crate::models::budget::{Budget, BudgetPeriod, CombinedBudget};
use crate::models::expense::Expense;
use crate::models::profile::Household;
use crate::models::report::{
    BudgetVsActual, DashboardSummary, PaymentMethodShare, Report, ReportRange,
};
use crate::services::aggregation_service::{percentage, AggregationService};

/// Number of categories listed in a report's "top categories".
pub const TOP_CATEGORY_COUNT: usize = 3;

/// Number of expenses shown in the dashboard's "recent" list.
pub const RECENT_EXPENSE_COUNT: usize = 3;

/// Assembles the derived views (report, dashboard) from raw rows.
///
/// The core computes all the numbers; formatting (currency symbols,
/// rounding for display, clamping progress bars) is left to the frontend.
pub struct ReportService {
    aggregation: AggregationService,
}

impl ReportService {
    pub fn new() -> Self {
        Self {
            aggregation: AggregationService::new(),
        }
    }

    /// Build the report for `range`.
    ///
    /// `combined_budgets` should come from
    /// [`AggregationService::combine_budgets_by_category`]. Expenses outside
    /// the range are ignored.
    pub fn build_report(
        &self,
        expenses: &[Expense],
        combined_budgets: &BTreeMap<String, CombinedBudget>,
        household: &Household,
        range: ReportRange,
    ) -> Report {
        let in_range = self
            .aggregation
            .filter_date_range(expenses, range.from, range.to);

        let payer_split = self.aggregation.sum_by_payer(&in_range, household);
        let payer_label_split = self.aggregation.sum_by_payer_label(&in_range);
        let total_expenses = payer_split.total();

        let total_budget = self.aggregation.total_budget(combined_budgets);
        let budget_used_pct = percentage(total_expenses, total_budget);
        let avg_daily_spend = total_expenses / range.day_count() as f64;

        let category_breakdown = self.aggregation.sum_by_category(&in_range);
        let top_categories = self
            .aggregation
            .top_n(&category_breakdown, TOP_CATEGORY_COUNT);

        let payment_method_breakdown = self
            .aggregation
            .sum_by_payment_method(&in_range)
            .into_iter()
            .map(|t| PaymentMethodShare {
                percentage: percentage(t.total, total_expenses),
                method: t.key,
                amount: t.total,
            })
            .collect();

        let budget_vs_actual = category_breakdown
            .iter()
            .map(|t| BudgetVsActual {
                category: t.key.clone(),
                budgeted: combined_budgets
                    .get(&t.key)
                    .map(|c| c.total_amount)
                    .unwrap_or(0.0),
                actual: t.total,
            })
            .collect();

        let daily_trend = self.aggregation.daily_trend(&in_range);

        debug!(
            from = %range.from,
            to = %range.to,
            expenses = in_range.len(),
            total_expenses,
            "assembled report"
        );

        Report {
            range,
            total_expenses,
            my_expenses: payer_split.mine,
            partner_expenses: payer_split.partner,
            unknown_expenses: payer_split.unknown,
            payer_label_split,
            total_budget,
            budget_used_pct,
            avg_daily_spend,
            top_categories,
            category_breakdown,
            payment_method_breakdown,
            daily_trend,
            budget_vs_actual,
        }
    }

    /// Month-to-date overview for the month containing `today`.
    ///
    /// `budgets` may span several periods; only those of today's month count.
    pub fn dashboard(
        &self,
        expenses: &[Expense],
        budgets: &[Budget],
        household: &Household,
        today: NaiveDate,
    ) -> DashboardSummary {
        let period = BudgetPeriod::containing(today);
        let month_expenses = self.aggregation.filter_period(expenses, period);

        let split = self.aggregation.sum_by_payer(&month_expenses, household);
        let total_expenses = split.total();

        let month_budgets = self.aggregation.budgets_for_period(budgets, period);
        let combined = self.aggregation.combine_budgets_by_category(&month_budgets);
        let total_budget = self.aggregation.total_budget(&combined);

        let mut recent: Vec<Expense> = expenses.to_vec();
        recent.sort_by(|a, b| b.date.cmp(&a.date));
        recent.truncate(RECENT_EXPENSE_COUNT);

        DashboardSummary {
            as_of_date: today,
            total_expenses,
            my_expenses: split.mine,
            partner_expenses: split.partner,
            total_budget,
            budget_used_pct: percentage(total_expenses, total_budget),
            remaining_budget: total_budget - total_expenses,
            expenses_by_category: self.aggregation.sum_by_category(&month_expenses),
            recent_expenses: recent,
            partner_linked: household.partner.is_some(),
        }
    }
}

impl Default for ReportService {
    fn default() -> Self {
        Self::new()
    }
}

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::expense::Expense;

/// Sum of amounts for one grouping key (category, payment method, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyTotal {
    pub key: String,
    pub total: f64,
}

/// Spending split by owning account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayerSplit {
    pub mine: f64,
    pub partner: f64,
    /// Rows owned by neither known account
    pub unknown: f64,
}

impl PayerSplit {
    pub fn total(&self) -> f64 {
        self.mine + self.partner + self.unknown
    }
}

/// Spending split by the user-entered payer label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayerLabelSplit {
    pub me: f64,
    pub partner: f64,
}

/// Total spent on one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total: f64,
}

/// A payment method's total and its share of all spending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethodShare {
    pub method: String,
    pub amount: f64,
    /// amount / total × 100, 0 when total spending is 0
    pub percentage: f64,
}

/// Budgeted vs. actual spending for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetVsActual {
    pub category: String,
    /// 0 when no budget exists for the category
    pub budgeted: f64,
    pub actual: f64,
}

/// Inclusive date range a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl ReportRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// Default range: the 28th of the previous month through `today`.
    pub fn default_for(today: NaiveDate) -> Self {
        let (year, month) = if today.month() == 1 {
            (today.year() - 1, 12)
        } else {
            (today.year(), today.month() - 1)
        };
        // Every month has a 28th.
        let from = NaiveDate::from_ymd_opt(year, month, 28).unwrap_or(today);
        Self { from, to: today }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// Inclusive number of days, never less than 1.
    pub fn day_count(&self) -> i64 {
        ((self.to - self.from).num_days() + 1).max(1)
    }
}

/// Everything the reports view renders for a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub range: ReportRange,

    /// Every expense in range, including rows owned by neither account
    pub total_expenses: f64,

    /// Split by owning account
    pub my_expenses: f64,
    pub partner_expenses: f64,
    pub unknown_expenses: f64,

    /// Split by the `who` label; may disagree with the owning-account split
    pub payer_label_split: PayerLabelSplit,

    /// Sum of combined budgets supplied to the report
    pub total_budget: f64,

    /// total_expenses / total_budget × 100, 0 when total_budget ≤ 0
    pub budget_used_pct: f64,

    /// total_expenses / inclusive day count
    pub avg_daily_spend: f64,

    /// At most 3, strictly by descending total
    pub top_categories: Vec<KeyTotal>,

    /// First-seen order
    pub category_breakdown: Vec<KeyTotal>,

    pub payment_method_breakdown: Vec<PaymentMethodShare>,

    /// Ascending by date
    pub daily_trend: Vec<DailyTotal>,

    pub budget_vs_actual: Vec<BudgetVsActual>,
}

/// The month-to-date overview shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub as_of_date: NaiveDate,
    pub total_expenses: f64,
    pub my_expenses: f64,
    pub partner_expenses: f64,
    pub total_budget: f64,
    pub budget_used_pct: f64,
    /// total_budget − total_expenses; negative when overspent
    pub remaining_budget: f64,
    pub expenses_by_category: Vec<KeyTotal>,
    /// Up to 3, newest first
    pub recent_expenses: Vec<Expense>,
    pub partner_linked: bool,
}

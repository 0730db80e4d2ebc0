use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::record::LedgerRecord;

/// A calendar month in a given year. Budgets are set per period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BudgetPeriod {
    pub year: i32,
    /// 1–12
    pub month: u32,
}

impl BudgetPeriod {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// The period a given day falls in.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn is_valid(&self) -> bool {
        (1..=12).contains(&self.month)
    }
}

impl std::fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// A spending limit for one category in one month, owned by one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: Uuid,
    pub category: String,
    pub budget_amount: f64,
    pub month: u32,
    pub year: i32,
    #[serde(rename = "user_id")]
    pub owning_account: Uuid,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Budget {
    pub fn period(&self) -> BudgetPeriod {
        BudgetPeriod::new(self.year, self.month)
    }
}

impl LedgerRecord for Budget {
    fn amount(&self) -> f64 {
        self.budget_amount
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn owning_account(&self) -> Uuid {
        self.owning_account
    }
}

/// Insert payload for the `budgets` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBudget {
    pub category: String,
    pub budget_amount: f64,
    pub month: u32,
    pub year: i32,
    #[serde(rename = "user_id")]
    pub owning_account: Uuid,
}

/// Partial update for a budget. Period and owner are fixed once created.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_amount: Option<f64>,
}

impl BudgetChanges {
    pub fn apply_to(&self, budget: &mut Budget) {
        if let Some(category) = &self.category {
            budget.category = category.clone();
        }
        if let Some(amount) = self.budget_amount {
            budget.budget_amount = amount;
        }
    }
}

/// All budgets for one category, summed across both linked accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedBudget {
    pub total_amount: f64,
    /// Every contributing row, in input order (no deduplication)
    pub source_budgets: Vec<Budget>,
}

/// Traffic-light status of a budget's usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetStatus {
    OnTrack,
    NearLimit,
    OverBudget,
}

impl std::fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BudgetStatus::OnTrack => write!(f, "On Track"),
            BudgetStatus::NearLimit => write!(f, "Near Limit"),
            BudgetStatus::OverBudget => write!(f, "Over Budget"),
        }
    }
}

/// Usage of a single budget row against the month's spending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetUsage {
    pub budget: Budget,
    /// Both partners' spending in the budget's category and month
    pub spent: f64,
    /// spent / budget × 100, 0 when the budget is not positive
    pub used_pct: f64,
    /// max(0, budget − spent)
    pub remaining: f64,
    pub status: BudgetStatus,
}

/// Overview of every budget in a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetOverview {
    pub period: BudgetPeriod,
    pub total_budget: f64,
    pub total_spent: f64,
    pub usages: Vec<BudgetUsage>,
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::record::{DatedRecord, LedgerRecord};

/// Expense categories offered by the entry form.
/// Stored as free text, so rows outside this list are still valid.
pub const EXPENSE_CATEGORIES: [&str; 10] = [
    "Food & Dining",
    "Rent",
    "Utilities",
    "Transportation",
    "Laundry",
    "Entertainment",
    "Healthcare",
    "Shopping",
    "Bills",
    "Other",
];

/// Payment methods offered by the entry form.
pub const PAYMENT_METHODS: [&str; 6] = [
    "My Credit Card",
    "Partner's Credit Card",
    "Debit Card",
    "Cash",
    "Bank Transfer",
    "SPayLater",
];

/// Who paid, as entered by the user.
///
/// This label is stored alongside the owning account and the two can
/// disagree: an expense labelled `Partner` may still be owned by "me".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Payer {
    Me,
    Partner,
}

impl std::fmt::Display for Payer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Payer::Me => write!(f, "me"),
            Payer::Partner => write!(f, "partner"),
        }
    }
}

/// Sort order for expense listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseSortOrder {
    /// Newest date first (default for display)
    DateDesc,
    DateAsc,
    AmountDesc,
    AmountAsc,
    /// Alphabetical by category
    CategoryAsc,
}

/// A single recorded expense, as stored in the `expenses` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,

    /// Always positive
    pub amount: f64,

    pub category: String,

    /// Payer label (`who` column)
    #[serde(rename = "who")]
    pub payer: Payer,

    pub payment_method: String,

    /// Day the money was spent (no time component)
    pub date: NaiveDate,

    #[serde(default)]
    pub description: Option<String>,

    /// Account the spend is attributed to (`user_id` column)
    #[serde(rename = "user_id")]
    pub owning_account: Uuid,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl LedgerRecord for Expense {
    fn amount(&self) -> f64 {
        self.amount
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn owning_account(&self) -> Uuid {
        self.owning_account
    }
}

impl DatedRecord for Expense {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// User input for a new expense, before the owning account is resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseDraft {
    pub amount: f64,
    pub category: String,
    pub payer: Payer,
    pub payment_method: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
}

impl ExpenseDraft {
    pub fn new(
        amount: f64,
        category: impl Into<String>,
        payer: Payer,
        payment_method: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            amount,
            category: category.into(),
            payer,
            payment_method: payment_method.into(),
            date,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach the resolved owning account, producing the insert payload.
    /// Labels are trimmed so they group with budgets of the same category.
    pub fn into_new(self, owning_account: Uuid) -> NewExpense {
        NewExpense {
            amount: self.amount,
            category: self.category.trim().to_string(),
            payer: self.payer,
            payment_method: self.payment_method.trim().to_string(),
            date: self.date,
            description: self.description,
            owning_account,
        }
    }
}

/// Insert payload for the `expenses` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    pub amount: f64,
    pub category: String,
    #[serde(rename = "who")]
    pub payer: Payer,
    pub payment_method: String,
    pub date: NaiveDate,
    pub description: Option<String>,
    #[serde(rename = "user_id")]
    pub owning_account: Uuid,
}

/// Partial update for an expense. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "who", skip_serializing_if = "Option::is_none")]
    pub payer: Option<Payer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// `Some(None)` clears the description (sent as `null`).
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_or_null"
    )]
    pub description: Option<Option<String>>,
    /// Re-resolved from `payer` by the expense service, not set by callers.
    #[serde(rename = "user_id", skip_serializing_if = "Option::is_none")]
    pub owning_account: Option<Uuid>,
}

impl ExpenseChanges {
    /// Apply the changes to an existing row (used by the in-memory backend).
    pub fn apply_to(&self, expense: &mut Expense) {
        if let Some(amount) = self.amount {
            expense.amount = amount;
        }
        if let Some(category) = &self.category {
            expense.category = category.clone();
        }
        if let Some(payer) = self.payer {
            expense.payer = payer;
        }
        if let Some(method) = &self.payment_method {
            expense.payment_method = method.clone();
        }
        if let Some(date) = self.date {
            expense.date = date;
        }
        if let Some(description) = &self.description {
            expense.description = description.clone();
        }
        if let Some(account) = self.owning_account {
            expense.owning_account = account;
        }
    }
}

/// Keeps an explicit `null` apart from a missing field: the field is only
/// deserialized when present, so `null` becomes `Some(None)`.
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

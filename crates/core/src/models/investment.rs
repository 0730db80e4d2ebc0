use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::record::{DatedRecord, LedgerRecord};

/// Investment categories offered by the entry form.
pub const INVESTMENT_CATEGORIES: [&str; 7] = [
    "Stocks",
    "Bonds",
    "ETF",
    "Mutual Funds",
    "Crypto",
    "Real Estate",
    "Other",
];

/// An investment position as stored in the `investment` table.
///
/// **Note**: the current value is never stored. It is projected from
/// `principal` and `purchase_date` every time it is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    pub id: Uuid,

    /// Display name (e.g., "Apple Stocks", "Bitcoin")
    pub name: String,

    pub category: String,

    /// Initial amount invested (`investment_amount` column)
    #[serde(rename = "investment_amount")]
    pub principal: f64,

    /// `date` column
    #[serde(rename = "date")]
    pub purchase_date: NaiveDate,

    #[serde(rename = "user_id")]
    pub owning_account: Uuid,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl LedgerRecord for Investment {
    fn amount(&self) -> f64 {
        self.principal
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn owning_account(&self) -> Uuid {
        self.owning_account
    }
}

impl DatedRecord for Investment {
    fn date(&self) -> NaiveDate {
        self.purchase_date
    }
}

/// Insert payload for the `investment` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInvestment {
    pub name: String,
    pub category: String,
    #[serde(rename = "investment_amount")]
    pub principal: f64,
    #[serde(rename = "date")]
    pub purchase_date: NaiveDate,
    #[serde(rename = "user_id")]
    pub owning_account: Uuid,
}

/// Partial update for an investment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvestmentChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "investment_amount", skip_serializing_if = "Option::is_none")]
    pub principal: Option<f64>,
    #[serde(rename = "date", skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<NaiveDate>,
}

impl InvestmentChanges {
    pub fn apply_to(&self, investment: &mut Investment) {
        if let Some(name) = &self.name {
            investment.name = name.clone();
        }
        if let Some(category) = &self.category {
            investment.category = category.clone();
        }
        if let Some(principal) = self.principal {
            investment.principal = principal;
        }
        if let Some(date) = self.purchase_date {
            investment.purchase_date = date;
        }
    }
}

/// An investment paired with its projected value on a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuedInvestment {
    pub investment: Investment,
    pub current_value: f64,
    /// current_value − principal
    pub gain_loss: f64,
}

/// Totals across every visible investment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentPortfolio {
    pub as_of_date: NaiveDate,
    pub total_invested: f64,
    pub total_current_value: f64,
    pub total_gain_loss: f64,
    /// (gain_loss / invested) × 100, 0 when nothing is invested
    pub gain_loss_pct: f64,
    /// Newest purchase first
    pub investments: Vec<ValuedInvestment>,
}

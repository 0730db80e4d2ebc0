use serde::{Deserialize, Serialize};

use super::budget::{Budget, BudgetPeriod};
use super::expense::Expense;
use super::investment::Investment;
use super::profile::{Household, Profile};

/// Everything the current account can see, fetched in one refresh.
///
/// Row visibility (own rows plus the linked partner's) is enforced by the
/// backend; the snapshot only holds what came back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub me: Profile,

    #[serde(default)]
    pub partner: Option<Profile>,

    /// Newest first
    pub expenses: Vec<Expense>,

    /// Budgets of `period` only
    pub budgets: Vec<Budget>,

    pub period: BudgetPeriod,

    /// Newest purchase first
    pub investments: Vec<Investment>,
}

impl LedgerSnapshot {
    pub fn empty(me: Profile, period: BudgetPeriod) -> Self {
        Self {
            me,
            partner: None,
            expenses: Vec::new(),
            budgets: Vec::new(),
            period,
            investments: Vec::new(),
        }
    }

    pub fn household(&self) -> Household {
        Household::from_profile(&self.me)
    }

    pub fn partner_username(&self) -> Option<&str> {
        self.partner.as_ref().and_then(|p| p.username.as_deref())
    }
}

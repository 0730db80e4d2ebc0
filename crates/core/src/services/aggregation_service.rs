use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

use crate::models::budget::{Budget, BudgetPeriod, CombinedBudget};
use crate::models::expense::{Expense, Payer};
use crate::models::profile::{Household, PayerBucket};
use crate::models::record::{DatedRecord, LedgerRecord};
use crate::models::report::{DailyTotal, KeyTotal, PayerLabelSplit, PayerSplit};

/// Grouping and summation over already-fetched ledger rows.
///
/// Pure business logic, no I/O. Every function is total: empty input gives
/// empty (or zero) output and nothing here returns an error.
pub struct AggregationService;

impl AggregationService {
    pub fn new() -> Self {
        Self
    }

    /// Sum amounts per key. Keys come back in first-seen order, which is
    /// also the tie-break order used by [`top_n`](Self::top_n).
    pub fn sum_by_key<T, F>(&self, records: &[T], key_fn: F) -> Vec<KeyTotal>
    where
        T: LedgerRecord,
        F: Fn(&T) -> String,
    {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut totals: Vec<KeyTotal> = Vec::new();

        for record in records {
            let key = key_fn(record);
            match index.get(&key) {
                Some(&i) => totals[i].total += record.amount(),
                None => {
                    index.insert(key.clone(), totals.len());
                    totals.push(KeyTotal {
                        key,
                        total: record.amount(),
                    });
                }
            }
        }

        totals
    }

    pub fn sum_by_category<T: LedgerRecord>(&self, records: &[T]) -> Vec<KeyTotal> {
        self.sum_by_key(records, |r| r.category().to_string())
    }

    pub fn sum_by_payment_method(&self, expenses: &[Expense]) -> Vec<KeyTotal> {
        self.sum_by_key(expenses, |e| e.payment_method.clone())
    }

    /// Split totals by owning account. Rows owned by neither household
    /// account land in `unknown`.
    pub fn sum_by_payer<T: LedgerRecord>(&self, records: &[T], household: &Household) -> PayerSplit {
        let mut split = PayerSplit::default();
        for record in records {
            match household.bucket_of(record.owning_account()) {
                PayerBucket::Me => split.mine += record.amount(),
                PayerBucket::Partner => split.partner += record.amount(),
                PayerBucket::Unknown => split.unknown += record.amount(),
            }
        }
        split
    }

    /// Split totals by the user-entered `who` label instead of ownership.
    pub fn sum_by_payer_label(&self, expenses: &[Expense]) -> PayerLabelSplit {
        let mut split = PayerLabelSplit::default();
        for expense in expenses {
            match expense.payer {
                Payer::Me => split.me += expense.amount,
                Payer::Partner => split.partner += expense.amount,
            }
        }
        split
    }

    /// Combine budgets of both accounts per category.
    ///
    /// Same-category budgets are summed, never overwritten or deduplicated.
    /// Callers pass budgets of a single period.
    pub fn combine_budgets_by_category(&self, budgets: &[Budget]) -> BTreeMap<String, CombinedBudget> {
        let mut combined: BTreeMap<String, CombinedBudget> = BTreeMap::new();
        for budget in budgets {
            let entry = combined
                .entry(budget.category.clone())
                .or_insert_with(|| CombinedBudget {
                    total_amount: 0.0,
                    source_budgets: Vec::new(),
                });
            entry.total_amount += budget.budget_amount;
            entry.source_budgets.push(budget.clone());
        }
        combined
    }

    /// Sum of every combined category total.
    pub fn total_budget(&self, combined: &BTreeMap<String, CombinedBudget>) -> f64 {
        combined.values().map(|c| c.total_amount).sum()
    }

    /// Rows dated within `from..=to` (both ends inclusive).
    pub fn filter_date_range<T>(&self, records: &[T], from: NaiveDate, to: NaiveDate) -> Vec<T>
    where
        T: DatedRecord + Clone,
    {
        records
            .iter()
            .filter(|r| from <= r.date() && r.date() <= to)
            .cloned()
            .collect()
    }

    /// Rows dated within the calendar month of `period`.
    pub fn filter_period<T>(&self, records: &[T], period: BudgetPeriod) -> Vec<T>
    where
        T: DatedRecord + Clone,
    {
        records
            .iter()
            .filter(|r| period.contains(r.date()))
            .cloned()
            .collect()
    }

    /// Budgets belonging to `period`.
    pub fn budgets_for_period(&self, budgets: &[Budget], period: BudgetPeriod) -> Vec<Budget> {
        budgets
            .iter()
            .filter(|b| b.period() == period)
            .cloned()
            .collect()
    }

    /// Per-day totals, ascending by date.
    pub fn daily_trend<T: DatedRecord>(&self, records: &[T]) -> Vec<DailyTotal> {
        let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for record in records {
            *by_day.entry(record.date()).or_insert(0.0) += record.amount();
        }
        by_day
            .into_iter()
            .map(|(date, total)| DailyTotal { date, total })
            .collect()
    }

    /// The `n` largest totals, descending. Ties keep their input order.
    pub fn top_n(&self, totals: &[KeyTotal], n: usize) -> Vec<KeyTotal> {
        let mut sorted = totals.to_vec();
        // sort_by is stable, so equal totals stay in first-seen order
        sorted.sort_by(|a, b| {
            b.total
                .partial_cmp(&a.total)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        sorted.truncate(n);
        sorted
    }

    /// Display name of a row's owner: "Me", the partner's username (or
    /// "Partner"), or "Unknown".
    pub fn owner_label(
        &self,
        household: &Household,
        partner_username: Option<&str>,
        account: Uuid,
    ) -> String {
        match household.bucket_of(account) {
            PayerBucket::Me => "Me".to_string(),
            PayerBucket::Partner => partner_username.unwrap_or("Partner").to_string(),
            PayerBucket::Unknown => "Unknown".to_string(),
        }
    }
}

impl Default for AggregationService {
    fn default() -> Self {
        Self::new()
    }
}

/// `part / whole × 100`, or 0 when `whole` is not positive.
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        (part / whole) * 100.0
    } else {
        0.0
    }
}

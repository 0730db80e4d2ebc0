use chrono::NaiveDate;
use uuid::Uuid;

/// Common view over every ledger row that carries money.
///
/// Aggregation functions are written against this trait so the same
/// grouping code serves expenses, budgets and investments.
pub trait LedgerRecord {
    /// Monetary amount the row contributes to a total.
    fn amount(&self) -> f64;

    /// Category label (free text, usually one of the known constants).
    fn category(&self) -> &str;

    /// Account the row is attributed to.
    fn owning_account(&self) -> Uuid;
}

/// A ledger row that sits on a calendar day.
pub trait DatedRecord: LedgerRecord {
    fn date(&self) -> NaiveDate;
}

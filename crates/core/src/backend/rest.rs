use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::budget::{Budget, BudgetChanges, BudgetPeriod, NewBudget};
use crate::models::expense::{Expense, ExpenseChanges, NewExpense};
use crate::models::investment::{Investment, InvestmentChanges, NewInvestment};
use crate::models::profile::Profile;
use crate::models::settings::BackendSettings;

use super::traits::FinanceBackend;

const EXPENSES: &str = "expenses";
const BUDGETS: &str = "budgets";
const INVESTMENTS: &str = "investment";
const PROFILES: &str = "profiles";

/// HTTP client for a PostgREST-style table API.
///
/// - **Tables**: `expenses`, `budgets`, `investment`, `profiles`
/// - **Auth**: `apikey` header plus `Authorization: Bearer <token>`
/// - **Filters**: query parameters such as `id=eq.<uuid>` and `order=date.desc`
/// - **Mutations**: send `Prefer: return=representation` so the stored row comes back
pub struct RestBackend {
    client: Client,
    settings: BackendSettings,
}

impl RestBackend {
    pub fn new(settings: BackendSettings) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            settings,
        }
    }

    pub fn settings(&self) -> &BackendSettings {
        &self.settings
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.settings.base_url)
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.client
            .request(method, self.table_url(table))
            .header("apikey", &self.settings.api_key)
            .bearer_auth(self.settings.bearer())
    }

    fn mutation(&self, method: Method, table: &str) -> RequestBuilder {
        self.request(method, table)
            .header("Prefer", "return=representation")
    }

    /// Turn a non-2xx response into `CoreError::Api`, carrying the body.
    async fn check(table: &str, resp: Response) -> Result<Response, CoreError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = resp.text().await.unwrap_or_default();
        warn!(table, status = status.as_u16(), "backend request failed");
        Err(CoreError::Api {
            table: table.to_string(),
            status: status.as_u16(),
            message,
        })
    }

    async fn read_rows<T: DeserializeOwned>(table: &str, resp: Response) -> Result<Vec<T>, CoreError> {
        let resp = Self::check(table, resp).await?;
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            CoreError::Deserialization(format!("Failed to parse '{table}' rows: {e}"))
        })
    }

    async fn read_single<T: DeserializeOwned>(
        table: &str,
        kind: &str,
        id: &str,
        resp: Response,
    ) -> Result<T, CoreError> {
        Self::read_rows::<T>(table, resp)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| CoreError::not_found(kind, id))
    }

    async fn insert<B, T>(&self, table: &str, kind: &str, body: &B) -> Result<T, CoreError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned + Send,
    {
        let resp = self
            .mutation(Method::POST, table)
            .json(&[body])
            .send()
            .await?;
        Self::read_single(table, kind, "<new>", resp).await
    }

    async fn update<B, T>(&self, table: &str, kind: &str, id: Uuid, body: &B) -> Result<T, CoreError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned + Send,
    {
        let resp = self
            .mutation(Method::PATCH, table)
            .query(&[("id", format!("eq.{id}"))])
            .json(body)
            .send()
            .await?;
        Self::read_single(table, kind, &id.to_string(), resp).await
    }

    async fn delete(&self, table: &str, id: Uuid) -> Result<(), CoreError> {
        let resp = self
            .request(Method::DELETE, table)
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await?;
        Self::check(table, resp).await?;
        debug!(table, %id, "deleted row");
        Ok(())
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl FinanceBackend for RestBackend {
    fn name(&self) -> &str {
        "REST"
    }

    #[instrument(skip(self))]
    async fn fetch_expenses(&self) -> Result<Vec<Expense>, CoreError> {
        let resp = self
            .request(Method::GET, EXPENSES)
            .query(&[("select", "*"), ("order", "date.desc")])
            .send()
            .await?;
        let rows: Vec<Expense> = Self::read_rows(EXPENSES, resp).await?;
        debug!(count = rows.len(), "fetched expenses");
        Ok(rows)
    }

    async fn insert_expense(&self, expense: NewExpense) -> Result<Expense, CoreError> {
        self.insert(EXPENSES, "Expense", &expense).await
    }

    async fn update_expense(&self, id: Uuid, changes: ExpenseChanges) -> Result<Expense, CoreError> {
        self.update(EXPENSES, "Expense", id, &changes).await
    }

    async fn delete_expense(&self, id: Uuid) -> Result<(), CoreError> {
        self.delete(EXPENSES, id).await
    }

    #[instrument(skip(self))]
    async fn fetch_budgets(&self, period: BudgetPeriod) -> Result<Vec<Budget>, CoreError> {
        let resp = self
            .request(Method::GET, BUDGETS)
            .query(&[
                ("select", "*".to_string()),
                ("month", format!("eq.{}", period.month)),
                ("year", format!("eq.{}", period.year)),
                ("order", "category".to_string()),
            ])
            .send()
            .await?;
        let rows: Vec<Budget> = Self::read_rows(BUDGETS, resp).await?;
        debug!(count = rows.len(), %period, "fetched budgets");
        Ok(rows)
    }

    async fn insert_budget(&self, budget: NewBudget) -> Result<Budget, CoreError> {
        self.insert(BUDGETS, "Budget", &budget).await
    }

    async fn update_budget(&self, id: Uuid, changes: BudgetChanges) -> Result<Budget, CoreError> {
        self.update(BUDGETS, "Budget", id, &changes).await
    }

    async fn delete_budget(&self, id: Uuid) -> Result<(), CoreError> {
        self.delete(BUDGETS, id).await
    }

    #[instrument(skip(self))]
    async fn fetch_investments(&self) -> Result<Vec<Investment>, CoreError> {
        let resp = self
            .request(Method::GET, INVESTMENTS)
            .query(&[("select", "*"), ("order", "date.desc")])
            .send()
            .await?;
        let rows: Vec<Investment> = Self::read_rows(INVESTMENTS, resp).await?;
        debug!(count = rows.len(), "fetched investments");
        Ok(rows)
    }

    async fn insert_investment(&self, investment: NewInvestment) -> Result<Investment, CoreError> {
        self.insert(INVESTMENTS, "Investment", &investment).await
    }

    async fn update_investment(
        &self,
        id: Uuid,
        changes: InvestmentChanges,
    ) -> Result<Investment, CoreError> {
        self.update(INVESTMENTS, "Investment", id, &changes).await
    }

    async fn delete_investment(&self, id: Uuid) -> Result<(), CoreError> {
        self.delete(INVESTMENTS, id).await
    }

    #[instrument(skip(self))]
    async fn fetch_profile(&self, id: Uuid) -> Result<Profile, CoreError> {
        let resp = self
            .request(Method::GET, PROFILES)
            .query(&[("select", "*".to_string()), ("id", format!("eq.{id}"))])
            .send()
            .await?;
        Self::read_single(PROFILES, "Profile", &id.to_string(), resp).await
    }

    #[instrument(skip(self))]
    async fn find_profile_by_username(&self, username: &str) -> Result<Option<Profile>, CoreError> {
        let resp = self
            .request(Method::GET, PROFILES)
            .query(&[
                ("select", "*".to_string()),
                ("username", format!("eq.{username}")),
            ])
            .send()
            .await?;
        let rows: Vec<Profile> = Self::read_rows(PROFILES, resp).await?;
        Ok(rows.into_iter().next())
    }

    async fn set_partner(&self, profile_id: Uuid, partner_id: Option<Uuid>) -> Result<(), CoreError> {
        let resp = self
            .request(Method::PATCH, PROFILES)
            .query(&[("id", format!("eq.{profile_id}"))])
            .json(&serde_json::json!({ "partner_id": partner_id }))
            .send()
            .await?;
        Self::check(PROFILES, resp).await?;
        debug!(%profile_id, ?partner_id, "updated partner link");
        Ok(())
    }
}

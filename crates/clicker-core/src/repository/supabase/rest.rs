//! PostgREST table access for the three tables.

use std::fmt::Display;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;

use crate::domain::{Boss, BossId, DeathCounter, NewBoss, NewDeathCounter, Timer, TimerPatch};
use crate::repository::traits::RemoteStore;
use crate::repository::{StoreError, StoreResult};

use super::config::SupabaseConfig;
use super::{BOSSES, DEATH_COUNTERS, TIMERS};


/// PostgREST `column=eq.value` filter as a query pair
pub fn eq_filter(column: &str, value: impl Display) -> (String, String) {
    (column.to_string(), format!("eq.{}", value))
}

fn describe(table: &str, filters: &[(String, String)]) -> String {
    if filters.is_empty() {
        return table.to_string();
    }
    let query: Vec<String> = filters.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
    format!("{}?{}", table, query.join("&"))
}

#[derive(Clone)]
pub struct SupabaseRest {
    client: Client,
    rest_url: Arc<str>,
    anon_key: Arc<str>,
}

impl SupabaseRest {
    pub fn new(config: &SupabaseConfig) -> StoreResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| StoreError::ClientBuilder { source })?;
        Ok(Self {
            client,
            rest_url: Arc::from(config.rest_url()),
            anon_key: Arc::from(config.anon_key.as_str()),
        })
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.rest_url, table);
        self.client
            .request(method, url)
            .header("apikey", self.anon_key.as_ref())
            .bearer_auth(self.anon_key.as_ref())
    }

    async fn checked(response: Response, path: &str) -> StoreResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::RequestStatus {
            path: path.to_string(),
            status,
            body,
        })
    }

    async fn select<T>(&self, table: &'static str, filters: &[(String, String)]) -> StoreResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let path = describe(table, filters);
        let mut query = vec![("select".to_string(), "*".to_string())];
        query.extend_from_slice(filters);

        let response = self
            .request(Method::GET, table)
            .query(&query)
            .send()
            .await
            .map_err(|source| StoreError::RequestSend { path: path.clone(), source })?;
        let response = Self::checked(response, &path).await?;
        response
            .json::<Vec<T>>()
            .await
            .map_err(|source| StoreError::DecodeResponse { path, source })
    }

    /// INSERT/PATCH returning the affected rows
    async fn write_returning<B, T>(
        &self,
        method: Method,
        table: &'static str,
        filters: &[(String, String)],
        body: &B,
    ) -> StoreResult<Vec<T>>
    where
        B: ?Sized + Serialize,
        T: DeserializeOwned,
    {
        let path = describe(table, filters);
        let response = self
            .request(method, table)
            .query(filters)
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await
            .map_err(|source| StoreError::RequestSend { path: path.clone(), source })?;
        let response = Self::checked(response, &path).await?;
        response
            .json::<Vec<T>>()
            .await
            .map_err(|source| StoreError::DecodeResponse { path, source })
    }

    /// PATCH without reading the row back
    async fn write_minimal<B>(
        &self,
        method: Method,
        table: &'static str,
        filters: &[(String, String)],
        body: &B,
    ) -> StoreResult<()>
    where
        B: ?Sized + Serialize,
    {
        let path = describe(table, filters);
        let response = self
            .request(method, table)
            .query(filters)
            .header("Prefer", "return=minimal")
            .json(body)
            .send()
            .await
            .map_err(|source| StoreError::RequestSend { path: path.clone(), source })?;
        Self::checked(response, &path).await.map(|_| ())
    }

    async fn insert_one<B, T>(&self, table: &'static str, body: &B) -> StoreResult<T>
    where
        B: ?Sized + Serialize,
        T: DeserializeOwned,
    {
        self.write_returning::<B, T>(Method::POST, table, &[], body)
            .await?
            .into_iter()
            .next()
            .ok_or(StoreError::MissingRow {
                table,
                filter: "insert".to_string(),
            })
    }
}

#[async_trait(?Send)]
impl RemoteStore for SupabaseRest {
    async fn list_bosses(&self) -> StoreResult<Vec<Boss>> {
        self.select(BOSSES, &[]).await
    }

    async fn insert_boss(&self, boss: &NewBoss) -> StoreResult<Boss> {
        self.insert_one(BOSSES, boss).await
    }

    async fn list_death_counters(&self) -> StoreResult<Vec<DeathCounter>> {
        self.select(DEATH_COUNTERS, &[]).await
    }

    async fn death_counter_for(&self, boss_id: BossId) -> StoreResult<Option<DeathCounter>> {
        let rows: Vec<DeathCounter> = self.select(DEATH_COUNTERS, &[eq_filter("boss_id", boss_id)]).await?;
        Ok(rows.into_iter().next())
    }

    async fn update_death_count(&self, id: i64, death_count: u32) -> StoreResult<DeathCounter> {
        let rows: Vec<DeathCounter> = self
            .write_returning(
                Method::PATCH,
                DEATH_COUNTERS,
                &[eq_filter("id", id)],
                &json!({ "death_count": death_count }),
            )
            .await?;
        rows.into_iter().next().ok_or_else(|| StoreError::MissingRow {
            table: DEATH_COUNTERS,
            filter: format!("id=eq.{}", id),
        })
    }

    async fn insert_death_counter(&self, boss_id: BossId) -> StoreResult<DeathCounter> {
        self.insert_one(DEATH_COUNTERS, &NewDeathCounter::for_boss(boss_id)).await
    }

    async fn list_timers(&self) -> StoreResult<Vec<Timer>> {
        self.select(TIMERS, &[]).await
    }

    async fn timer_for(&self, boss_id: BossId) -> StoreResult<Option<Timer>> {
        let rows: Vec<Timer> = self.select(TIMERS, &[eq_filter("boss_id", boss_id)]).await?;
        Ok(rows.into_iter().next())
    }

    async fn update_timer(&self, boss_id: BossId, patch: &TimerPatch) -> StoreResult<()> {
        self.write_minimal(Method::PATCH, TIMERS, &[eq_filter("boss_id", boss_id)], patch)
            .await
    }

    async fn insert_timer(&self, boss_id: BossId) -> StoreResult<Timer> {
        self.insert_one(TIMERS, &Timer::new(boss_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rest() -> SupabaseRest {
        let config = SupabaseConfig::new("https://abc.supabase.co", "anon-key").unwrap();
        SupabaseRest::new(&config).unwrap()
    }

    #[test]
    fn test_eq_filter() {
        assert_eq!(eq_filter("boss_id", 12), ("boss_id".to_string(), "eq.12".to_string()));
    }

    #[test]
    fn test_describe_path() {
        assert_eq!(describe("timers", &[]), "timers");
        assert_eq!(describe("timers", &[eq_filter("boss_id", 3)]), "timers?boss_id=eq.3");
    }

    #[test]
    fn test_request_carries_key_headers() {
        let request = rest()
            .request(Method::GET, "bosses")
            .query(&[("select", "*")])
            .build()
            .unwrap();
        assert_eq!(request.url().as_str(), "https://abc.supabase.co/rest/v1/bosses?select=*");
        assert_eq!(request.headers()["apikey"], "anon-key");
        assert_eq!(request.headers()["authorization"], "Bearer anon-key");
    }

    #[test]
    fn test_patch_filter_in_query() {
        let request = rest()
            .request(Method::PATCH, "death_counters")
            .query(&[eq_filter("id", 5)])
            .build()
            .unwrap();
        assert_eq!(request.method(), &Method::PATCH);
        assert_eq!(request.url().query(), Some("id=eq.5"));
    }
}

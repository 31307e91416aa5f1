#![doc = "Supabase store for the CLI: implements the core `Store` trait over the PostgREST HTTP API."]
//
//! # Supabase Store
//!
//! Rows are written with `POST {url}/rest/v1/{table}` and waiting image prompts
//! are read with `GET {url}/rest/v1/image_prompts?status=eq.waiting&select=*`.
//! Every request carries the project key both as `apikey` and as a bearer token.
//!
//! Without credentials the store is a no-op: inserts report
//! [`StoreStatus::NotConfigured`] and the prompt queue is empty, so the
//! pipeline runs fully offline.

use async_trait::async_trait;
use repo_blogger_core::config::{BloggerConfig, SupabaseConfig};
use repo_blogger_core::contract::{BoxError, Store, StoreStatus};
use repo_blogger_core::model::QueuedPrompt;
use repo_blogger_core::pipeline::{PROMPTS_TABLE, WAITING_STATUS};
use serde_json::Value;
use std::time::Duration;

pub struct SupabaseStore {
    target: Option<SupabaseConfig>,
    http: reqwest::Client,
}

impl SupabaseStore {
    pub fn new(config: &BloggerConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = ?e, "Failed to build HTTP client with timeout, using defaults");
                reqwest::Client::new()
            });
        tracing::info!(
            configured = config.supabase.is_some(),
            "Initialized SupabaseStore"
        );
        Self {
            target: config.supabase.clone(),
            http,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.target.is_some()
    }

    fn rest_url(target: &SupabaseConfig, table: &str) -> String {
        format!("{}/rest/v1/{}", target.url.trim_end_matches('/'), table)
    }

    fn authorised(&self, request: reqwest::RequestBuilder, target: &SupabaseConfig) -> reqwest::RequestBuilder {
        request
            .header("apikey", &target.key)
            .header("Authorization", format!("Bearer {}", target.key))
    }
}

#[async_trait]
impl Store for SupabaseStore {
    async fn insert(&self, table: &str, record: Value) -> StoreStatus {
        let Some(target) = &self.target else {
            tracing::debug!(table, "Supabase not configured, insert skipped");
            return StoreStatus::NotConfigured;
        };
        let url = Self::rest_url(target, table);
        tracing::info!(table, url = %url, "Inserting row");

        let request = self
            .authorised(self.http.post(&url), target)
            .header("Prefer", "return=representation")
            .json(&record);

        let response = match request.send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::error!(error = ?e, table, "Supabase request failed");
                return StoreStatus::Error(e.to_string());
            }
        };

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if !status.is_success() {
            tracing::error!(%status, table, body = %text, "Supabase rejected insert");
            return StoreStatus::Error(format!("HTTP {status}: {text}"));
        }

        // PostgREST answers 201 with the inserted rows, or an empty body without `Prefer`.
        let data = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };
        StoreStatus::Ok(data)
    }

    async fn fetch_waiting_prompts(&self) -> Result<Vec<QueuedPrompt>, BoxError> {
        let Some(target) = &self.target else {
            tracing::debug!("Supabase not configured, prompt queue is empty");
            return Ok(Vec::new());
        };
        let url = Self::rest_url(target, PROMPTS_TABLE);
        let status_filter = format!("eq.{WAITING_STATUS}");

        let response = self
            .authorised(self.http.get(&url), target)
            .query(&[("status", status_filter.as_str()), ("select", "*")])
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, url = %url, "Failed to fetch waiting prompts");
                e
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::error!(%status, body = %text, "Supabase rejected prompt query");
            return Err(format!("HTTP {status}: {text}").into());
        }

        let prompts: Vec<QueuedPrompt> = response.json().await?;
        tracing::info!(count = prompts.len(), "Fetched waiting prompts");
        Ok(prompts)
    }
}

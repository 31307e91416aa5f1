//! Blog publishers used by `run --publish`.
//!
//! WordPress is a real REST client. Tistory and Velog only check for their
//! credentials and log the hand-off; neither exposes a usable posting API.

use async_trait::async_trait;
use repo_blogger_core::config::{BloggerConfig, WordPressConfig};
use repo_blogger_core::contract::{PublishOutcome, Publisher};
use serde_json::json;
use std::time::Duration;
use tracing::{error, info};

pub const WORDPRESS_TIMEOUT_SECS: u64 = 10;

pub struct WordPressPublisher {
    target: Option<WordPressConfig>,
    http: reqwest::Client,
}

impl WordPressPublisher {
    pub fn new(target: Option<WordPressConfig>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(WORDPRESS_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = ?e, "Failed to build HTTP client with timeout, using defaults");
                reqwest::Client::new()
            });
        Self { target, http }
    }
}

#[async_trait]
impl Publisher for WordPressPublisher {
    fn name(&self) -> &'static str {
        "wordpress"
    }

    async fn publish(&self, title: &str, html: &str) -> PublishOutcome {
        let Some(target) = &self.target else {
            info!("[publish] WordPress not configured, skipped");
            return PublishOutcome::NotConfigured;
        };
        let url = format!("{}/wp-json/wp/v2/posts", target.url.trim_end_matches('/'));
        let payload = json!({ "title": title, "content": html, "status": "publish" });

        let response = match self
            .http
            .post(&url)
            .bearer_auth(&target.key)
            .json(&payload)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                error!(error = ?e, url = %url, "[publish] WordPress request failed");
                return PublishOutcome::Failed(e.to_string());
            }
        };

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!(%status, body = %text, "[publish] WordPress rejected post");
            return PublishOutcome::Failed(format!("HTTP {status}: {text}"));
        }

        let link = match response.json::<serde_json::Value>().await {
            Ok(body) => body.get("link").and_then(|l| l.as_str()).map(str::to_string),
            Err(e) => {
                error!(error = ?e, "[publish] WordPress response was not JSON");
                None
            }
        };
        info!(link = ?link, "[publish] WordPress published");
        PublishOutcome::Published(link)
    }
}

/// Publisher without a remote API call: configured means the article is
/// considered handed off.
pub struct CredentialStub {
    name: &'static str,
    credential: Option<String>,
}

impl CredentialStub {
    pub fn tistory(token: Option<String>) -> Self {
        Self {
            name: "tistory",
            credential: token,
        }
    }

    pub fn velog(cookie: Option<String>) -> Self {
        Self {
            name: "velog",
            credential: cookie,
        }
    }
}

#[async_trait]
impl Publisher for CredentialStub {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn publish(&self, title: &str, _html: &str) -> PublishOutcome {
        if self.credential.is_none() {
            info!(target_name = self.name, "[publish] Not configured, skipped");
            return PublishOutcome::NotConfigured;
        }
        info!(target_name = self.name, title, "[publish] Stub invoked, nothing sent");
        PublishOutcome::Published(None)
    }
}

/// WordPress, Tistory and Velog, in that order.
pub fn publishers_from_config(config: &BloggerConfig) -> Vec<Box<dyn Publisher>> {
    vec![
        Box::new(WordPressPublisher::new(config.publish.wordpress.clone())),
        Box::new(CredentialStub::tistory(config.publish.tistory_token.clone())),
        Box::new(CredentialStub::velog(config.publish.velog_cookie.clone())),
    ]
}

//! # Notification Sink Module
//!
//! ## Purpose
//! Best-effort Slack notification of every query/response pair. Failures are
//! logged and never propagate to the query path.

use crate::config::SlackConfig;
use crate::errors::{NavigatorError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Posts messages to a Slack channel via `chat.postMessage`
pub struct SlackNotifier {
    client: reqwest::Client,
    api_url: String,
    token: String,
    channel: String,
}

#[derive(Serialize)]
struct PostMessageRequest<'a> {
    channel: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct PostMessageResponse {
    ok: bool,
    error: Option<String>,
}

impl SlackNotifier {
    /// Build a notifier when both token and channel are configured
    pub fn from_config(config: &SlackConfig) -> Option<Self> {
        let token = config.token.clone()?;
        let channel = config.channel.clone()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .ok()?;

        Some(Self {
            client,
            api_url: config.api_url.clone(),
            token,
            channel,
        })
    }

    /// Post a message, absorbing any failure into a warning log
    pub async fn post(&self, text: &str) {
        if let Err(e) = self.try_post(text).await {
            warn!("Failed to post notification to Slack: {}", e);
        }
    }

    async fn try_post(&self, text: &str) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/chat.postMessage", self.api_url))
            .bearer_auth(&self.token)
            .json(&PostMessageRequest {
                channel: &self.channel,
                text,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NavigatorError::Notification {
                details: format!("Slack returned HTTP {}", response.status()),
            });
        }

        let body: PostMessageResponse = response.json().await?;
        if !body.ok {
            return Err(NavigatorError::Notification {
                details: body.error.unwrap_or_else(|| "unknown Slack error".to_string()),
            });
        }

        debug!("Posted notification to Slack channel {}", self.channel);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_without_credentials() {
        let mut config = SlackConfig {
            api_url: "https://slack.com/api".to_string(),
            token: None,
            channel: Some("#general".to_string()),
            timeout_seconds: 10,
        };
        assert!(SlackNotifier::from_config(&config).is_none());

        config.token = Some("xoxb-test".to_string());
        config.channel = None;
        assert!(SlackNotifier::from_config(&config).is_none());

        config.channel = Some("#general".to_string());
        assert!(SlackNotifier::from_config(&config).is_some());
    }
}

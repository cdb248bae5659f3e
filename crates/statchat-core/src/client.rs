use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use anyhow::{Context, Result, anyhow};

#[derive(Serialize)]
struct AskRequest<'a> {
    question: &'a str,
}

// The backend also sends `type`, `category`, `data` and echoes the question;
// only the answer text is rendered.
#[derive(Deserialize)]
struct AskResponse {
    answer: String,
}

/// Client for the stats backend's `/ask` and `/refresh-data` endpoints
#[derive(Clone)]
pub struct StatsClient {
    client: Client,
    base_url: String,
}

impl StatsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn ask(&self, question: &str) -> Result<String> {
        let url = format!("{}/ask", self.base_url);
        tracing::info!(%url, "sending question");

        let response = self
            .client
            .post(&url)
            .json(&AskRequest { question })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("ask request failed with status: {}", response.status()));
        }

        let ask_response: AskResponse = response
            .json()
            .await
            .context("ask response did not contain an answer")?;
        Ok(ask_response.answer)
    }

    /// Ask the backend to re-scrape its statistics. Only the status matters.
    pub async fn refresh_data(&self) -> Result<()> {
        let url = format!("{}/refresh-data", self.base_url);
        tracing::info!(%url, "requesting data refresh");

        let response = self.client.post(&url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!("refresh request failed with status: {}", response.status()));
        }

        Ok(())
    }
}

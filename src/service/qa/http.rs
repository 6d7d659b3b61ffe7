//! HTTP clients for the question classification and answer retrieval services.
//!
//! Both services are external black boxes behind simple JSON POST endpoints.
//! Neither gets a retry policy here: a failure surfaces as
//! `ClassificationUnavailable` and the engine fails closed.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::base::{
    config::Config,
    types::{Error, Res},
};

use super::{GenericQaClient, QaClient};

// Wire types.

#[derive(Debug, Serialize)]
struct QaRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ClassifyResponse {
    needs_follow_up: bool,
}

#[derive(Debug, Deserialize)]
struct AnswerResponse {
    answer: String,
}

// Extra methods on `QaClient` applied by the HTTP implementation.

impl QaClient {
    pub fn http(config: &Config) -> Res<Self> {
        let client = HttpQaClient::new(config)?;
        Ok(Self { inner: Arc::new(client) })
    }
}

// Specific implementations.

/// HTTP client for the two triage services.
#[derive(Clone)]
pub struct HttpQaClient {
    client: reqwest::Client,
    config: Config,
}

impl HttpQaClient {
    /// Create a new HTTP QA client with the configured request timeout.
    #[instrument(name = "HttpQaClient::new", skip_all)]
    pub fn new(config: &Config) -> Res<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.qa_timeout_secs))
            .build()
            .map_err(anyhow::Error::from)?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    async fn post_json<T: for<'de> Deserialize<'de>>(&self, endpoint: &str, text: &str) -> Res<T> {
        let response = self
            .client
            .post(endpoint)
            .json(&QaRequest { text })
            .send()
            .await
            .map_err(|e| Error::ClassificationUnavailable(e.into()))?
            .error_for_status()
            .map_err(|e| Error::ClassificationUnavailable(e.into()))?;

        response.json::<T>().await.map_err(|e| Error::ClassificationUnavailable(e.into()))
    }
}

#[async_trait]
impl GenericQaClient for HttpQaClient {
    #[instrument(name = "HttpQaClient::classify", skip_all)]
    async fn classify(&self, text: &str) -> Res<bool> {
        let response: ClassifyResponse = self.post_json(&self.config.classifier_endpoint, text).await?;

        Ok(response.needs_follow_up)
    }

    #[instrument(name = "HttpQaClient::answer", skip_all)]
    async fn answer(&self, text: &str) -> Res<String> {
        let response: AnswerResponse = self.post_json(&self.config.answers_endpoint, text).await?;

        Ok(response.answer)
    }
}

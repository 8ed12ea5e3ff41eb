//! JSON-over-HTTP client for the session store and classifier endpoints.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::error::StoreError;
use crate::models::{Classification, Emotion, SessionDetail, SessionSummary};

use super::types::{
    CaptureRequest, CaptureResponse, CreateSessionResponse, ErrorPayload, ModelStatus,
    SessionListResponse,
};
use super::{EmotionClassifier, SessionStore};

/// Talks to the store's `/api/...` routes. Implements both the store and the
/// classifier seams since the backend serves them from one process.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, format!("{}{}", self.base_url, path))
    }

    async fn send(&self, request: RequestBuilder, endpoint: &str) -> Result<String, StoreError> {
        let response = request.send().await.map_err(|source| StoreError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| StoreError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;
        debug!("{endpoint} -> {status}");

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorPayload>(&body)
                .map(|payload| payload.error)
                .unwrap_or_else(|_| {
                    if body.is_empty() {
                        status.canonical_reason().unwrap_or("error").to_string()
                    } else {
                        body
                    }
                });
            return Err(StoreError::Rejected {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        endpoint: &str,
    ) -> Result<T, StoreError> {
        let body = self.send(request, endpoint).await?;
        serde_json::from_str(&body).map_err(|err| malformed(endpoint, err.to_string()))
    }
}

fn malformed(endpoint: &str, message: impl Into<String>) -> StoreError {
    StoreError::Malformed {
        endpoint: endpoint.to_string(),
        message: message.into(),
    }
}

#[async_trait]
impl SessionStore for HttpBackend {
    async fn create_session(&self) -> Result<String, StoreError> {
        let endpoint = "session/start";
        let response: CreateSessionResponse = self
            .send_json(self.request(Method::POST, "/api/session/start"), endpoint)
            .await?;

        response
            .session_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| malformed(endpoint, "missing session_id"))
    }

    async fn stop_session(&self, session_id: &str) -> Result<(), StoreError> {
        let path = format!("/api/session/{session_id}/stop");
        self.send(self.request(Method::POST, &path), "session/stop")
            .await
            .map(|_| ())
    }

    async fn list_sessions(&self) -> Result<Vec<SessionSummary>, StoreError> {
        let response: SessionListResponse = self
            .send_json(self.request(Method::GET, "/api/session_reports"), "session_reports")
            .await?;
        Ok(response.sessions)
    }

    async fn session_detail(&self, session_id: &str) -> Result<SessionDetail, StoreError> {
        let path = format!("/api/session_reports/{session_id}");
        self.send_json(self.request(Method::GET, &path), "session_reports/detail")
            .await
    }

    async fn delete_session(&self, session_id: &str) -> Result<(), StoreError> {
        let path = format!("/api/session/{session_id}");
        self.send(self.request(Method::DELETE, &path), "session/delete")
            .await
            .map(|_| ())
    }

    async fn model_status(&self) -> Result<ModelStatus, StoreError> {
        self.send_json(self.request(Method::GET, "/api/model_status"), "model_status")
            .await
    }
}

#[async_trait]
impl EmotionClassifier for HttpBackend {
    async fn classify(
        &self,
        session_id: &str,
        image_data_url: &str,
    ) -> Result<Classification, StoreError> {
        let endpoint = "session/capture";
        let path = format!("/api/session/{session_id}/capture");
        let request = self.request(Method::POST, &path).json(&CaptureRequest {
            image_data: image_data_url,
        });

        let response: CaptureResponse = self.send_json(request, endpoint).await?;

        let label = response
            .emotion
            .ok_or_else(|| malformed(endpoint, "missing emotion"))?;
        let emotion: Emotion = label
            .parse()
            .map_err(|err: anyhow::Error| malformed(endpoint, err.to_string()))?;
        let confidence = response
            .confidence
            .filter(|c| c.is_finite())
            .ok_or_else(|| malformed(endpoint, "missing or invalid confidence"))?;

        Ok(Classification {
            emotion,
            confidence: confidence.clamp(0.0, 1.0),
        })
    }
}

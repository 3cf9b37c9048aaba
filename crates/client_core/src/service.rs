use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    domain::{DeviceId, Difficulty},
    error::ApiError,
    protocol::{CheckRequest, CheckResponse, DailyPuzzle, HistoryEntry, PersistProgressRequest},
};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("puzzle service unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("session expired: {0}")]
    Expired(String),
    #[error("puzzle service returned {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("failed to decode puzzle service response: {0}")]
    Decode(String),
}

impl ServiceError {
    pub fn is_transport(&self) -> bool {
        matches!(self, ServiceError::Transport(_))
    }
}

#[async_trait]
pub trait PuzzleService: Send + Sync {
    async fn fetch_daily(
        &self,
        device_id: &DeviceId,
        difficulty: Difficulty,
    ) -> Result<DailyPuzzle, ServiceError>;

    async fn submit_check(&self, request: &CheckRequest) -> Result<CheckResponse, ServiceError>;

    async fn persist_progress(&self, request: &PersistProgressRequest)
        -> Result<(), ServiceError>;

    /// Hands a final snapshot to a delivery path that outlives the caller. No result is
    /// reported back and the caller never waits on delivery.
    fn send_beacon(&self, request: PersistProgressRequest);

    async fn fetch_history(
        &self,
        device_id: &DeviceId,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<HistoryEntry>, ServiceError>;
}

#[derive(Clone)]
pub struct HttpPuzzleService {
    http: Client,
    server_url: String,
}

impl HttpPuzzleService {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(http: Client, server_url: impl Into<String>) -> Self {
        let server_url = server_url.into().trim_end_matches('/').to_string();
        Self { http, server_url }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }
}

#[async_trait]
impl PuzzleService for HttpPuzzleService {
    async fn fetch_daily(
        &self,
        device_id: &DeviceId,
        difficulty: Difficulty,
    ) -> Result<DailyPuzzle, ServiceError> {
        let res = self
            .http
            .get(format!("{}/api/sudoku/daily/{}", self.server_url, device_id))
            .query(&[("difficulty", difficulty.as_str())])
            .send()
            .await?;
        read_json(res).await
    }

    async fn submit_check(&self, request: &CheckRequest) -> Result<CheckResponse, ServiceError> {
        let res = self
            .http
            .post(format!("{}/api/sudoku/check", self.server_url))
            .json(request)
            .send()
            .await?;
        read_json(res).await
    }

    async fn persist_progress(
        &self,
        request: &PersistProgressRequest,
    ) -> Result<(), ServiceError> {
        let res = self
            .http
            .post(format!("{}/api/sudoku/update-grid", self.server_url))
            .json(request)
            .send()
            .await?;
        check_status(res).await?;
        Ok(())
    }

    fn send_beacon(&self, request: PersistProgressRequest) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(device_id = %request.device_id, "beacon: no runtime available, progress dropped");
            return;
        };
        let service = self.clone();
        runtime.spawn(async move {
            match service.persist_progress(&request).await {
                Ok(()) => debug!(date = %request.date, "beacon: progress delivered"),
                Err(err) => debug!(date = %request.date, "beacon: delivery failed: {err}"),
            }
        });
    }

    async fn fetch_history(
        &self,
        device_id: &DeviceId,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<HistoryEntry>, ServiceError> {
        let res = self
            .http
            .get(format!("{}/api/sudoku/history/{}", self.server_url, device_id))
            .query(&[("skip", skip), ("limit", limit)])
            .send()
            .await?;
        read_json(res).await
    }
}

async fn check_status(res: Response) -> Result<Response, ServiceError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let body = res.text().await.unwrap_or_default();
    let detail = ApiError::from_body(&body).detail;
    if status == StatusCode::FORBIDDEN {
        return Err(ServiceError::Expired(detail));
    }
    Err(ServiceError::Status {
        status: status.as_u16(),
        detail,
    })
}

async fn read_json<T: DeserializeOwned>(res: Response) -> Result<T, ServiceError> {
    let body = check_status(res).await?.text().await?;
    serde_json::from_str(&body).map_err(|err| ServiceError::Decode(err.to_string()))
}

#[cfg(test)]
#[path = "tests/service_tests.rs"]
mod tests;

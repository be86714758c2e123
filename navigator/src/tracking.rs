use std::{fmt, future::Future};

use serde::{Serialize, de::DeserializeOwned};
use trip_navigator_lib::comms::{
    StartTrackingRequest, StartTrackingResponse, StopTrackingRequest, TrackingAck,
    UpdateTrackingRequest,
};

#[derive(Debug)]
pub enum TrackingError {
    /// The request never got a usable response.
    Transport(String),
    /// The service answered but refused the operation.
    Rejected(String),
}

impl fmt::Display for TrackingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackingError::Transport(msg) => write!(f, "tracking transport error: {msg}"),
            TrackingError::Rejected(msg) => write!(f, "tracking request rejected: {msg}"),
        }
    }
}

impl std::error::Error for TrackingError {}

/// The remote tracking service. Starting a session is the only call whose
/// failure matters to callers; updates and stops are best-effort.
pub trait TrackingService: Send + Sync + 'static {
    fn start_tracking(
        &self,
        request: StartTrackingRequest,
    ) -> impl Future<Output = Result<i64, TrackingError>> + Send;

    fn update_tracking(
        &self,
        request: UpdateTrackingRequest,
    ) -> impl Future<Output = Result<(), TrackingError>> + Send;

    fn stop_tracking(
        &self,
        tracking_id: i64,
    ) -> impl Future<Output = Result<(), TrackingError>> + Send;
}

/// Tracking service over HTTP, bearer-token authenticated.
pub struct HttpTrackingClient {
    http: reqwest::Client,
    base_url: String,
    auth_token: String,
}

impl HttpTrackingClient {
    pub fn new(base_url: impl Into<String>, auth_token: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
            auth_token: auth_token.into(),
        }
    }

    async fn post<Request, Response>(
        &self,
        path: &str,
        body: &Request,
    ) -> Result<Response, TrackingError>
    where
        Request: Serialize,
        Response: DeserializeOwned,
    {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.auth_token)
            .json(body)
            .send()
            .await
            .map_err(|err| TrackingError::Transport(err.to_string()))?;

        response
            .json()
            .await
            .map_err(|err| TrackingError::Transport(err.to_string()))
    }
}

impl TrackingService for HttpTrackingClient {
    async fn start_tracking(&self, request: StartTrackingRequest) -> Result<i64, TrackingError> {
        let response: StartTrackingResponse = self.post("/api/navigation/start", &request).await?;

        if !response.success {
            return Err(TrackingError::Rejected(
                response.message.unwrap_or_else(|| "tracking start refused".into()),
            ));
        }

        response
            .tracking_id
            .ok_or_else(|| TrackingError::Rejected("response carried no tracking id".into()))
    }

    async fn update_tracking(&self, request: UpdateTrackingRequest) -> Result<(), TrackingError> {
        let ack: TrackingAck = self.post("/api/navigation/update", &request).await?;

        if !ack.success {
            return Err(TrackingError::Rejected(
                ack.message.unwrap_or_else(|| "position update refused".into()),
            ));
        }
        Ok(())
    }

    async fn stop_tracking(&self, tracking_id: i64) -> Result<(), TrackingError> {
        let ack: TrackingAck = self
            .post("/api/navigation/stop", &StopTrackingRequest { tracking_id })
            .await?;

        if !ack.success {
            return Err(TrackingError::Rejected(
                ack.message.unwrap_or_else(|| "tracking stop refused".into()),
            ));
        }
        Ok(())
    }
}

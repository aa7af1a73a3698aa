//! Remote Authority Client
//!
//! The booking server is the authority on check-in/check-out state. The
//! client only needs two calls from it:
//!
//! - `POST /api/bookings/check-in`  body `{"bookingId": "..."}`
//! - `POST /api/bookings/check-out` body `{"bookingId": "..."}`
//!
//! Any 2xx is success. Anything else, including transport errors and
//! timeouts, is a transient failure the sync engine may retry. Both endpoints
//! must tolerate duplicate delivery.

use crate::frontdesk::config::Config;
use crate::shared::booking::ActionKind;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;

pub const CHECK_IN_PATH: &str = "/api/bookings/check-in";
pub const CHECK_OUT_PATH: &str = "/api/bookings/check-out";

/// Failure of a single remote call
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The server answered with a non-2xx status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The request never got a response
    #[error("transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Server that applies front-desk actions
#[async_trait]
pub trait RemoteAuthority: Send + Sync {
    async fn check_in(&self, booking_id: &str) -> Result<(), RemoteError>;

    async fn check_out(&self, booking_id: &str) -> Result<(), RemoteError>;

    /// Dispatch on the action kind
    async fn apply(&self, kind: ActionKind, booking_id: &str) -> Result<(), RemoteError> {
        match kind {
            ActionKind::CheckIn => self.check_in(booking_id).await,
            ActionKind::CheckOut => self.check_out(booking_id).await,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BookingActionRequest<'a> {
    booking_id: &'a str,
}

/// `RemoteAuthority` over HTTP
#[derive(Debug, Clone)]
pub struct HttpRemoteAuthority {
    config: Config,
    client: Client,
}

impl HttpRemoteAuthority {
    pub fn new(config: Config) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(config.app().request_timeout)
            .build()?;
        Ok(Self { config, client })
    }

    async fn post_action(&self, path: &str, booking_id: &str) -> Result<(), RemoteError> {
        let url = self.config.api_url(path);

        let mut request = self
            .client
            .post(&url)
            .json(&BookingActionRequest { booking_id });
        if let Some(token) = self.config.get_token() {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| status.to_string());
            tracing::debug!(%url, status = status.as_u16(), "Remote authority rejected action");
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl RemoteAuthority for HttpRemoteAuthority {
    async fn check_in(&self, booking_id: &str) -> Result<(), RemoteError> {
        self.post_action(CHECK_IN_PATH, booking_id).await
    }

    async fn check_out(&self, booking_id: &str) -> Result<(), RemoteError> {
        self.post_action(CHECK_OUT_PATH, booking_id).await
    }
}

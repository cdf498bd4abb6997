//! Remote peer transport
//!
//! [`RemotePeer`] is the one seam between the client and the authoritative
//! game server: one request in, one decoded response out. [`HttpPeer`] speaks
//! it as JSON over HTTP POST to a single endpoint; tests substitute scripted
//! peers.

use super::error::{NetworkError, NetworkResult};
use async_trait::async_trait;
use shared::protocol::{Request, Response};
use std::time::Duration;
use tracing::debug;
use url::Url;

#[async_trait]
pub trait RemotePeer: Send + Sync + 'static {
    async fn exchange(&self, request: Request) -> NetworkResult<Response>;
}

/// JSON-over-POST transport
#[derive(Debug, Clone)]
pub struct HttpPeer {
    http: reqwest::Client,
    endpoint: Url,
}

impl HttpPeer {
    pub fn new(endpoint: Url, timeout: Duration) -> NetworkResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl RemotePeer for HttpPeer {
    async fn exchange(&self, request: Request) -> NetworkResult<Response> {
        debug!(
            "[NETWORK] POST {} messageType={}",
            self.endpoint,
            request.message.message_type()
        );

        let reply = self
            .http
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?;

        let status = reply.status();
        if !status.is_success() {
            return Err(NetworkError::Status {
                status: status.as_u16(),
            });
        }

        let body = reply.bytes().await?;
        let response: Response = serde_json::from_slice(&body)?;
        debug!(
            "[NETWORK] Reply messageType={}",
            response.message.message_type()
        );
        Ok(response)
    }
}

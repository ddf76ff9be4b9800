//! HTTP client for the conversation service.

use std::time::{Duration, Instant};

use earshot_core::config::ServiceConfig;
use earshot_core::{ConfigService, ConversationService};
use reqwest::Client;
use reqwest::header::ACCEPT;
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, warn};

use crate::endpoint::resolve_endpoint;
use crate::error::ServiceError;
use crate::types::{AddMessageRequest, Endpoint};

/// Delivers event text to the conversation service over HTTP.
///
/// Each call blocks the calling thread until the service answers or the
/// timeout elapses. Must not be called from inside another async runtime.
pub struct HttpConversationService {
    endpoint: Endpoint,
    url: String,
    http: Client,
    runtime: Runtime,
    timeout_ms: u64,
}

impl std::fmt::Debug for HttpConversationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpConversationService")
            .field("endpoint", &self.endpoint)
            .field("timeout_ms", &self.timeout_ms)
            .finish_non_exhaustive()
    }
}

impl HttpConversationService {
    /// Create a client for `endpoint` with a per-request timeout.
    ///
    /// # Errors
    /// Returns [`ServiceError::Setup`] if the HTTP client or the runtime
    /// cannot be built.
    pub fn new(endpoint: Endpoint, timeout_ms: u64) -> Result<Self, ServiceError> {
        let timeout = Duration::from_millis(timeout_ms);
        let http = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::Setup(e.to_string()))?;
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ServiceError::Setup(e.to_string()))?;

        Ok(Self {
            url: endpoint.url(),
            endpoint,
            http,
            runtime,
            timeout_ms,
        })
    }

    /// Resolve the endpoint through `settings` and build the client.
    ///
    /// # Errors
    /// See [`new`](Self::new).
    pub fn from_config(config: &ServiceConfig, settings: &dyn ConfigService) -> Result<Self, ServiceError> {
        Self::new(resolve_endpoint(config, settings), config.timeout_ms)
    }

    /// The resolved endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Post one message, blocking until the service answers.
    ///
    /// # Errors
    /// Returns a [`ServiceError`] on transport failure, timeout, or a
    /// non-success status.
    pub fn post(&self, text: &str) -> Result<(), ServiceError> {
        self.runtime.block_on(self.post_async(text))
    }

    async fn post_async(&self, text: &str) -> Result<(), ServiceError> {
        let start = Instant::now();
        let result = self
            .http
            .post(&self.url)
            .header(ACCEPT, "application/json")
            .json(&AddMessageRequest { message: text })
            .send()
            .await;
        let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        match result {
            Ok(resp) if resp.status().is_success() => {
                debug!(url = %self.url, status = resp.status().as_u16(), elapsed_ms, "Message delivered");
                Ok(())
            }
            Ok(resp) => {
                let status = resp.status().as_u16();
                let body = resp.text().await.unwrap_or_default();
                warn!(url = %self.url, status, elapsed_ms, "Conversation service rejected message");
                Err(ServiceError::Status { status, body })
            }
            Err(e) if e.is_timeout() => {
                warn!(url = %self.url, timeout_ms = self.timeout_ms, "Conversation service timed out");
                Err(ServiceError::Timeout(self.timeout_ms))
            }
            Err(e) => {
                warn!(url = %self.url, error = %e, "Conversation service request failed");
                Err(e.into())
            }
        }
    }
}

impl ConversationService for HttpConversationService {
    fn send_text(&self, text: &str) -> earshot_core::error::Result<()> {
        self.post(text).map_err(Into::into)
    }
}

use crate::presenter::DashboardLoader;
use crate::profile::{SessionInfo, UserProfile};
use crate::transport::{ProfileTransport, TierFailure};

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

const PROFILE_PATH: &str = "/api/user/profile";
const SESSION_INFO_PATH: &str = "/api/user/session-info";
const PROPOSALS_PATH: &str = "/api/proposals";
const POLITICIANS_PATH: &str = "/api/politicians";
const SESSION_COOKIE: &str = "session_token";

/// reqwest-backed transport for the Politisian service.
pub struct HttpTransport {
    base_url: String,
    session_token: Option<String>,
    client: Client,
}

impl HttpTransport {
    /// Create a new transport.
    ///
    /// # Arguments
    /// * `base_url` - Service URL (e.g., "http://127.0.0.1:8080")
    /// * `session_token` - Optional token sent as the session cookie
    /// * `timeout` - Request timeout, matching the resolver's tier deadline
    pub fn new(base_url: &str, session_token: Option<&str>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(1)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            session_token: session_token.map(String::from),
            client,
        }
    }

    /// Build a GET request with the session cookie attached.
    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.client.get(&url);

        if let Some(ref token) = self.session_token {
            req = req.header(header::COOKIE, format!("{SESSION_COOKIE}={token}"));
        }

        req
    }

    /// Execute a GET and classify the result as a tier failure.
    async fn fetch<P: DeserializeOwned>(&self, path: &str) -> Result<P, TierFailure> {
        let response = self.get(path).send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(TierFailure::auth_expired());
        }
        if !status.is_success() {
            return Err(TierFailure::server(status.as_u16()));
        }

        response
            .json::<P>()
            .await
            .map_err(|e| TierFailure::parse(e.to_string()))
    }
}

#[async_trait]
impl ProfileTransport for HttpTransport {
    async fn fetch_profile(&self) -> Result<UserProfile, TierFailure> {
        self.fetch(PROFILE_PATH).await
    }

    async fn fetch_session_info(&self) -> Result<SessionInfo, TierFailure> {
        self.fetch(SESSION_INFO_PATH).await
    }
}

/// Dependent-data loader for the degraded dashboard refresh.
///
/// Payload shapes are opaque here; rendering the lists belongs to the
/// presentation layer's collaborators.
pub struct HttpLoader {
    transport: HttpTransport,
}

impl HttpLoader {
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl DashboardLoader for HttpLoader {
    async fn load_dependents(&self) {
        for path in [PROPOSALS_PATH, POLITICIANS_PATH] {
            match self.transport.fetch::<serde_json::Value>(path).await {
                Ok(body) => {
                    let count = body.as_array().map_or(0, |entries| entries.len());
                    info!("Refreshed {path}: {count} entries");
                }
                Err(e) => warn!("Dependent load {path} failed: {e}"),
            }
        }
    }
}

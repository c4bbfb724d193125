//! HTTP transport used by the exchange feeds

use std::time::Duration;

use blend_core::{AdapterError, AdapterResult};
use tracing::debug;

/// Issue a GET and hand back the raw body
#[async_trait::async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &str) -> AdapterResult<Vec<u8>>;
}

/// `reqwest`-backed transport sharing one connection pool
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(user_agent: &str) -> AdapterResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| AdapterError::Transport(format!("could not build HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> AdapterResult<Vec<u8>> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AdapterError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdapterError::Transport(format!("HTTP {status} from {url}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AdapterError::Transport(e.to_string()))?;

        Ok(body.to_vec())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory transport keyed by URL

    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone)]
    enum Route {
        Body(String),
        Fail(String),
    }

    #[derive(Debug, Default)]
    pub struct StaticTransport {
        routes: HashMap<String, Route>,
        calls: AtomicUsize,
    }

    impl StaticTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
            self.routes.insert(url.into(), Route::Body(body.into()));
            self
        }

        pub fn fail(mut self, url: impl Into<String>, reason: impl Into<String>) -> Self {
            self.routes.insert(url.into(), Route::Fail(reason.into()));
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl HttpTransport for StaticTransport {
        async fn get(&self, url: &str) -> AdapterResult<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            match self.routes.get(url) {
                Some(Route::Body(body)) => Ok(body.clone().into_bytes()),
                Some(Route::Fail(reason)) => Err(AdapterError::Transport(reason.clone())),
                None => Err(AdapterError::Transport(format!("HTTP 404 Not Found from {url}"))),
            }
        }
    }
}

//! Where status bodies come from.

use std::future::Future;

use thiserror::Error;
use trafficdash::PollError;

/// One `GET /status` per call. Returns the raw body; parsing happens in the reducer.
pub trait StatusSource {
    fn fetch(&self) -> impl Future<Output = Result<String, PollError>> + Send;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

pub struct HttpStatusSource {
    client: reqwest::Client,
    url: String,
}

impl HttpStatusSource {
    pub fn new(url: impl Into<String>) -> Result<Self, SourceError> {
        // No request timeout: a hung request is abandoned by cancellation only.
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl StatusSource for HttpStatusSource {
    fn fetch(&self) -> impl Future<Output = Result<String, PollError>> + Send {
        let request = self.client.get(&self.url);
        async move {
            let resp = request
                .send()
                .await
                .map_err(|e| PollError::Transport(e.to_string()))?;
            let status = resp.status();
            if !status.is_success() {
                return Err(PollError::Http {
                    status: status.as_u16(),
                });
            }
            resp.text()
                .await
                .map_err(|e| PollError::Transport(e.to_string()))
        }
    }
}

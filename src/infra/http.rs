use reqwest::blocking::{Client, RequestBuilder};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("failed to build http client: {0}")]
    Build(#[source] reqwest::Error),
    #[error("{method} request status error: {status}")]
    Status {
        method: &'static str,
        status: StatusCode,
    },
    #[error("{method} request json error: {source}")]
    Json {
        method: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{method} request failed: {source}")]
    Transport {
        method: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

/// Thin blocking wrapper around reqwest: attach headers, reject anything but
/// `200 OK`, and hand back the body.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Requests wait as long as the server takes; the blocking client's
    /// default 30 second timeout is switched off.
    pub fn new() -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(None::<Duration>)
            .build()
            .map_err(HttpError::Build)?;
        Ok(Self { client })
    }

    pub fn get_text<P: Serialize + ?Sized>(
        &self,
        url: &str,
        params: &P,
        headers: &[(&str, &str)],
    ) -> Result<String, HttpError> {
        let request = with_headers(self.client.get(url).query(params), headers);
        let response = send("get", request)?;
        response
            .text()
            .map_err(|source| HttpError::Transport { method: "get", source })
    }

    pub fn get_json<P: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        url: &str,
        params: &P,
        headers: &[(&str, &str)],
    ) -> Result<R, HttpError> {
        let body = self.get_text(url, params, headers)?;
        serde_json::from_str(&body).map_err(|source| HttpError::Json { method: "get", source })
    }

    pub fn get_bytes(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        let response = send("get", self.client.get(url))?;
        response
            .bytes()
            .map(|bytes| bytes.to_vec())
            .map_err(|source| HttpError::Transport { method: "get", source })
    }

    /// POST `body` serialized as JSON and return the raw response text.
    pub fn post_text<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
        headers: &[(&str, &str)],
    ) -> Result<String, HttpError> {
        let payload = serde_json::to_string(body)
            .map_err(|source| HttpError::Json { method: "post", source })?;
        let request = with_headers(self.client.post(url).body(payload), headers);
        let response = send("post", request)?;
        response
            .text()
            .map_err(|source| HttpError::Transport { method: "post", source })
    }
}

fn with_headers(mut request: RequestBuilder, headers: &[(&str, &str)]) -> RequestBuilder {
    for (name, value) in headers {
        request = request.header(*name, *value);
    }
    request
}

fn send(
    method: &'static str,
    request: RequestBuilder,
) -> Result<reqwest::blocking::Response, HttpError> {
    let response = request
        .send()
        .map_err(|source| HttpError::Transport { method, source })?;

    let status = response.status();
    log::debug!("{method} {} -> {status}", response.url());
    if status != StatusCode::OK {
        let body = response.text().unwrap_or_default();
        log::debug!("error body: {body}");
        return Err(HttpError::Status { method, status });
    }
    Ok(response)
}

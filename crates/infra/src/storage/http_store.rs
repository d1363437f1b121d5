//! Remote document store over a Firebase-style REST API.
//!
//! Each document lives at `{base_url}/{key}.json`; a `null` body means the
//! document does not exist. An optional token is sent as the `auth` query
//! parameter. A write to a group-name reservation rejected with 409 or 412
//! means the name is already taken.

use async_trait::async_trait;
use huddle_core::DocumentStore;
use huddle_domain::{HuddleError, RemoteConfig, Result};
use reqwest::{Method, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use crate::errors::{status_error, InfraError};
use crate::http::HttpClient;

const GROUP_NAME_PREFIX: &str = "group_names/";

/// [`DocumentStore`] backed by the remote REST API.
pub struct HttpDocumentStore {
    client: HttpClient,
    base_url: Url,
    auth_token: Option<String>,
}

impl HttpDocumentStore {
    /// Store rooted at `base_url`; fails with `Config` for an unparsable URL.
    pub fn new(client: HttpClient, base_url: &str, auth_token: Option<String>) -> Result<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|err| HuddleError::Config(format!("invalid remote base URL: {err}")))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { client, base_url, auth_token })
    }

    /// Store and HTTP client built from the remote settings.
    pub fn from_config(config: &RemoteConfig) -> Result<Self> {
        Self::new(HttpClient::from_config(config)?, &config.base_url, config.auth_token.clone())
    }

    fn document_url(&self, key: &str) -> Result<Url> {
        let path: Vec<String> =
            key.split('/').map(|segment| urlencoding::encode(segment).into_owned()).collect();
        let mut url = self
            .base_url
            .join(&format!("{}.json", path.join("/")))
            .map_err(|err| {
                HuddleError::InvalidInput(format!("invalid document key {key}: {err}"))
            })?;

        if let Some(token) = &self.auth_token {
            url.query_pairs_mut().append_pair("auth", token);
        }
        Ok(url)
    }

    async fn call(&self, method: Method, key: &str, body: Option<&Value>) -> Result<Response> {
        let url = self.document_url(key)?;
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.client.send(request).await
    }
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let response = self.call(Method::GET, key, None).await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(status_error(status));
        }

        let value: Value =
            response.json().await.map_err(|err| HuddleError::from(InfraError::from(err)))?;
        debug!(%status, present = !value.is_null(), "remote document fetched");
        Ok((!value.is_null()).then_some(value))
    }

    #[instrument(skip(self, value))]
    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let response = self.call(Method::PUT, key, Some(&value)).await?;
        let status = response.status();
        if matches!(status, StatusCode::CONFLICT | StatusCode::PRECONDITION_FAILED) {
            if let Some(name) = key.strip_prefix(GROUP_NAME_PREFIX) {
                debug!(%status, name, "group name reservation rejected");
                return Err(HuddleError::DuplicateGroupName(name.to_string()));
            }
        }
        ensure_success(status)
    }

    #[instrument(skip(self))]
    async fn remove(&self, key: &str) -> Result<()> {
        let response = self.call(Method::DELETE, key, None).await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(()),
            status => ensure_success(status),
        }
    }
}

fn ensure_success(status: StatusCode) -> Result<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(status_error(status))
    }
}

// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! HTTP transport for the [`RedfishClient`] trait, built on reqwest
//! (cargo feature `reqwest`).

use crate::ODataId;
use url::Url;

#[cfg(feature = "reqwest")]
use crate::{bmc::BmcCredentials, RedfishClient, Response, UnreachableError};

#[cfg(feature = "reqwest")]
use std::time::Duration;

/// Base URL of a Redfish service with helpers to address `@odata.id` paths.
#[derive(Debug, Clone)]
pub struct RedfishEndpoint {
    base_url: Url,
}

impl RedfishEndpoint {
    /// Create a new `RedfishEndpoint` from a base URL.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self { base_url }
    }

    /// Resolve an `@odata.id` against the base URL.
    ///
    /// An id may carry a query string (`.../Volumes?$expand=*($levels=1)`);
    /// the query part is preserved rather than percent-encoded into the
    /// path.
    #[must_use]
    pub fn url_for(&self, id: &ODataId) -> Url {
        let mut url = self.base_url.clone();
        match id.as_str().split_once('?') {
            Some((path, query)) => {
                url.set_path(path);
                url.set_query(Some(query));
            }
            None => url.set_path(id.as_str()),
        }
        url
    }
}

impl From<Url> for RedfishEndpoint {
    fn from(url: Url) -> Self {
        Self::new(url)
    }
}

#[cfg(feature = "reqwest")]
#[derive(Debug)]
pub enum HttpClientError {
    /// Connection or name-resolution failure; the host never answered.
    Unreachable(reqwest::Error),
    /// Any other transport-level failure.
    Request(reqwest::Error),
}

#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for HttpClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            Self::Unreachable(err)
        } else {
            Self::Request(err)
        }
    }
}

#[cfg(feature = "reqwest")]
impl UnreachableError for HttpClientError {
    fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable(_))
    }
}

#[cfg(feature = "reqwest")]
#[allow(clippy::absolute_paths)]
impl std::fmt::Display for HttpClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unreachable(e) => write!(f, "host unreachable: {e}"),
            Self::Request(e) => write!(f, "HTTP client error: {e}"),
        }
    }
}

#[cfg(feature = "reqwest")]
#[allow(clippy::absolute_paths)]
impl std::error::Error for HttpClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Unreachable(e) | Self::Request(e) => Some(e),
        }
    }
}

#[cfg(feature = "reqwest")]
/// Configuration parameters for the reqwest HTTP client.
///
/// # Examples
///
/// ```rust
/// use redstor_core::http::ReqwestClientParams;
/// use std::time::Duration;
///
/// let params = ReqwestClientParams::new()
///     .timeout(Duration::from_secs(30))
///     .accept_invalid_certs(true);
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestClientParams {
    /// HTTP request timeout.
    pub timeout: Option<Duration>,
    /// TCP connection timeout.
    pub connect_timeout: Option<Duration>,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// Whether to accept invalid TLS certificates. Out-of-band controllers
    /// commonly ship self-signed certificates.
    pub accept_invalid_certs: bool,
    /// Maximum number of HTTP redirects to follow.
    pub max_redirects: Option<usize>,
}

#[cfg(feature = "reqwest")]
impl Default for ReqwestClientParams {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            connect_timeout: Some(Duration::from_secs(10)),
            user_agent: Some("redstor/0.1.0".to_string()),
            accept_invalid_certs: false,
            max_redirects: Some(10),
        }
    }
}

#[cfg(feature = "reqwest")]
impl ReqwestClientParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    #[must_use]
    pub const fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    #[must_use]
    pub const fn max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = Some(max);
        self
    }
}

#[cfg(feature = "reqwest")]
/// [`RedfishClient`] implementation using the reqwest library.
///
/// Combines a reqwest client with the service endpoint and credentials.
/// Requests use HTTP basic authentication; responses are folded into the
/// uniform [`Response`] surface with HTTP error statuses surfaced as
/// responses, not transport errors.
///
/// # Examples
///
/// ```rust,no_run
/// use redstor_core::bmc::BmcCredentials;
/// use redstor_core::http::ReqwestClient;
/// use url::Url;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let credentials = BmcCredentials::new("root".to_string(), "password".to_string());
/// let endpoint = Url::parse("https://192.168.0.120")?;
/// let client = ReqwestClient::new(endpoint, credentials)?;
/// # Ok(())
/// # }
/// ```
pub struct ReqwestClient {
    client: reqwest::Client,
    endpoint: RedfishEndpoint,
    credentials: BmcCredentials,
}

#[cfg(feature = "reqwest")]
#[allow(clippy::missing_errors_doc)]
impl ReqwestClient {
    pub fn new(endpoint: Url, credentials: BmcCredentials) -> Result<Self, reqwest::Error> {
        Self::with_params(endpoint, credentials, ReqwestClientParams::default())
    }

    pub fn with_params(
        endpoint: Url,
        credentials: BmcCredentials,
        params: ReqwestClientParams,
    ) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();

        if let Some(timeout) = params.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(connect_timeout) = params.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }

        if let Some(user_agent) = params.user_agent {
            builder = builder.user_agent(user_agent);
        }

        if params.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(max_redirects) = params.max_redirects {
            builder = builder.redirect(reqwest::redirect::Policy::limited(max_redirects));
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: RedfishEndpoint::from(endpoint),
            credentials,
        })
    }

    /// Wrap an already-configured reqwest client.
    #[must_use]
    pub const fn with_client(
        client: reqwest::Client,
        endpoint: RedfishEndpoint,
        credentials: BmcCredentials,
    ) -> Self {
        Self {
            client,
            endpoint,
            credentials,
        }
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.basic_auth(&self.credentials.username, Some(self.credentials.password()))
    }

    async fn read_response(response: reqwest::Response) -> Result<Response, HttpClientError> {
        let status = response.status();
        let location = response
            .headers()
            .get(http::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(ODataId::from);

        let text = response.text().await.map_err(HttpClientError::from)?;
        // Controllers answer 201/202/204 with empty or non-JSON bodies.
        let json = if text.is_empty() {
            None
        } else {
            serde_json::from_str(&text).ok()
        };

        Ok(Response::new(status, json, location))
    }
}

#[cfg(feature = "reqwest")]
impl RedfishClient for ReqwestClient {
    type Error = HttpClientError;

    async fn get(&self, id: &ODataId) -> Result<Response, Self::Error> {
        let request = self.authorized(self.client.get(self.endpoint.url_for(id)));
        let response = request.send().await.map_err(HttpClientError::from)?;
        Self::read_response(response).await
    }

    async fn post<B: serde::Serialize + Send + Sync>(
        &self,
        id: &ODataId,
        body: &B,
    ) -> Result<Response, Self::Error> {
        let request = self
            .authorized(self.client.post(self.endpoint.url_for(id)))
            .json(body);
        let response = request.send().await.map_err(HttpClientError::from)?;
        Self::read_response(response).await
    }

    async fn patch<B: serde::Serialize + Send + Sync>(
        &self,
        id: &ODataId,
        body: &B,
    ) -> Result<Response, Self::Error> {
        let request = self
            .authorized(self.client.patch(self.endpoint.url_for(id)))
            .json(body);
        let response = request.send().await.map_err(HttpClientError::from)?;
        Self::read_response(response).await
    }

    async fn delete(&self, id: &ODataId) -> Result<Response, Self::Error> {
        let request = self.authorized(self.client.delete(self.endpoint.url_for(id)));
        let response = request.send().await.map_err(HttpClientError::from)?;
        Self::read_response(response).await
    }
}
